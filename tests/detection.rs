use quakewatch::features::count_spaced_peaks;
use quakewatch::filter::remove_mean;
use quakewatch::{
    Classifier, DetectionSignal, Detector, DetectorConfig, FeatureExtractor, FilterPipeline,
};
use std::f64::consts::PI;

const STEP_MS: u64 = 20;
const GRAVITY: f32 = 9.8;

/// Gravity plus a 5 Hz, amplitude 2.0 sinusoid sampled at 50 Hz. Sample `k`
/// keeps its phase no matter where a burst starts.
fn shake(k: u64) -> f32 {
    let t = k as f64 / 50.0;
    GRAVITY + 2.0 * (2.0 * PI * 5.0 * t).sin() as f32
}

fn run(detector: &mut Detector, magnitudes: &[f32]) -> Vec<Option<DetectionSignal>> {
    magnitudes
        .iter()
        .enumerate()
        .map(|(k, &m)| detector.on_sample(m, k as u64 * STEP_MS).signal)
        .collect()
}

fn confirmed_at(signals: &[Option<DetectionSignal>]) -> Vec<usize> {
    signals
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == Some(DetectionSignal::Confirmed))
        .map(|(k, _)| k)
        .collect()
}

#[test]
fn gravity_at_rest_stays_monitoring() {
    let window = vec![GRAVITY; 128];
    let mut centered = window.clone();
    remove_mean(&mut centered);
    let filtered = FilterPipeline::default().band_pass(&centered);
    let features = FeatureExtractor::default().extract(&filtered);

    assert!(features.energy < 1e-3, "energy {}", features.energy);
    assert!(features.variance < 1e-3, "variance {}", features.variance);
    assert_eq!(features.peak_count, 0);
    assert!(!Classifier::default().classify(&features));

    let mut detector = Detector::configure(DetectorConfig::default()).unwrap();
    let signals = run(&mut detector, &vec![GRAVITY; 400]);
    assert!(signals.iter().all(|s| *s == Some(DetectionSignal::Monitoring)));
}

#[test]
fn sustained_shake_confirms_once() {
    let mut detector = Detector::configure(DetectorConfig::default()).unwrap();
    // Fill the window, then 3.5 s more of the same shake.
    let magnitudes: Vec<f32> = (0..128 + 175).map(shake).collect();
    let signals = run(&mut detector, &magnitudes);

    let first_positive = signals
        .iter()
        .position(|s| matches!(s, Some(DetectionSignal::Verifying { .. })))
        .expect("shake should classify positive");
    assert_eq!(first_positive, 127, "the first full window is already positive");

    // 3000 ms at 20 ms per window is reached 150 windows after the first positive.
    let expected = first_positive + 150;
    assert_eq!(confirmed_at(&signals), vec![expected]);
    assert_eq!(
        signals[expected - 1],
        Some(DetectionSignal::Verifying { elapsed_ms: 2_980 })
    );
    assert!(signals[expected + 1..].iter().all(|s| s.is_none()), "latched, nothing new");
    assert!(detector.confirmation().confirmed);
}

#[test]
fn interrupted_shake_never_confirms() {
    let mut detector = Detector::configure(DetectorConfig::default()).unwrap();
    let mut magnitudes: Vec<f32> = (0..200).map(shake).collect();
    magnitudes.extend(std::iter::repeat(GRAVITY).take(100));
    magnitudes.extend((300..500).map(shake));
    let signals = run(&mut detector, &magnitudes);

    assert!(confirmed_at(&signals).is_empty());
    // The rest period pushes the window negative and re-arms the machine.
    let reset = signals[128..]
        .iter()
        .position(|s| *s == Some(DetectionSignal::Monitoring))
        .map(|i| i + 128)
        .expect("rest should reset the streak");
    assert!(reset < 300);
    assert!(signals[reset + 1..]
        .iter()
        .any(|s| matches!(s, Some(DetectionSignal::Verifying { .. }))));
}

#[test]
fn single_dropout_sample_does_not_break_the_streak() {
    let mut detector = Detector::configure(DetectorConfig::default()).unwrap();
    let mut magnitudes: Vec<f32> = (0..300).map(shake).collect();
    magnitudes[200] = 0.01;
    let signals = run(&mut detector, &magnitudes);

    // The dropout sits inside windows that still classify positive.
    assert!(matches!(signals[200], Some(DetectionSignal::Verifying { .. })));
    assert!(signals[127..277]
        .iter()
        .all(|s| matches!(s, Some(DetectionSignal::Verifying { .. }))));
    assert_eq!(confirmed_at(&signals), vec![277]);
}

#[test]
fn dropout_after_confirmation_stays_latched() {
    let mut detector = Detector::configure(DetectorConfig::default()).unwrap();
    let magnitudes: Vec<f32> = (0..278).map(shake).collect();
    let signals = run(&mut detector, &magnitudes);
    assert_eq!(signals[277], Some(DetectionSignal::Confirmed));
    assert_eq!(detector.confirmation().streak, 151);

    let evaluation = detector.on_sample(0.01, 278 * STEP_MS);
    assert_eq!(evaluation.signal, None);
    assert_eq!(detector.confirmation().streak, 152);
    assert!(detector.confirmation().confirmed);
}

#[test]
fn second_episode_needs_full_evidence_again() {
    let mut detector = Detector::configure(DetectorConfig::default()).unwrap();
    let mut magnitudes: Vec<f32> = (0..200).map(shake).collect();
    magnitudes.extend(std::iter::repeat(GRAVITY).take(100));
    magnitudes.extend((300..600).map(shake));
    let signals = run(&mut detector, &magnitudes);

    let confirmations = confirmed_at(&signals);
    assert_eq!(confirmations.len(), 1);
    let last_monitoring = signals[..confirmations[0]]
        .iter()
        .rposition(|s| *s == Some(DetectionSignal::Monitoring))
        .unwrap();
    assert_eq!(confirmations[0] - last_monitoring, 151);
}

#[test]
fn reset_discards_progress() {
    let mut detector = Detector::configure(DetectorConfig::default()).unwrap();
    for k in 0..250 {
        detector.on_sample(shake(k), k * STEP_MS);
    }
    assert!(detector.confirmation().streak > 0);

    detector.reset();
    assert_eq!(detector.confirmation().streak, 0);
    // Warm-up starts over: the next 127 samples cannot be classified.
    for k in 250..377 {
        assert_eq!(detector.on_sample(shake(k), k * STEP_MS).signal, Some(DetectionSignal::Monitoring));
    }
}

#[test]
fn impulses_at_min_spacing_all_count() {
    let mut signal = vec![0.0f32; 128];
    for k in 0..12 {
        signal[3 + k * 10] = 1.0;
    }
    assert_eq!(count_spaced_peaks(&signal, 0.4, 10), 12);

    let mut close = vec![0.0f32; 32];
    close[5] = 1.0;
    close[14] = 1.0;
    assert_eq!(count_spaced_peaks(&close, 0.4, 10), 1);
}

#[test]
fn stride_delays_but_still_confirms() {
    let config = DetectorConfig {
        evaluation_stride: 5,
        ..Default::default()
    };
    let mut detector = Detector::configure(config).unwrap();
    let magnitudes: Vec<f32> = (0..128 + 200).map(shake).collect();
    let signals = run(&mut detector, &magnitudes);
    // Evaluated on samples 127, 132, ...; 3000 ms after 127 is sample 277.
    assert_eq!(confirmed_at(&signals), vec![277]);
}
