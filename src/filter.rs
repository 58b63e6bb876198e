use std::f32::consts::PI;

/// Single-pole high-pass coefficient `RC / (RC + dt)` for a cutoff in Hz.
pub fn highpass_alpha(cutoff: f32, fs: f32) -> f32 {
    let rc = 1.0 / (2.0 * PI * cutoff);
    let dt = 1.0 / fs;
    rc / (rc + dt)
}

/// Single-pole low-pass coefficient `dt / (RC + dt)` for a cutoff in Hz.
pub fn lowpass_alpha(cutoff: f32, fs: f32) -> f32 {
    let rc = 1.0 / (2.0 * PI * cutoff);
    let dt = 1.0 / fs;
    dt / (rc + dt)
}

pub fn highpass(signal: &[f32], alpha: f32, output: &mut [f32]) {
    if signal.is_empty() {
        return;
    }
    output[0] = signal[0];
    for i in 1..signal.len() {
        output[i] = alpha * (output[i - 1] + signal[i] - signal[i - 1]);
    }
}

pub fn lowpass(signal: &[f32], alpha: f32, output: &mut [f32]) {
    if signal.is_empty() {
        return;
    }
    output[0] = signal[0];
    for i in 1..signal.len() {
        output[i] = output[i - 1] + alpha * (signal[i] - output[i - 1]);
    }
}

/// Subtracts the window mean from every sample in place.
pub fn remove_mean(signal: &mut [f32]) {
    if signal.is_empty() {
        return;
    }
    let mut mean = 0.0f32;
    for &v in signal.iter() {
        mean += v;
    }
    mean /= signal.len() as f32;
    signal.iter_mut().for_each(|v| *v -= mean);
}

/// Crude band-pass: a high-pass stage followed by a low-pass stage.
///
/// Both stages restart from the first sample of every window they are given;
/// no filter memory survives between calls.
#[derive(Debug, Clone, Copy)]
pub struct FilterPipeline {
    hp_alpha: f32,
    lp_alpha: f32,
}

impl FilterPipeline {
    pub fn new(band_low: f32, band_high: f32, sampling_rate: f32) -> Self {
        Self {
            hp_alpha: highpass_alpha(band_low, sampling_rate),
            lp_alpha: lowpass_alpha(band_high, sampling_rate),
        }
    }

    pub fn band_pass(&self, signal: &[f32]) -> Vec<f32> {
        let mut scratch = vec![0.0; signal.len()];
        let mut output = vec![0.0; signal.len()];
        self.band_pass_into(signal, &mut scratch, &mut output);
        output
    }

    /// Allocation-free variant of [`band_pass`](Self::band_pass). `scratch`
    /// and `output` must be at least as long as `signal`.
    pub fn band_pass_into(&self, signal: &[f32], scratch: &mut [f32], output: &mut [f32]) {
        let n = signal.len();
        highpass(signal, self.hp_alpha, &mut scratch[..n]);
        lowpass(&scratch[..n], self.lp_alpha, &mut output[..n]);
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new(1.0, 10.0, 50.0)
    }
}
