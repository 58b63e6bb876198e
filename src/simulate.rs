//! Synthetic accelerometer traces: rest, a sinusoidal shake, rest again.

use crate::recording::RawSample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

pub const GRAVITY: f32 = 9.8;

#[derive(Debug, Clone)]
pub struct ShakeProfile {
    pub rate_hz: f32,
    pub rest_seconds: f32,
    pub shake_seconds: f32,
    pub frequency_hz: f32,
    pub amplitude: f32,
    /// Peak uniform noise added to every axis.
    pub noise: f32,
    pub seed: u64,
    pub start_ms: u64,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for ShakeProfile {
    fn default() -> Self {
        Self {
            rate_hz: 50.0,
            rest_seconds: 3.0,
            shake_seconds: 5.0,
            frequency_hz: 5.0,
            amplitude: 2.0,
            noise: 0.02,
            seed: 7,
            start_ms: 0,
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

impl ShakeProfile {
    pub fn generate(&self) -> Vec<RawSample> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let rate = self.rate_hz as f64;
        let rest = (self.rest_seconds as f64 * rate).round() as usize;
        let shake = (self.shake_seconds as f64 * rate).round() as usize;
        let period_ms = 1000.0 / rate;

        let mut samples = Vec::with_capacity(2 * rest + shake);
        for k in 0..(2 * rest + shake) {
            let in_shake = k >= rest && k < rest + shake;
            let motion = if in_shake {
                let t = k as f64 / rate;
                self.amplitude * (2.0 * PI * self.frequency_hz as f64 * t).sin() as f32
            } else {
                0.0
            };
            let mut jitter = || {
                if self.noise > 0.0 {
                    rng.gen_range(-self.noise..=self.noise)
                } else {
                    0.0
                }
            };
            samples.push(RawSample {
                timestamp_ms: self.start_ms + (k as f64 * period_ms).round() as u64,
                x: jitter(),
                y: jitter(),
                z: GRAVITY + motion + jitter(),
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }
        samples
    }
}
