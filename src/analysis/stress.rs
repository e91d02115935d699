// StressInferenceEngine - window-level vocal stress estimation
//
// Converts a feature window plus the session baseline and ambient noise
// floor into a 0-1 stress score:
//
// 1. Gate: empty window or mean RMS below the voice-presence threshold
//    scores 0 outright.
// 2. Deviation scores for pitch, RMS, and spectral centroid relative to the
//    personal baseline; absolute heuristics when no usable baseline exists.
// 3. Cepstral temporal-variance and ZCR-variance scores.
// 4. Weighted combination; under a high noise floor a fraction of the RMS
//    weight moves onto pitch, since energy features degrade in noise while
//    pitch deviation stays robust.
// 5. Clamp to [0, 1] and pass through the spike limiter: upward movement is
//    bounded per evaluation step, downward movement is not, so the score can
//    collapse quickly once danger passes.

use crate::analysis::window::FeatureWindow;
use crate::calibration::Baseline;
use crate::config::StressConfig;

const EPSILON: f32 = 1e-6;

pub struct StressInferenceEngine {
    config: StressConfig,
    previous_score: f32,
}

impl StressInferenceEngine {
    pub fn new(config: StressConfig) -> Self {
        Self {
            config,
            previous_score: 0.0,
        }
    }

    /// Compute the spike-limited stress score for the current window
    pub fn compute_score(
        &mut self,
        window: &FeatureWindow,
        baseline: Option<&Baseline>,
        noise_floor: f32,
    ) -> f32 {
        if window.is_empty() || window.mean_rms() < self.config.voice_presence_rms {
            return self.limit(0.0);
        }

        let (pitch_score, rms_score, centroid_score) = match baseline {
            Some(b) if b.is_usable() => (
                deviation(window.mean_pitch_voiced(), b.pitch_hz),
                deviation(window.mean_rms(), b.rms),
                deviation(window.mean_centroid(), b.centroid_hz),
            ),
            _ => (
                (window.pitch_std_voiced() / self.config.pitch_variability_divisor).min(1.0),
                (window.rms_variance() / self.config.rms_variance_divisor).min(1.0),
                (window.mean_centroid() / self.config.centroid_divisor).min(1.0),
            ),
        };

        let cepstral_score = (window.cepstral_flux() / self.config.cepstral_flux_divisor).min(1.0);
        let zcr_score = (window.zcr_variance() / self.config.zcr_variance_divisor).min(1.0);

        let (pitch_weight, rms_weight) = self.effective_weights(noise_floor);

        let combined = pitch_weight * pitch_score
            + rms_weight * rms_score
            + self.config.cepstral_weight * cepstral_score
            + self.config.centroid_weight * centroid_score
            + self.config.zcr_weight * zcr_score;

        self.limit(combined.clamp(0.0, 1.0))
    }

    /// Pitch and RMS weights after noise compensation.
    ///
    /// Above the high-noise threshold, `noise_shift_fraction` of the RMS
    /// weight moves wholly onto pitch; the two shifts sum to zero.
    pub fn effective_weights(&self, noise_floor: f32) -> (f32, f32) {
        if noise_floor > self.config.high_noise_floor {
            let shift = self.config.rms_weight * self.config.noise_shift_fraction;
            (
                self.config.pitch_weight + shift,
                self.config.rms_weight - shift,
            )
        } else {
            (self.config.pitch_weight, self.config.rms_weight)
        }
    }

    /// Spike limiter: cap upward movement at `spike_limit` per step, let
    /// downward movement through untouched. Previous score updates
    /// unconditionally to the returned value.
    fn limit(&mut self, new_score: f32) -> f32 {
        let limited = if new_score - self.previous_score > self.config.spike_limit {
            self.previous_score + self.config.spike_limit
        } else {
            new_score
        };
        self.previous_score = limited;
        limited
    }

    /// Last published score (spike limiter state)
    pub fn previous_score(&self) -> f32 {
        self.previous_score
    }

    /// Reset limiter state for a new session
    pub fn reset(&mut self) {
        self.previous_score = 0.0;
    }
}

fn deviation(observed: f32, baseline: f32) -> f32 {
    ((observed - baseline).abs() / baseline.max(EPSILON)).min(1.0)
}
