// FeatureExtractor - acoustic feature extraction for stress inference
//
// Extracts the per-frame features consumed by voice activity gating,
// baseline calibration, and stress scoring:
//
// 1. Pitch (F0): autocorrelation estimate restricted to 80-400 Hz
// 2. RMS: root-mean-square amplitude (loudness)
// 3. ZCR: zero-crossing rate (noise/tonality)
// 4. Spectral centroid: energy-weighted mean frequency (brightness)
// 5. Mel-cepstral coefficients: timbre summary for temporal-variance scoring
//
// Extraction is deterministic, side-effect-free, and never fails: malformed
// input yields FeatureSet::neutral so the monitoring loop keeps running.

mod fft;
mod pitch;
mod spectral;
mod temporal;
mod types;

pub use types::FeatureSet;

use fft::FftProcessor;
use pitch::PitchEstimator;
use spectral::SpectralAnalyzer;

pub use temporal::{compute_rms, compute_zcr};

/// FeatureExtractor coordinates the per-frame DSP pipeline
pub struct FeatureExtractor {
    fft: FftProcessor,
    spectral: SpectralAnalyzer,
    pitch: PitchEstimator,
    coeff_count: usize,
}

impl FeatureExtractor {
    /// Create an extractor for the given sample rate and frame size.
    ///
    /// The FFT size is the next power of two at or above the frame size.
    pub fn new(sample_rate: u32, frame_size: usize, coeff_count: usize) -> Self {
        let fft_size = frame_size.max(2).next_power_of_two();
        Self {
            fft: FftProcessor::new(fft_size),
            spectral: SpectralAnalyzer::new(sample_rate, fft_size, coeff_count),
            pitch: PitchEstimator::new(sample_rate),
            coeff_count,
        }
    }

    /// Extract all features from one mono frame of normalized samples.
    ///
    /// An empty frame or one containing non-finite samples yields the
    /// neutral (all-zero) feature set.
    pub fn extract(&self, frame: &[f32]) -> FeatureSet {
        if frame.is_empty() || frame.iter().any(|s| !s.is_finite()) {
            return FeatureSet::neutral(self.coeff_count);
        }

        let spectrum = self.fft.magnitude_spectrum(frame);

        FeatureSet {
            pitch_hz: self.pitch.estimate(frame),
            rms: temporal::compute_rms(frame),
            zcr: temporal::compute_zcr(frame),
            centroid_hz: self.spectral.centroid(&spectrum),
            cepstrum: self.spectral.cepstrum(&spectrum),
        }
    }
}
