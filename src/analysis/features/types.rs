// Feature data structures

use serde::{Deserialize, Serialize};

/// Acoustic features extracted from a single audio frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Fundamental frequency estimate in Hz (0.0 = unvoiced)
    pub pitch_hz: f32,
    /// Root-mean-square amplitude
    pub rms: f32,
    /// Zero-crossing rate (0.0 to 1.0)
    pub zcr: f32,
    /// Spectral centroid in Hz
    pub centroid_hz: f32,
    /// Mel-cepstral coefficients
    pub cepstrum: Vec<f32>,
}

impl FeatureSet {
    /// All-zero features: the explicit result for an empty or malformed frame.
    ///
    /// Extraction never fails; callers that want finer diagnostics can
    /// distinguish a neutral set from a real one via `is_neutral`.
    pub fn neutral(coeff_count: usize) -> Self {
        Self {
            pitch_hz: 0.0,
            rms: 0.0,
            zcr: 0.0,
            centroid_hz: 0.0,
            cepstrum: vec![0.0; coeff_count],
        }
    }

    /// True if every scalar field is zero (the neutral/failed-extraction case)
    pub fn is_neutral(&self) -> bool {
        self.pitch_hz == 0.0 && self.rms == 0.0 && self.zcr == 0.0 && self.centroid_hz == 0.0
    }
}
