// VoiceActivityGate - speech / non-speech classification per frame
//
// A frame is voiced when its energy clears the threshold AND its ZCR sits
// strictly inside the speech band: too low means tonal hum or silence, too
// high means broadband noise or sibilance only. Pure function of one frame's
// features; voiced frames feed stress inference, non-voiced frames feed the
// noise floor.

use crate::analysis::features::FeatureSet;
use crate::config::VadConfig;

pub struct VoiceActivityGate {
    config: VadConfig,
}

impl VoiceActivityGate {
    pub fn new(config: VadConfig) -> Self {
        Self { config }
    }

    /// Classify one frame as speech / non-speech
    pub fn is_voiced(&self, features: &FeatureSet) -> bool {
        features.rms > self.config.energy_threshold
            && features.zcr > self.config.zcr_min
            && features.zcr < self.config.zcr_max
    }
}
