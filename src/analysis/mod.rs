// Analysis module - audio DSP pipeline for stress inference
//
// Pipeline: FeatureExtractor → VoiceActivityGate → {CalibrationTracker,
// NoiseFloorTracker} → StressInferenceEngine → TemporalSmoother. The session
// layer wires these together; everything here is deterministic given frames
// and timestamps.

pub mod features;
pub mod smoother;
pub mod stress;
pub mod vad;
pub mod window;

pub use features::{FeatureExtractor, FeatureSet};
pub use smoother::TemporalSmoother;
pub use stress::StressInferenceEngine;
pub use vad::VoiceActivityGate;
pub use window::FeatureWindow;
