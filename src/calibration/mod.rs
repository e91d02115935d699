// Calibration - per-session baseline and ambient noise tracking
//
// The baseline tracker learns what this speaker sounds like during a short
// warm-up; the noise floor tracker keeps a rolling estimate of ambient
// energy from non-voiced frames. Both are owned by one session and reset on
// session teardown.

mod baseline;
mod noise_floor;

pub use baseline::{Baseline, CalibrationTracker};
pub use noise_floor::NoiseFloorTracker;
