// Sentinel Core - real-time multi-sensor risk fusion engine
//
// Ingests streaming sensor signals (acoustic features, hand-gesture
// geometry, motion) and fuses them into a single risk score driving a
// cancellable emergency-alert state machine. Capture, UI, and notification
// dispatch are external collaborators reached through the boundary traits in
// `emergency` and the session entry points.

pub mod analysis;
pub mod calibration;
pub mod config;
pub mod emergency;
pub mod error;
pub mod fusion;
pub mod gesture;
pub mod session;

pub use analysis::{FeatureExtractor, FeatureSet, StressInferenceEngine, TemporalSmoother};
pub use config::AppConfig;
pub use emergency::{
    Contact, ContactDirectory, EmergencyState, EmergencyTrigger, GeoPoint, LocationProvider,
};
pub use fusion::{RiskFusionEngine, RiskLevel, RiskUpdate};
pub use gesture::{GestureReading, GestureScorer, HandLandmarks, Landmark};
pub use session::runtime::SessionRuntime;
pub use session::MonitoringSession;
