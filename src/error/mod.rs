// Error types for the sentinel core
//
// Nothing inside the detection path is fatal: malformed frames degrade to
// neutral features and missing collaborators fall back to defaults. The
// errors here cover session lifecycle misuse and the location boundary.

use std::fmt;

/// Session lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A monitoring session is already running
    AlreadyRunning,
    /// No monitoring session is running
    NotRunning,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AlreadyRunning => write!(f, "monitoring session already running"),
            SessionError::NotRunning => write!(f, "no monitoring session running"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Location lookup failure at the provider boundary
///
/// Consumed internally: a failed lookup substitutes the fallback location so
/// the emergency trigger is never blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// No location fix could be obtained
    Unavailable { reason: String },
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::Unavailable { reason } => {
                write!(f, "location unavailable: {}", reason)
            }
        }
    }
}

impl std::error::Error for LocationError {}
