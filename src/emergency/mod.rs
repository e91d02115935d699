// EmergencyStateMachine - sustained-threshold detection and alert escalation
//
// States: Idle → Sustaining → PreAlert → Triggered, with PreAlert → Idle on
// cancel. Evaluated once per detection tick (1 Hz reference). Risk above the
// danger threshold must be sustained for the configured duration before the
// cancellable countdown starts; reaching zero emits the trigger exactly once
// per session. Manual panic bypasses the sustain requirement. Transitions not
// valid from the current state are ignored, not errors.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::EmergencyConfig;
use crate::error::LocationError;

/// Geographic coordinate attached to a trigger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Substituted when location lookup fails; the trigger must never be
    /// blocked by a missing fix.
    pub const FALLBACK: GeoPoint = GeoPoint { lat: 0.0, lng: 0.0 };
}

/// Emergency contact forwarded to the notification collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

/// Emitted exactly once per session upon reaching Triggered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyTrigger {
    pub timestamp_ms: u64,
    pub location: GeoPoint,
    pub contacts: Vec<Contact>,
}

/// Boundary to the external geolocation collaborator
pub trait LocationProvider: Send + Sync {
    fn current_location(&self) -> Result<GeoPoint, LocationError>;
}

/// Boundary to the external contact-list collaborator
pub trait ContactDirectory: Send + Sync {
    fn emergency_contacts(&self) -> Vec<Contact>;
}

/// Fixed-location provider for tests and offline harnesses
pub struct StaticLocationProvider(pub GeoPoint);

impl LocationProvider for StaticLocationProvider {
    fn current_location(&self) -> Result<GeoPoint, LocationError> {
        Ok(self.0)
    }
}

/// Fixed contact list for tests and offline harnesses
pub struct StaticContactDirectory(pub Vec<Contact>);

impl ContactDirectory for StaticContactDirectory {
    fn emergency_contacts(&self) -> Vec<Contact> {
        self.0.clone()
    }
}

/// Externally visible machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmergencyState {
    Idle,
    Sustaining,
    PreAlert,
    Triggered,
}

enum Phase {
    Idle,
    Sustaining { since_ms: u64 },
    PreAlert { countdown_remaining: u32 },
    Triggered,
}

pub struct EmergencyStateMachine {
    config: EmergencyConfig,
    danger_threshold: f32,
    phase: Phase,
    location: Arc<dyn LocationProvider>,
    contacts: Arc<dyn ContactDirectory>,
}

impl EmergencyStateMachine {
    pub fn new(
        config: EmergencyConfig,
        danger_threshold: f32,
        location: Arc<dyn LocationProvider>,
        contacts: Arc<dyn ContactDirectory>,
    ) -> Self {
        Self {
            config,
            danger_threshold,
            phase: Phase::Idle,
            location,
            contacts,
        }
    }

    /// Advance one detection tick with the current fused risk.
    ///
    /// Returns the trigger event when the countdown completes; `None` on
    /// every other tick. Triggered is terminal for the session.
    pub fn evaluate(&mut self, risk: f32, now_ms: u64) -> Option<EmergencyTrigger> {
        match self.phase {
            Phase::Idle => {
                if risk > self.danger_threshold {
                    tracing::debug!(risk, "risk above danger threshold, sustaining");
                    self.phase = Phase::Sustaining { since_ms: now_ms };
                }
                None
            }
            Phase::Sustaining { since_ms } => {
                if risk <= self.danger_threshold {
                    tracing::debug!(risk, "risk dropped, sustain timer discarded");
                    self.phase = Phase::Idle;
                } else if now_ms.saturating_sub(since_ms) >= self.config.sustain_duration_ms {
                    tracing::warn!("danger sustained, starting pre-alert countdown");
                    self.phase = Phase::PreAlert {
                        countdown_remaining: self.config.countdown_seconds,
                    };
                }
                None
            }
            Phase::PreAlert {
                countdown_remaining,
            } => {
                let remaining = countdown_remaining.saturating_sub(1);
                if remaining == 0 {
                    self.phase = Phase::Triggered;
                    Some(self.compose_trigger(now_ms))
                } else {
                    tracing::info!(remaining, "pre-alert countdown");
                    self.phase = Phase::PreAlert {
                        countdown_remaining: remaining,
                    };
                    None
                }
            }
            Phase::Triggered => None,
        }
    }

    /// Manual panic: jump straight to PreAlert from Idle or Sustaining.
    /// No-op in PreAlert or Triggered.
    pub fn manual_panic(&mut self) {
        match self.phase {
            Phase::Idle | Phase::Sustaining { .. } => {
                tracing::warn!("manual panic, entering pre-alert");
                self.phase = Phase::PreAlert {
                    countdown_remaining: self.config.countdown_seconds,
                };
            }
            Phase::PreAlert { .. } | Phase::Triggered => {}
        }
    }

    /// Cancel a pending alert. Honored only in PreAlert; returns whether the
    /// cancellation took effect. Any pending sustain timer is discarded.
    pub fn cancel(&mut self) -> bool {
        match self.phase {
            Phase::PreAlert { .. } => {
                tracing::info!("pre-alert cancelled");
                self.phase = Phase::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn state(&self) -> EmergencyState {
        match self.phase {
            Phase::Idle => EmergencyState::Idle,
            Phase::Sustaining { .. } => EmergencyState::Sustaining,
            Phase::PreAlert { .. } => EmergencyState::PreAlert,
            Phase::Triggered => EmergencyState::Triggered,
        }
    }

    /// Seconds left in the countdown, when in PreAlert
    pub fn countdown_remaining(&self) -> Option<u32> {
        match self.phase {
            Phase::PreAlert {
                countdown_remaining,
            } => Some(countdown_remaining),
            _ => None,
        }
    }

    /// Return to Idle for a fresh session
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    fn compose_trigger(&self, now_ms: u64) -> EmergencyTrigger {
        let location = match self.location.current_location() {
            Ok(point) => point,
            Err(err) => {
                tracing::warn!(%err, "location lookup failed, using fallback");
                GeoPoint::FALLBACK
            }
        };
        tracing::error!(
            lat = location.lat,
            lng = location.lng,
            "EMERGENCY TRIGGERED"
        );
        EmergencyTrigger {
            timestamp_ms: now_ms,
            location,
            contacts: self.contacts.emergency_contacts(),
        }
    }
}
