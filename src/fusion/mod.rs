// RiskFusionEngine - weighted multi-sensor risk score
//
// Combines the discrete gesture signal, smoothed stress score, and motion
// score into one clamped risk value and classifies it. Pure given the
// config; the RiskUpdate event it produces is broadcast once per evaluation
// tick for observability.

use serde::{Deserialize, Serialize};

use crate::config::FusionConfig;

/// Risk classification by fixed cut points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Safe,
    Moderate,
    Danger,
}

/// Per-sensor weighted contributions to the fused score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub gesture: f32,
    pub stress: f32,
    pub motion: f32,
}

/// Observability event emitted once per evaluation tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskUpdate {
    pub timestamp_ms: u64,
    pub risk_score: f32,
    pub level: RiskLevel,
    pub breakdown: RiskBreakdown,
}

pub struct RiskFusionEngine {
    config: FusionConfig,
}

impl RiskFusionEngine {
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    /// Fuse the three inputs into a clamped risk score.
    ///
    /// risk = clamp(0.5·gesture + 0.3·stress + 0.2·motion, 0, 1) with the
    /// reference weights. Idempotent and monotonically non-decreasing in
    /// each input.
    pub fn fuse(&self, gesture: f32, stress: f32, motion: f32) -> f32 {
        (self.config.gesture_weight * gesture
            + self.config.stress_weight * stress
            + self.config.motion_weight * motion)
            .clamp(0.0, 1.0)
    }

    /// Classify a risk score: < 0.3 Safe, < 0.75 Moderate, else Danger
    pub fn classify(&self, risk: f32) -> RiskLevel {
        if risk < self.config.moderate_threshold {
            RiskLevel::Safe
        } else if risk < self.config.danger_threshold {
            RiskLevel::Moderate
        } else {
            RiskLevel::Danger
        }
    }

    /// Fuse, classify, and package the observability event
    pub fn evaluate(&self, gesture: f32, stress: f32, motion: f32, now_ms: u64) -> RiskUpdate {
        let risk_score = self.fuse(gesture, stress, motion);
        RiskUpdate {
            timestamp_ms: now_ms,
            risk_score,
            level: self.classify(risk_score),
            breakdown: RiskBreakdown {
                gesture: self.config.gesture_weight * gesture,
                stress: self.config.stress_weight * stress,
                motion: self.config.motion_weight * motion,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RiskFusionEngine {
        RiskFusionEngine::new(FusionConfig::default())
    }

    #[test]
    fn test_fuse_bounds() {
        let e = engine();
        for &g in &[0.0, 1.0] {
            for s in (0..=10).map(|i| i as f32 / 10.0) {
                for m in (0..=10).map(|i| i as f32 / 10.0) {
                    let risk = e.fuse(g, s, m);
                    assert!((0.0..=1.0).contains(&risk));
                }
            }
        }
    }

    #[test]
    fn test_fuse_monotone_in_each_input() {
        let e = engine();
        assert!(e.fuse(1.0, 0.5, 0.5) >= e.fuse(0.0, 0.5, 0.5));
        assert!(e.fuse(0.0, 0.8, 0.5) >= e.fuse(0.0, 0.2, 0.5));
        assert!(e.fuse(0.0, 0.5, 0.9) >= e.fuse(0.0, 0.5, 0.1));
    }

    #[test]
    fn test_reference_weights() {
        let e = engine();
        assert!((e.fuse(1.0, 0.0, 0.0) - 0.5).abs() < 1e-6);
        assert!((e.fuse(0.0, 1.0, 0.0) - 0.3).abs() < 1e-6);
        assert!((e.fuse(0.0, 0.0, 1.0) - 0.2).abs() < 1e-6);
        assert!((e.fuse(1.0, 1.0, 1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_classification_boundaries() {
        let e = engine();
        assert_eq!(e.classify(0.29999), RiskLevel::Safe);
        assert_eq!(e.classify(0.3), RiskLevel::Moderate);
        assert_eq!(e.classify(0.74999), RiskLevel::Moderate);
        assert_eq!(e.classify(0.75), RiskLevel::Danger);
    }

    #[test]
    fn test_fuse_idempotent() {
        let e = engine();
        assert_eq!(e.fuse(1.0, 0.37, 0.62), e.fuse(1.0, 0.37, 0.62));
    }

    #[test]
    fn test_evaluate_breakdown_sums_to_score() {
        let e = engine();
        let update = e.evaluate(1.0, 0.5, 0.25, 42);
        let sum = update.breakdown.gesture + update.breakdown.stress + update.breakdown.motion;
        assert!((sum - update.risk_score).abs() < 1e-6);
        assert_eq!(update.timestamp_ms, 42);
        assert_eq!(update.level, RiskLevel::Danger);
    }

    #[test]
    fn test_custom_weights_respected() {
        let config = FusionConfig {
            gesture_weight: 0.8,
            stress_weight: 0.1,
            motion_weight: 0.1,
            moderate_threshold: 0.2,
            danger_threshold: 0.6,
        };
        let e = RiskFusionEngine::new(config);
        assert!((e.fuse(1.0, 0.0, 0.0) - 0.8).abs() < 1e-6);
        assert_eq!(e.classify(0.61), RiskLevel::Danger);
    }
}
