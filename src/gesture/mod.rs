// GestureScorer - fist detection with hold confirmation
//
// Works on 21-point normalized hand landmarks (MediaPipe-style ordering).
// Fist confidence is the fraction of non-thumb fingertips pulled within a
// threshold distance of the palm center; the discrete gesture signal asserts
// only after the fist has been held continuously for the configured
// duration. A momentary pose during fast hand motion therefore never fires.

use crate::config::GestureConfig;

/// Number of landmarks per hand
pub const LANDMARK_COUNT: usize = 21;

/// Wrist plus the four finger MCP knuckles approximate the palm center
const PALM_LANDMARKS: [usize; 5] = [0, 5, 9, 13, 17];

/// Index, middle, ring, pinky tips. The thumb is excluded: its curl
/// geometry differs and would dilute the distance test.
const FINGERTIP_LANDMARKS: [usize; 4] = [8, 12, 16, 20];

/// One normalized hand keypoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

/// A full set of hand landmarks for one video frame
pub type HandLandmarks = [Landmark; LANDMARK_COUNT];

/// Result of one gesture update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureReading {
    /// Fraction of fingertips within the fist distance threshold (0-1)
    pub fist_confidence: f32,
    /// Discrete gesture signal: 1.0 once the hold completes, else 0.0
    pub score: f32,
    /// Hold completion fraction (0-1)
    pub hold_progress: f32,
}

impl GestureReading {
    fn none() -> Self {
        Self {
            fist_confidence: 0.0,
            score: 0.0,
            hold_progress: 0.0,
        }
    }

    pub fn asserted(&self) -> bool {
        self.score >= 1.0
    }
}

pub struct GestureScorer {
    config: GestureConfig,
    hold_start_ms: Option<u64>,
    asserted: bool,
}

impl GestureScorer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            hold_start_ms: None,
            asserted: false,
        }
    }

    /// Score one video frame.
    ///
    /// `None` landmarks (no hand tracked) resets the hold entirely.
    pub fn update(&mut self, landmarks: Option<&HandLandmarks>, now_ms: u64) -> GestureReading {
        let landmarks = match landmarks {
            Some(l) => l,
            None => {
                self.reset_hold();
                return GestureReading::none();
            }
        };

        let confidence = self.fist_confidence(landmarks);

        if confidence > self.config.fist_confidence_threshold {
            let start = *self.hold_start_ms.get_or_insert(now_ms);
            let held_ms = now_ms.saturating_sub(start);
            if held_ms >= self.config.hold_duration_ms {
                self.asserted = true;
            }
            GestureReading {
                fist_confidence: confidence,
                score: if self.asserted { 1.0 } else { 0.0 },
                hold_progress: (held_ms as f32 / self.config.hold_duration_ms as f32).min(1.0),
            }
        } else {
            self.reset_hold();
            GestureReading {
                fist_confidence: confidence,
                score: 0.0,
                hold_progress: 0.0,
            }
        }
    }

    fn fist_confidence(&self, landmarks: &HandLandmarks) -> f32 {
        let palm_x: f32 = PALM_LANDMARKS.iter().map(|&i| landmarks[i].x).sum::<f32>()
            / PALM_LANDMARKS.len() as f32;
        let palm_y: f32 = PALM_LANDMARKS.iter().map(|&i| landmarks[i].y).sum::<f32>()
            / PALM_LANDMARKS.len() as f32;

        let curled = FINGERTIP_LANDMARKS
            .iter()
            .filter(|&&i| {
                let dx = landmarks[i].x - palm_x;
                let dy = landmarks[i].y - palm_y;
                (dx * dx + dy * dy).sqrt() < self.config.fingertip_distance_threshold
            })
            .count();

        curled as f32 / FINGERTIP_LANDMARKS.len() as f32
    }

    fn reset_hold(&mut self) {
        self.hold_start_ms = None;
        self.asserted = false;
    }

    /// Reset all state for a new session
    pub fn reset(&mut self) {
        self.reset_hold();
    }
}
