// CalibrationTracker - warm-up baseline collection
//
// For a fixed warm-up window (5 s by default) every voiced feature window
// contributes its mean pitch, RMS, and spectral centroid to an accumulator.
// When the window elapses, the baseline becomes the arithmetic mean of the
// collected per-window means and is immutable from then on. Deviation from
// this personal baseline drives stress scoring, which avoids bias against
// naturally loud or high-pitched speakers.

use serde::{Deserialize, Serialize};

use crate::analysis::window::FeatureWindow;

/// Per-session expected feature values, immutable once computed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub pitch_hz: f32,
    pub rms: f32,
    pub centroid_hz: f32,
}

impl Baseline {
    /// True when every field carries real data. An all-zero baseline (nothing
    /// voiced during warm-up) sends inference down the absolute-threshold
    /// fallback path instead.
    pub fn is_usable(&self) -> bool {
        self.pitch_hz > 0.0 && self.rms > 0.0 && self.centroid_hz > 0.0
    }
}

/// Accumulates voiced-window statistics during the warm-up period
pub struct CalibrationTracker {
    duration_ms: u64,
    started_at_ms: Option<u64>,
    pitch_means: Vec<f32>,
    rms_means: Vec<f32>,
    centroid_means: Vec<f32>,
    baseline: Option<Baseline>,
}

impl CalibrationTracker {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            started_at_ms: None,
            pitch_means: Vec::new(),
            rms_means: Vec::new(),
            centroid_means: Vec::new(),
            baseline: None,
        }
    }

    /// Begin the warm-up collection window
    pub fn start(&mut self, now_ms: u64) {
        self.started_at_ms = Some(now_ms);
        self.pitch_means.clear();
        self.rms_means.clear();
        self.centroid_means.clear();
        self.baseline = None;
        tracing::info!(
            duration_ms = self.duration_ms,
            "calibration warm-up started"
        );
    }

    /// Record one voiced feature window's means.
    ///
    /// No-op before `start` or after completion. Finalizes the baseline once
    /// the warm-up duration has elapsed.
    pub fn observe_window(&mut self, window: &FeatureWindow, now_ms: u64) {
        let started = match self.started_at_ms {
            Some(ts) => ts,
            None => return,
        };
        if self.baseline.is_some() {
            return;
        }

        if now_ms.saturating_sub(started) >= self.duration_ms {
            self.finalize();
            return;
        }

        self.pitch_means.push(window.mean_pitch_voiced());
        self.rms_means.push(window.mean_rms());
        self.centroid_means.push(window.mean_centroid());
    }

    /// Finalize if the warm-up window has elapsed without a voiced observation
    /// landing after the deadline.
    pub fn poll(&mut self, now_ms: u64) {
        if let Some(started) = self.started_at_ms {
            if self.baseline.is_none() && now_ms.saturating_sub(started) >= self.duration_ms {
                self.finalize();
            }
        }
    }

    fn finalize(&mut self) {
        let baseline = Baseline {
            pitch_hz: mean_of(&self.pitch_means),
            rms: mean_of(&self.rms_means),
            centroid_hz: mean_of(&self.centroid_means),
        };
        tracing::info!(
            pitch_hz = baseline.pitch_hz,
            rms = baseline.rms,
            centroid_hz = baseline.centroid_hz,
            usable = baseline.is_usable(),
            windows = self.pitch_means.len(),
            "calibration complete"
        );
        self.baseline = Some(baseline);
    }

    pub fn is_complete(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn baseline(&self) -> Option<Baseline> {
        self.baseline
    }

    /// Discard all state for a fresh session
    pub fn reset(&mut self) {
        self.started_at_ms = None;
        self.pitch_means.clear();
        self.rms_means.clear();
        self.centroid_means.clear();
        self.baseline = None;
    }
}

fn mean_of(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::FeatureSet;

    fn voiced_window(pitch: f32, rms: f32, centroid: f32) -> FeatureWindow {
        let mut window = FeatureWindow::new(1_500);
        for i in 0..5u64 {
            window.push(
                i * 25,
                FeatureSet {
                    pitch_hz: pitch,
                    rms,
                    zcr: 0.1,
                    centroid_hz: centroid,
                    cepstrum: vec![0.0; 4],
                },
            );
        }
        window
    }

    #[test]
    fn test_incomplete_before_duration() {
        let mut tracker = CalibrationTracker::new(5_000);
        tracker.start(0);
        tracker.observe_window(&voiced_window(180.0, 0.1, 1_200.0), 1_000);
        assert!(!tracker.is_complete());
        assert!(tracker.baseline().is_none());
    }

    #[test]
    fn test_baseline_is_mean_of_window_means() {
        let mut tracker = CalibrationTracker::new(5_000);
        tracker.start(0);
        tracker.observe_window(&voiced_window(100.0, 0.10, 1_000.0), 1_000);
        tracker.observe_window(&voiced_window(200.0, 0.20, 2_000.0), 2_000);
        tracker.observe_window(&voiced_window(300.0, 0.30, 3_000.0), 3_000);
        tracker.poll(5_000);

        assert!(tracker.is_complete());
        let baseline = tracker.baseline().unwrap();
        assert!((baseline.pitch_hz - 200.0).abs() < 1e-3);
        assert!((baseline.rms - 0.20).abs() < 1e-6);
        assert!((baseline.centroid_hz - 2_000.0).abs() < 1e-2);
        assert!(baseline.is_usable());
    }

    #[test]
    fn test_silent_warmup_yields_unusable_baseline() {
        let mut tracker = CalibrationTracker::new(5_000);
        tracker.start(0);
        tracker.poll(5_000);

        assert!(tracker.is_complete());
        let baseline = tracker.baseline().unwrap();
        assert_eq!(baseline.pitch_hz, 0.0);
        assert!(!baseline.is_usable());
    }

    #[test]
    fn test_baseline_immutable_after_completion() {
        let mut tracker = CalibrationTracker::new(1_000);
        tracker.start(0);
        tracker.observe_window(&voiced_window(100.0, 0.1, 1_000.0), 500);
        tracker.poll(1_000);
        let first = tracker.baseline().unwrap();

        tracker.observe_window(&voiced_window(400.0, 0.9, 8_000.0), 1_500);
        assert_eq!(tracker.baseline().unwrap(), first);
    }

    #[test]
    fn test_observe_before_start_is_noop() {
        let mut tracker = CalibrationTracker::new(1_000);
        tracker.observe_window(&voiced_window(100.0, 0.1, 1_000.0), 0);
        tracker.poll(2_000);
        assert!(!tracker.is_complete());
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut tracker = CalibrationTracker::new(1_000);
        tracker.start(0);
        tracker.poll(1_000);
        assert!(tracker.is_complete());

        tracker.reset();
        assert!(!tracker.is_complete());
        assert!(tracker.baseline().is_none());
    }
}
