// NoiseFloorTracker - rolling ambient energy estimate
//
// Keeps the RMS of the most recent non-voiced frames in a FIFO-bounded queue
// and reports their arithmetic mean. The stress engine uses the floor to
// decide when energy-based features have become unreliable.

use std::collections::VecDeque;

/// Maximum retained non-voiced RMS samples
const MAX_SAMPLES: usize = 20;

pub struct NoiseFloorTracker {
    samples: VecDeque<f32>,
}

impl NoiseFloorTracker {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(MAX_SAMPLES),
        }
    }

    /// Record the RMS of a frame classified as non-voiced
    pub fn record(&mut self, rms: f32) {
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back(rms);
    }

    /// Current floor: mean of retained samples, 0 when empty
    pub fn current(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

impl Default for NoiseFloorTracker {
    fn default() -> Self {
        Self::new()
    }
}
