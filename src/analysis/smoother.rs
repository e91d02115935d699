// TemporalSmoother - time-windowed exponential moving average
//
// Smooths any bounded scalar signal (stress here, but nothing in the type
// assumes that). Samples older than the trailing window are evicted; the EMA
// carries the recency weighting, while windowAverage/isStable/isTrendingUp
// answer questions about the retained raw samples.

use std::collections::VecDeque;

use crate::config::SmootherConfig;

/// Standard deviation below which the retained samples count as stable
const STABILITY_STDDEV: f32 = 0.1;

pub struct TemporalSmoother {
    samples: VecDeque<(f32, u64)>,
    ema: Option<f32>,
    window_ms: u64,
    alpha: f32,
}

impl TemporalSmoother {
    pub fn new(config: &SmootherConfig) -> Self {
        Self {
            samples: VecDeque::new(),
            ema: None,
            window_ms: (config.window_seconds * 1_000.0) as u64,
            alpha: config.alpha,
        }
    }

    /// Add a sample, evict stale ones, and update the EMA.
    ///
    /// The first sample seeds the EMA directly; afterwards
    /// EMA = alpha * value + (1 - alpha) * EMA.
    pub fn add_sample(&mut self, value: f32, timestamp_ms: u64) {
        self.samples.push_back((value, timestamp_ms));

        let cutoff = timestamp_ms.saturating_sub(self.window_ms);
        while let Some(&(_, ts)) = self.samples.front() {
            if ts < cutoff {
                self.samples.pop_front();
            } else {
                break;
            }
        }

        self.ema = Some(match self.ema {
            None => value,
            Some(ema) => self.alpha * value + (1.0 - self.alpha) * ema,
        });
    }

    /// Current EMA, 0 before any sample
    pub fn smoothed(&self) -> f32 {
        self.ema.unwrap_or(0.0)
    }

    /// Plain mean of retained samples, 0 when empty
    pub fn window_average(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().map(|(v, _)| v).sum::<f32>() / self.samples.len() as f32
    }

    /// True when the standard deviation of retained samples is below 0.1
    pub fn is_stable(&self) -> bool {
        if self.samples.len() < 2 {
            return true;
        }
        let mean = self.window_average();
        let variance = self
            .samples
            .iter()
            .map(|(v, _)| (v - mean).powi(2))
            .sum::<f32>()
            / self.samples.len() as f32;
        variance.sqrt() < STABILITY_STDDEV
    }

    /// True when the three most recent samples are strictly increasing
    pub fn is_trending_up(&self) -> bool {
        if self.samples.len() < 3 {
            return false;
        }
        let n = self.samples.len();
        let a = self.samples[n - 3].0;
        let b = self.samples[n - 2].0;
        let c = self.samples[n - 1].0;
        a < b && b < c
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.ema = None;
    }
}
