// Pitch module - autocorrelation F0 estimation
//
// The estimator searches the lag range corresponding to 80-400 Hz, which
// covers adult speech. Correlation is normalized so the acceptance floor is
// independent of signal level; frames with no peak above the floor are
// reported as unvoiced (0.0).

/// Minimum F0 considered, in Hz
const MIN_F0_HZ: f32 = 80.0;
/// Maximum F0 considered, in Hz
const MAX_F0_HZ: f32 = 400.0;
/// Normalized correlation below this is treated as unvoiced
const CORRELATION_FLOOR: f64 = 0.3;

/// Autocorrelation-based fundamental frequency estimator
pub struct PitchEstimator {
    sample_rate: u32,
    min_lag: usize,
    max_lag: usize,
}

impl PitchEstimator {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            min_lag: (sample_rate as f32 / MAX_F0_HZ) as usize,
            max_lag: (sample_rate as f32 / MIN_F0_HZ) as usize,
        }
    }

    /// Estimate F0 for one frame; 0.0 when unvoiced or the frame is too short.
    pub fn estimate(&self, frame: &[f32]) -> f32 {
        let max_lag = self.max_lag.min(frame.len() / 2);
        if self.min_lag >= max_lag {
            return 0.0;
        }

        // Energy at lag zero, for normalization
        let r0: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
        if r0 < 1e-10 {
            return 0.0;
        }

        let mut best_lag = 0;
        let mut best_corr = CORRELATION_FLOOR;

        for lag in self.min_lag..max_lag {
            let mut corr: f64 = 0.0;
            let mut norm: f64 = 0.0;
            for i in 0..(frame.len() - lag) {
                corr += frame[i] as f64 * frame[i + lag] as f64;
                norm += frame[i + lag] as f64 * frame[i + lag] as f64;
            }

            let normalized = if norm > 1e-10 {
                corr / (r0 * norm).sqrt()
            } else {
                0.0
            };

            if normalized > best_corr {
                best_corr = normalized;
                best_lag = lag;
            }
        }

        if best_lag == 0 {
            0.0
        } else {
            self.sample_rate as f32 / best_lag as f32
        }
    }
}
