// FeatureWindow - rolling span of per-frame features
//
// Holds roughly 1.5 s of timestamped FeatureSets and exposes the statistics
// stress inference needs: per-field means, variances, and the frame-to-frame
// cepstral flux. Frames older than the span are evicted as new ones arrive.

use std::collections::VecDeque;

use crate::analysis::features::FeatureSet;

pub struct FeatureWindow {
    frames: VecDeque<(u64, FeatureSet)>,
    span_ms: u64,
}

impl FeatureWindow {
    pub fn new(span_ms: u64) -> Self {
        Self {
            frames: VecDeque::new(),
            span_ms,
        }
    }

    /// Append a frame and evict everything older than the span
    pub fn push(&mut self, timestamp_ms: u64, features: FeatureSet) {
        self.frames.push_back((timestamp_ms, features));
        let cutoff = timestamp_ms.saturating_sub(self.span_ms);
        while let Some(&(ts, _)) = self.frames.front() {
            if ts < cutoff {
                self.frames.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn mean_rms(&self) -> f32 {
        mean(self.frames.iter().map(|(_, f)| f.rms))
    }

    pub fn mean_centroid(&self) -> f32 {
        mean(self.frames.iter().map(|(_, f)| f.centroid_hz))
    }

    /// Mean pitch over voiced frames only (pitch > 0); 0 if none are voiced
    pub fn mean_pitch_voiced(&self) -> f32 {
        mean(
            self.frames
                .iter()
                .map(|(_, f)| f.pitch_hz)
                .filter(|&p| p > 0.0),
        )
    }

    /// Pitch standard deviation over voiced frames only
    pub fn pitch_std_voiced(&self) -> f32 {
        let pitches: Vec<f32> = self
            .frames
            .iter()
            .map(|(_, f)| f.pitch_hz)
            .filter(|&p| p > 0.0)
            .collect();
        variance(&pitches).sqrt()
    }

    pub fn rms_variance(&self) -> f32 {
        let values: Vec<f32> = self.frames.iter().map(|(_, f)| f.rms).collect();
        variance(&values)
    }

    pub fn zcr_variance(&self) -> f32 {
        let values: Vec<f32> = self.frames.iter().map(|(_, f)| f.zcr).collect();
        variance(&values)
    }

    /// Cepstral temporal flux: Euclidean distance between consecutive
    /// cepstral vectors, RMS-averaged over the window and normalized by
    /// coefficient count. High flux means rapidly shifting timbre.
    pub fn cepstral_flux(&self) -> f32 {
        if self.frames.len() < 2 {
            return 0.0;
        }

        let mut sum_sq = 0.0_f32;
        let mut pairs = 0usize;
        let mut iter = self.frames.iter().map(|(_, f)| &f.cepstrum).peekable();
        while let Some(current) = iter.next() {
            if let Some(&next) = iter.peek() {
                let coeffs = current.len().min(next.len());
                if coeffs == 0 {
                    continue;
                }
                let dist_sq: f32 = current
                    .iter()
                    .zip(next.iter())
                    .map(|(a, b)| (a - b).powi(2))
                    .sum();
                sum_sq += dist_sq / coeffs as f32;
                pairs += 1;
            }
        }

        if pairs == 0 {
            0.0
        } else {
            (sum_sq / pairs as f32).sqrt()
        }
    }
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let mut sum = 0.0_f32;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

fn variance(values: &[f32]) -> f32 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = values.iter().sum::<f32>() / values.len() as f32;
    values.iter().map(|v| (v - m).powi(2)).sum::<f32>() / values.len() as f32
}
