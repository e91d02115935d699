// FFT module - magnitude spectrum computation
//
// Hann windowing is applied before the transform to reduce spectral leakage.
// The forward plan is built once at construction; frames shorter than the
// FFT size are zero-padded.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// FFT processor that computes magnitude spectra from audio frames
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Pre-computed Hann window
    window: Vec<f32>,
}

impl FftProcessor {
    /// Create a processor for the given FFT size (power of two)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        let denom = (fft_size.max(2) - 1) as f32;
        let window = (0..fft_size)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
            .collect();

        Self {
            fft,
            fft_size,
            window,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Compute the magnitude spectrum of one frame.
    ///
    /// Returns positive-frequency bins only (`fft_size / 2 + 1` values).
    /// Frames longer than the FFT size are truncated, shorter ones padded.
    pub fn magnitude_spectrum(&self, frame: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .take(self.fft_size)
            .zip(self.window.iter())
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer[..self.fft_size / 2 + 1]
            .iter()
            .map(|c| c.norm())
            .collect()
    }
}
