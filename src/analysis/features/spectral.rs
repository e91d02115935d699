// Spectral module - frequency-domain feature extraction
//
// Computes the spectral centroid and mel-cepstral coefficients from a
// magnitude spectrum. The cepstral pipeline is the standard one: triangular
// mel filterbank, log energies, DCT-II.
//
// References:
// - Davis, S. & Mermelstein, P. (1980). Comparison of parametric
//   representations for monosyllabic word recognition

use std::f32::consts::PI;

/// Spectral feature computation over magnitude spectra
pub struct SpectralAnalyzer {
    sample_rate: u32,
    fft_size: usize,
    coeff_count: usize,
    /// Triangular mel filters as (bin index, weight) pairs
    filterbank: Vec<Vec<(usize, f32)>>,
}

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

impl SpectralAnalyzer {
    pub fn new(sample_rate: u32, fft_size: usize, coeff_count: usize) -> Self {
        let filterbank = Self::build_filterbank(sample_rate, fft_size, coeff_count);
        Self {
            sample_rate,
            fft_size,
            coeff_count,
            filterbank,
        }
    }

    /// Build `coeff_count` triangular filters evenly spaced on the mel scale
    /// between 0 Hz and Nyquist.
    fn build_filterbank(
        sample_rate: u32,
        fft_size: usize,
        filter_count: usize,
    ) -> Vec<Vec<(usize, f32)>> {
        let nyquist = sample_rate as f32 / 2.0;
        let max_mel = hz_to_mel(nyquist);
        let bin_width = sample_rate as f32 / fft_size as f32;
        let spectrum_len = fft_size / 2 + 1;

        // filter_count filters need filter_count + 2 edge points
        let edges: Vec<f32> = (0..filter_count + 2)
            .map(|i| mel_to_hz(max_mel * i as f32 / (filter_count + 1) as f32))
            .collect();

        (0..filter_count)
            .map(|f| {
                let (lo, center, hi) = (edges[f], edges[f + 1], edges[f + 2]);
                let mut taps = Vec::new();
                for bin in 0..spectrum_len {
                    let freq = bin as f32 * bin_width;
                    let weight = if freq > lo && freq < center {
                        (freq - lo) / (center - lo).max(1e-10)
                    } else if freq >= center && freq < hi {
                        (hi - freq) / (hi - center).max(1e-10)
                    } else {
                        0.0
                    };
                    if weight > 0.0 {
                        taps.push((bin, weight));
                    }
                }
                taps
            })
            .collect()
    }

    /// Compute spectral centroid (energy-weighted mean frequency) in Hz.
    ///
    /// centroid = Σ(f_i × |X[i]|) / Σ|X[i]|, 0 for an empty spectrum.
    pub fn centroid(&self, spectrum: &[f32]) -> f32 {
        let bin_width = self.sample_rate as f32 / self.fft_size as f32;

        let weighted_sum: f32 = spectrum
            .iter()
            .enumerate()
            .map(|(i, &mag)| i as f32 * bin_width * mag)
            .sum();
        let magnitude_sum: f32 = spectrum.iter().sum();

        if magnitude_sum > 1e-10 {
            weighted_sum / magnitude_sum
        } else {
            0.0
        }
    }

    /// Compute mel-cepstral coefficients from a magnitude spectrum.
    ///
    /// Filterbank energies are floored before the log so silent frames
    /// produce finite coefficients.
    pub fn cepstrum(&self, spectrum: &[f32]) -> Vec<f32> {
        let log_energies: Vec<f32> = self
            .filterbank
            .iter()
            .map(|taps| {
                let energy: f32 = taps
                    .iter()
                    .map(|&(bin, w)| spectrum.get(bin).copied().unwrap_or(0.0) * w)
                    .sum();
                energy.max(1e-10).ln()
            })
            .collect();

        // DCT-II over the log filterbank energies
        let n = log_energies.len() as f32;
        (0..self.coeff_count)
            .map(|k| {
                log_energies
                    .iter()
                    .enumerate()
                    .map(|(m, &e)| e * (PI * k as f32 * (m as f32 + 0.5) / n).cos())
                    .sum::<f32>()
            })
            .collect()
    }
}
