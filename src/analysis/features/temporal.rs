// Temporal module - time-domain features
//
// RMS is the loudness proxy feeding the voice gate and noise floor; ZCR
// separates tonal content from broadband noise.

/// Root-mean-square amplitude of a frame
pub fn compute_rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    (frame.iter().map(|&s| s * s).sum::<f32>() / frame.len() as f32).sqrt()
}

/// Zero-crossing rate: fraction of adjacent-sample sign changes (0.0 to 1.0)
pub fn compute_zcr(frame: &[f32]) -> f32 {
    if frame.len() < 2 {
        return 0.0;
    }

    let crossings = frame
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();

    crossings as f32 / (frame.len() - 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_of_constant() {
        let rms = compute_rms(&[0.5; 100]);
        assert!((rms - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rms_empty() {
        assert_eq!(compute_rms(&[]), 0.0);
    }

    #[test]
    fn test_zcr_alternating() {
        let frame: Vec<f32> = (0..100).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert!((compute_zcr(&frame) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zcr_constant_sign() {
        assert_eq!(compute_zcr(&[0.3; 50]), 0.0);
    }

    #[test]
    fn test_zcr_low_freq_sine_below_noise() {
        let sine: Vec<f32> = (0..400)
            .map(|i| (2.0 * std::f32::consts::PI * 100.0 * i as f32 / 16_000.0).sin())
            .collect();
        // 100 Hz at 16 kHz crosses zero ~200 times/sec => zcr ~0.0125
        assert!(compute_zcr(&sine) < 0.05);
    }
}
