//! Configuration management for dynamic parameter tuning
//!
//! All detection parameters — fusion weights, risk thresholds, calibration
//! duration, gesture hold timing, VAD thresholds — live here with the
//! reference defaults, and can be overridden from a JSON file for fast
//! iteration without recompilation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub audio: AudioConfig,
    pub vad: VadConfig,
    pub calibration: CalibrationConfig,
    pub stress: StressConfig,
    pub smoother: SmootherConfig,
    pub gesture: GestureConfig,
    pub fusion: FusionConfig,
    pub emergency: EmergencyConfig,
}

/// Audio frame and feature extraction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Frame length in samples (25 ms at 16 kHz)
    pub frame_size: usize,
    /// Number of cepstral coefficients per frame
    pub cepstral_coeff_count: usize,
    /// Rolling feature window span in milliseconds
    pub window_span_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            frame_size: 400,
            cepstral_coeff_count: 40,
            window_span_ms: 1_500,
        }
    }
}

/// Voice activity gate thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VadConfig {
    /// Minimum RMS for a frame to count as voiced
    pub energy_threshold: f32,
    /// Lower ZCR bound (below: tonal hum or silence)
    pub zcr_min: f32,
    /// Upper ZCR bound (above: broadband noise / sibilance only)
    pub zcr_max: f32,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            energy_threshold: 0.015,
            zcr_min: 0.05,
            zcr_max: 0.35,
        }
    }
}

/// Baseline calibration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Warm-up collection window in milliseconds
    pub duration_ms: u64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self { duration_ms: 5_000 }
    }
}

/// Stress inference weights and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressConfig {
    /// Weight of pitch deviation in the combined score
    pub pitch_weight: f32,
    /// Weight of RMS deviation
    pub rms_weight: f32,
    /// Weight of cepstral temporal variance
    pub cepstral_weight: f32,
    /// Weight of spectral centroid deviation
    pub centroid_weight: f32,
    /// Weight of ZCR variance
    pub zcr_weight: f32,
    /// Maximum upward movement per evaluation step
    pub spike_limit: f32,
    /// Mean window RMS below this yields a zero score outright
    pub voice_presence_rms: f32,
    /// Ambient noise floor above this triggers the weight shift
    pub high_noise_floor: f32,
    /// Fraction of the RMS weight moved onto pitch under high noise
    pub noise_shift_fraction: f32,
    /// Fallback scaling: pitch standard deviation divisor (Hz)
    pub pitch_variability_divisor: f32,
    /// Fallback scaling: RMS variance divisor
    pub rms_variance_divisor: f32,
    /// Fallback scaling: spectral centroid divisor (Hz)
    pub centroid_divisor: f32,
    /// Cepstral flux divisor
    pub cepstral_flux_divisor: f32,
    /// ZCR variance divisor
    pub zcr_variance_divisor: f32,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            pitch_weight: 0.30,
            rms_weight: 0.25,
            cepstral_weight: 0.20,
            centroid_weight: 0.15,
            zcr_weight: 0.10,
            spike_limit: 0.15,
            voice_presence_rms: 0.01,
            high_noise_floor: 0.05,
            noise_shift_fraction: 0.20,
            pitch_variability_divisor: 60.0,
            rms_variance_divisor: 0.005,
            centroid_divisor: 4_000.0,
            cepstral_flux_divisor: 4.0,
            zcr_variance_divisor: 0.02,
        }
    }
}

/// Temporal smoother parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmootherConfig {
    /// Trailing retention window in seconds
    pub window_seconds: f32,
    /// EMA smoothing factor
    pub alpha: f32,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            window_seconds: 3.0,
            alpha: 0.3,
        }
    }
}

/// Fist gesture detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Max fingertip-to-palm distance (normalized coords) to count as curled
    pub fingertip_distance_threshold: f32,
    /// Confidence above which the hand counts as currently fisted
    pub fist_confidence_threshold: f32,
    /// Continuous hold required before the gesture asserts, in milliseconds
    pub hold_duration_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            fingertip_distance_threshold: 0.12,
            fist_confidence_threshold: 0.6,
            hold_duration_ms: 2_000,
        }
    }
}

/// Risk fusion weights and classification cut points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionConfig {
    pub gesture_weight: f32,
    pub stress_weight: f32,
    pub motion_weight: f32,
    /// Risk at or above this classifies as Moderate
    pub moderate_threshold: f32,
    /// Risk at or above this classifies as Danger
    pub danger_threshold: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            gesture_weight: 0.5,
            stress_weight: 0.3,
            motion_weight: 0.2,
            moderate_threshold: 0.3,
            danger_threshold: 0.75,
        }
    }
}

/// Emergency state machine timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyConfig {
    /// Risk must stay above the danger threshold this long before PreAlert
    pub sustain_duration_ms: u64,
    /// PreAlert countdown length in seconds (one decrement per tick)
    pub countdown_seconds: u32,
    /// Risk evaluation tick interval in milliseconds
    pub tick_interval_ms: u64,
    /// Stress inference interval in milliseconds
    pub audio_interval_ms: u64,
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self {
            sustain_duration_ms: 5_000,
            countdown_seconds: 5,
            tick_interval_ms: 1_000,
            audio_interval_ms: 500,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, falling back to defaults if the
    /// file is missing or malformed. Monitoring must come up regardless.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
