// MonitoringSession - per-session owned state and cadence entry points
//
// One session owns one instance of every tracker; nothing is global. Three
// independent cadences drive it: per-frame audio ingestion plus a 2 Hz
// stress inference pass, per-video-frame gesture scoring, and a 1 Hz risk
// evaluation tick. Cadences share state only through the latest published
// scalar scores; each tracker is written by exactly one cadence.
//
// Risk updates and emergency triggers are published on broadcast channels so
// UI/notification collaborators can subscribe without coupling.

pub mod runtime;

use tokio::sync::broadcast;

use std::sync::Arc;

use crate::analysis::{
    FeatureExtractor, FeatureWindow, StressInferenceEngine, TemporalSmoother, VoiceActivityGate,
};
use crate::calibration::{CalibrationTracker, NoiseFloorTracker};
use crate::config::AppConfig;
use crate::emergency::{
    ContactDirectory, EmergencyStateMachine, EmergencyTrigger, EmergencyState, LocationProvider,
};
use crate::fusion::{RiskFusionEngine, RiskUpdate};
use crate::gesture::{GestureReading, GestureScorer, HandLandmarks};

/// Broadcast buffer for risk updates (1 Hz; slow subscribers lag, not block)
const RISK_CHANNEL_CAPACITY: usize = 64;
/// Trigger channel is effectively once-per-session
const TRIGGER_CHANNEL_CAPACITY: usize = 4;

pub struct MonitoringSession {
    config: AppConfig,

    // Audio cadence
    extractor: FeatureExtractor,
    vad: VoiceActivityGate,
    window: FeatureWindow,
    calibration: CalibrationTracker,
    noise_floor: NoiseFloorTracker,
    stress: StressInferenceEngine,
    smoother: TemporalSmoother,

    // Gesture cadence
    gesture: GestureScorer,

    // Evaluation cadence
    fusion: RiskFusionEngine,
    machine: EmergencyStateMachine,

    // Latest published values, read by the evaluation tick
    latest_stress: f32,
    latest_gesture: f32,
    latest_motion: f32,

    risk_tx: broadcast::Sender<RiskUpdate>,
    trigger_tx: broadcast::Sender<EmergencyTrigger>,
}

impl MonitoringSession {
    pub fn new(
        config: AppConfig,
        location: Arc<dyn LocationProvider>,
        contacts: Arc<dyn ContactDirectory>,
    ) -> Self {
        let (risk_tx, _) = broadcast::channel(RISK_CHANNEL_CAPACITY);
        let (trigger_tx, _) = broadcast::channel(TRIGGER_CHANNEL_CAPACITY);

        Self {
            extractor: FeatureExtractor::new(
                config.audio.sample_rate,
                config.audio.frame_size,
                config.audio.cepstral_coeff_count,
            ),
            vad: VoiceActivityGate::new(config.vad.clone()),
            window: FeatureWindow::new(config.audio.window_span_ms),
            calibration: CalibrationTracker::new(config.calibration.duration_ms),
            noise_floor: NoiseFloorTracker::new(),
            stress: StressInferenceEngine::new(config.stress.clone()),
            smoother: TemporalSmoother::new(&config.smoother),
            gesture: GestureScorer::new(config.gesture.clone()),
            fusion: RiskFusionEngine::new(config.fusion.clone()),
            machine: EmergencyStateMachine::new(
                config.emergency.clone(),
                config.fusion.danger_threshold,
                location,
                contacts,
            ),
            latest_stress: 0.0,
            latest_gesture: 0.0,
            latest_motion: 0.0,
            risk_tx,
            trigger_tx,
            config,
        }
    }

    /// Begin the session: opens the calibration warm-up window
    pub fn start(&mut self, now_ms: u64) {
        self.reset(now_ms);
        self.calibration.start(now_ms);
        tracing::info!("monitoring session started");
    }

    /// Audio cadence: ingest one raw mono frame.
    ///
    /// Voiced frames feed the feature window and calibration; non-voiced
    /// frames feed the noise floor. Malformed frames degrade to neutral
    /// features and simply dilute the window — never an error.
    pub fn ingest_audio_frame(&mut self, frame: &[f32], now_ms: u64) {
        let features = self.extractor.extract(frame);
        let voiced = self.vad.is_voiced(&features);

        if voiced {
            self.window.push(now_ms, features);
            self.calibration.observe_window(&self.window, now_ms);
        } else {
            self.noise_floor.record(features.rms);
            self.window.push(now_ms, features);
            self.calibration.poll(now_ms);
        }
    }

    /// Audio cadence, 2 Hz: run stress inference and publish the smoothed
    /// score. Forced to zero until calibration completes.
    pub fn run_stress_inference(&mut self, now_ms: u64) -> f32 {
        self.calibration.poll(now_ms);

        let raw = if self.calibration.is_complete() {
            self.stress.compute_score(
                &self.window,
                self.calibration.baseline().as_ref(),
                self.noise_floor.current(),
            )
        } else {
            0.0
        };

        self.smoother.add_sample(raw, now_ms);
        self.latest_stress = self.smoother.smoothed();
        tracing::trace!(
            raw,
            smoothed = self.latest_stress,
            noise_floor = self.noise_floor.current(),
            "stress inference"
        );
        self.latest_stress
    }

    /// Gesture cadence: score one video frame's landmarks (or lack thereof)
    pub fn update_gesture(
        &mut self,
        landmarks: Option<&HandLandmarks>,
        now_ms: u64,
    ) -> GestureReading {
        let reading = self.gesture.update(landmarks, now_ms);
        self.latest_gesture = reading.score;
        reading
    }

    /// Publish the latest motion score (source external, clamped here)
    pub fn set_motion_score(&mut self, score: f32) {
        self.latest_motion = score.clamp(0.0, 1.0);
    }

    /// Evaluation cadence, 1 Hz: fuse the latest published values, broadcast
    /// the RiskUpdate, and advance the emergency state machine.
    pub fn evaluate_tick(&mut self, now_ms: u64) -> RiskUpdate {
        let update = self.fusion.evaluate(
            self.latest_gesture,
            self.latest_stress,
            self.latest_motion,
            now_ms,
        );
        let _ = self.risk_tx.send(update.clone());

        if let Some(trigger) = self.machine.evaluate(update.risk_score, now_ms) {
            let _ = self.trigger_tx.send(trigger);
        }

        update
    }

    /// Manual panic input: force PreAlert from Idle or Sustaining
    pub fn panic(&mut self) {
        self.machine.manual_panic();
    }

    /// Cancel a pending pre-alert countdown; no-op outside PreAlert
    pub fn cancel(&mut self) -> bool {
        self.machine.cancel()
    }

    /// True while the baseline is still being learned (callers can surface a
    /// "still learning" indicator)
    pub fn still_learning(&self) -> bool {
        !self.calibration.is_complete()
    }

    pub fn emergency_state(&self) -> EmergencyState {
        self.machine.state()
    }

    pub fn countdown_remaining(&self) -> Option<u32> {
        self.machine.countdown_remaining()
    }

    pub fn latest_stress(&self) -> f32 {
        self.latest_stress
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn subscribe_risk(&self) -> broadcast::Receiver<RiskUpdate> {
        self.risk_tx.subscribe()
    }

    pub fn subscribe_triggers(&self) -> broadcast::Receiver<EmergencyTrigger> {
        self.trigger_tx.subscribe()
    }

    /// Reset every tracker to initial state. Nothing leaks into the next
    /// session: baseline, noise floor, limiter, smoother, gesture hold, and
    /// machine phase all clear.
    pub fn reset(&mut self, _now_ms: u64) {
        self.window.clear();
        self.calibration.reset();
        self.noise_floor.reset();
        self.stress.reset();
        self.smoother.reset();
        self.gesture.reset();
        self.machine.reset();
        self.latest_stress = 0.0;
        self.latest_gesture = 0.0;
        self.latest_motion = 0.0;
    }
}
