// End-to-end pipeline tests: raw audio frames and hand landmarks in,
// risk updates and emergency triggers out, on a simulated clock.

use std::sync::Arc;

use sentinel_core::emergency::{
    Contact, EmergencyState, GeoPoint, LocationProvider, StaticContactDirectory,
    StaticLocationProvider,
};
use sentinel_core::error::LocationError;
use sentinel_core::fusion::{RiskLevel, RiskUpdate};
use sentinel_core::gesture::{HandLandmarks, Landmark, LANDMARK_COUNT};
use sentinel_core::{AppConfig, MonitoringSession};

const FRAME_MS: u64 = 25;
const GESTURE_MS: u64 = 100;
const INFERENCE_MS: u64 = 500;
const TICK_MS: u64 = 1_000;

struct FailingLocation;

impl LocationProvider for FailingLocation {
    fn current_location(&self) -> Result<GeoPoint, LocationError> {
        Err(LocationError::Unavailable {
            reason: "no gps fix".to_string(),
        })
    }
}

/// Reference config with the ZCR band widened so synthetic sine voices pass
/// the activity gate the way real speech does.
fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.vad.zcr_min = 0.001;
    config.vad.zcr_max = 0.9;
    config
}

fn test_session() -> MonitoringSession {
    MonitoringSession::new(
        test_config(),
        Arc::new(StaticLocationProvider(GeoPoint {
            lat: 51.5074,
            lng: -0.1278,
        })),
        Arc::new(StaticContactDirectory(vec![Contact {
            name: "Jo".to_string(),
            phone: "+15550177".to_string(),
        }])),
    )
}

fn tone_frame(freq: f32, amplitude: f32) -> Vec<f32> {
    (0..400)
        .map(|i| {
            let t = i as f32 / 16_000.0;
            amplitude
                * ((2.0 * std::f32::consts::PI * freq * t).sin()
                    + 0.3 * (2.0 * std::f32::consts::PI * freq * 8.0 * t).sin())
        })
        .collect()
}

fn calm_frame() -> Vec<f32> {
    tone_frame(180.0, 0.5)
}

/// Higher pitch, much louder: strong deviation from a calm baseline
fn agitated_frame() -> Vec<f32> {
    tone_frame(320.0, 0.9)
}

fn fist() -> HandLandmarks {
    [Landmark { x: 0.5, y: 0.5 }; LANDMARK_COUNT]
}

/// Drives every cadence of one session over simulated wall-clock time
struct Harness {
    session: MonitoringSession,
    now_ms: u64,
}

impl Harness {
    fn new(session: MonitoringSession) -> Self {
        let mut h = Self { session, now_ms: 0 };
        h.session.start(0);
        h
    }

    /// Advance `duration_ms`, feeding the given inputs at their cadences:
    /// audio every 25 ms, gesture every 100 ms, stress inference every
    /// 500 ms, risk evaluation every 1000 ms. Returns the risk updates.
    fn run_phase(
        &mut self,
        duration_ms: u64,
        frame: &[f32],
        landmarks: Option<&HandLandmarks>,
        motion: f32,
    ) -> Vec<RiskUpdate> {
        self.session.set_motion_score(motion);
        let end = self.now_ms + duration_ms;
        let mut updates = Vec::new();

        while self.now_ms < end {
            self.now_ms += FRAME_MS;
            self.session.ingest_audio_frame(frame, self.now_ms);
            if self.now_ms % GESTURE_MS == 0 {
                self.session.update_gesture(landmarks, self.now_ms);
            }
            if self.now_ms % INFERENCE_MS == 0 {
                self.session.run_stress_inference(self.now_ms);
            }
            if self.now_ms % TICK_MS == 0 {
                updates.push(self.session.evaluate_tick(self.now_ms));
            }
        }
        updates
    }

    /// Calm voice, no hand, no motion, until the baseline is learned
    fn calibrate(&mut self) {
        self.run_phase(5_500, &calm_frame(), None, 0.0);
        assert!(!self.session.still_learning());
    }
}

#[test]
fn test_stress_gated_until_calibration_completes() {
    // Loud, deviated audio during warm-up must still score zero
    let mut h = Harness::new(test_session());
    let updates = h.run_phase(4_000, &agitated_frame(), None, 0.0);
    assert!(h.session.still_learning());
    assert_eq!(h.session.latest_stress(), 0.0);
    for update in &updates {
        assert_eq!(update.level, RiskLevel::Safe);
    }
}

#[test]
fn test_deviated_voice_registers_as_stress_after_calibration() {
    // Calm baseline first, then the same agitated audio scores high
    let mut h = Harness::new(test_session());
    h.calibrate();
    h.run_phase(4_000, &agitated_frame(), None, 0.0);
    assert!(h.session.latest_stress() > 0.1, "stress {}", h.session.latest_stress());
}

#[test]
fn test_full_pipeline_sustained_danger_triggers_once() {
    let mut h = Harness::new(test_session());
    let mut trigger_rx = h.session.subscribe_triggers();
    h.calibrate();

    // Agitated voice + held fist + hard motion, long past sustain + countdown
    let updates = h.run_phase(30_000, &agitated_frame(), Some(&fist()), 1.0);

    assert_eq!(h.session.emergency_state(), EmergencyState::Triggered);
    assert!(updates.iter().any(|u| u.level == RiskLevel::Danger));

    let trigger = trigger_rx.try_recv().expect("one trigger expected");
    assert_eq!(
        trigger.location,
        GeoPoint {
            lat: 51.5074,
            lng: -0.1278
        }
    );
    assert_eq!(trigger.contacts.len(), 1);
    assert_eq!(trigger.contacts[0].name, "Jo");
    assert!(trigger_rx.try_recv().is_err(), "trigger must fire once");

    // Continued danger after Triggered emits nothing further
    h.run_phase(10_000, &agitated_frame(), Some(&fist()), 1.0);
    assert!(trigger_rx.try_recv().is_err());
}

#[test]
fn test_cancel_during_prealert_aborts_trigger() {
    let mut h = Harness::new(test_session());
    let mut trigger_rx = h.session.subscribe_triggers();
    h.calibrate();

    // Escalate until the countdown starts
    let mut guard = 0;
    while h.session.emergency_state() != EmergencyState::PreAlert {
        h.run_phase(1_000, &agitated_frame(), Some(&fist()), 1.0);
        guard += 1;
        assert!(guard < 40, "never reached PreAlert");
    }
    assert!(h.session.countdown_remaining().is_some());

    assert!(h.session.cancel());
    assert_eq!(h.session.emergency_state(), EmergencyState::Idle);

    // User relaxes: risk collapses, and nothing fires afterwards
    h.run_phase(15_000, &calm_frame(), None, 0.0);
    assert_ne!(h.session.emergency_state(), EmergencyState::Triggered);
    assert!(trigger_rx.try_recv().is_err());
}

#[test]
fn test_manual_panic_with_failed_location_uses_fallback() {
    let mut session = MonitoringSession::new(
        test_config(),
        Arc::new(FailingLocation),
        Arc::new(StaticContactDirectory(vec![Contact {
            name: "Jo".to_string(),
            phone: "+15550177".to_string(),
        }])),
    );
    let mut trigger_rx = session.subscribe_triggers();
    session.start(0);

    session.panic();
    assert_eq!(session.emergency_state(), EmergencyState::PreAlert);

    // Quiet scene: the countdown runs on ticks alone
    let mut trigger = None;
    for i in 1..=6 {
        session.evaluate_tick(i * 1_000);
        if let Ok(t) = trigger_rx.try_recv() {
            trigger = Some(t);
        }
    }
    let trigger = trigger.expect("panic countdown should complete");
    assert_eq!(trigger.location, GeoPoint::FALLBACK);
    assert_eq!(trigger.contacts.len(), 1);
    assert_eq!(session.emergency_state(), EmergencyState::Triggered);
}

#[test]
fn test_gesture_hold_gates_risk_contribution() {
    let mut session = test_session();
    session.start(0);

    // Fist held but not yet for the full duration: contributes nothing
    let reading = session.update_gesture(Some(&fist()), 0);
    assert_eq!(reading.fist_confidence, 1.0);
    assert_eq!(reading.score, 0.0);
    assert_eq!(session.update_gesture(Some(&fist()), 1_999).score, 0.0);
    let update = session.evaluate_tick(1_999);
    assert_eq!(update.level, RiskLevel::Safe);

    // Hold completes: gesture alone lifts risk to Moderate (0.5 weight)
    let reading = session.update_gesture(Some(&fist()), 2_000);
    assert!(reading.asserted());
    let update = session.evaluate_tick(2_000);
    assert!((update.risk_score - 0.5).abs() < 1e-6);
    assert_eq!(update.level, RiskLevel::Moderate);
    assert!((update.breakdown.gesture - 0.5).abs() < 1e-6);
}

#[test]
fn test_risk_updates_are_broadcast_each_tick() {
    let mut h = Harness::new(test_session());
    let mut rx = h.session.subscribe_risk();

    let updates = h.run_phase(3_000, &calm_frame(), None, 0.4);
    assert_eq!(updates.len(), 3);

    let mut received = Vec::new();
    while let Ok(u) = rx.try_recv() {
        received.push(u);
    }
    assert_eq!(received.len(), 3);
    for (sent, got) in updates.iter().zip(&received) {
        assert_eq!(sent.timestamp_ms, got.timestamp_ms);
        assert_eq!(sent.risk_score, got.risk_score);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_runtime_drives_session_in_real_time() {
    use sentinel_core::SessionRuntime;

    let mut rt = SessionRuntime::new(test_session());
    let mut rx = rt.subscribe_risk();
    rt.start().expect("start");

    for _ in 0..10 {
        rt.ingest_audio_frame(&calm_frame());
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
    }
    tokio::time::sleep(std::time::Duration::from_millis(1_200)).await;

    let mut received = 0;
    while rx.try_recv().is_ok() {
        received += 1;
    }
    assert!(received >= 1, "expected at least one tick, got {received}");

    rt.stop().expect("stop");
    assert!(!rt.is_running());
}
