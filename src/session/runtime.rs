// SessionRuntime - timer-driven cadence scheduling
//
// Wraps a MonitoringSession in the two tokio interval tickers the reference
// design calls for: risk evaluation at 1 Hz and stress inference at 2 Hz.
// Gesture scoring and frame ingestion stay push-driven through the handle.
// Suspension is modeled as stopping tick delivery: a watch signal plus task
// abort, followed by a synchronous session reset, so no stale tracker state
// survives into the next session.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::SessionError;
use crate::fusion::RiskUpdate;
use crate::gesture::{GestureReading, HandLandmarks};
use crate::session::MonitoringSession;

pub struct SessionRuntime {
    session: Arc<Mutex<MonitoringSession>>,
    started_at: Instant,
    shutdown_tx: Option<watch::Sender<bool>>,
    tasks: Vec<JoinHandle<()>>,
}

impl SessionRuntime {
    pub fn new(session: MonitoringSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            started_at: Instant::now(),
            shutdown_tx: None,
            tasks: Vec::new(),
        }
    }

    /// Milliseconds since runtime construction; the timestamp domain for
    /// every core call made through this handle.
    pub fn now_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    /// Start the session and spawn both tickers. Must be called from within
    /// a tokio runtime.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.shutdown_tx.is_some() {
            return Err(SessionError::AlreadyRunning);
        }

        let now = self.now_ms();
        let (tick_interval_ms, audio_interval_ms) = {
            let mut session = self.lock();
            session.start(now);
            let emergency = &session.config().emergency;
            (emergency.tick_interval_ms, emergency.audio_interval_ms)
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        self.tasks.push(self.spawn_ticker(
            Duration::from_millis(tick_interval_ms),
            shutdown_rx.clone(),
            |session, now_ms| {
                session.evaluate_tick(now_ms);
            },
        ));
        self.tasks.push(self.spawn_ticker(
            Duration::from_millis(audio_interval_ms),
            shutdown_rx,
            |session, now_ms| {
                session.run_stress_inference(now_ms);
            },
        ));

        self.shutdown_tx = Some(shutdown_tx);
        Ok(())
    }

    fn spawn_ticker(
        &self,
        period: Duration,
        mut shutdown_rx: watch::Receiver<bool>,
        op: impl Fn(&mut MonitoringSession, u64) + Send + 'static,
    ) -> JoinHandle<()> {
        let session = Arc::clone(&self.session);
        let started_at = self.started_at;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let now_ms = started_at.elapsed().as_millis() as u64;
                        if let Ok(mut guard) = session.lock() {
                            op(&mut guard, now_ms);
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        })
    }

    /// Stop tick delivery and reset the session. Tick tasks are aborted
    /// before this returns; no evaluation runs afterwards.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        let shutdown_tx = self.shutdown_tx.take().ok_or(SessionError::NotRunning)?;
        let _ = shutdown_tx.send(true);
        for task in self.tasks.drain(..) {
            task.abort();
        }

        let now = self.now_ms();
        self.lock().reset(now);
        tracing::info!("monitoring session stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }

    /// Push one captured audio frame into the session
    pub fn ingest_audio_frame(&self, frame: &[f32]) {
        let now = self.now_ms();
        self.lock().ingest_audio_frame(frame, now);
    }

    /// Push one video frame's landmarks into the session
    pub fn update_gesture(&self, landmarks: Option<&HandLandmarks>) -> GestureReading {
        let now = self.now_ms();
        self.lock().update_gesture(landmarks, now)
    }

    pub fn set_motion_score(&self, score: f32) {
        self.lock().set_motion_score(score);
    }

    /// Manual panic: applied synchronously, takes effect on the next tick
    pub fn panic(&self) {
        self.lock().panic();
    }

    /// Cancel a pending pre-alert; state is cleared before this returns
    pub fn cancel(&self) -> bool {
        self.lock().cancel()
    }

    pub fn subscribe_risk(&self) -> tokio::sync::broadcast::Receiver<RiskUpdate> {
        self.lock().subscribe_risk()
    }

    pub fn subscribe_triggers(
        &self,
    ) -> tokio::sync::broadcast::Receiver<crate::emergency::EmergencyTrigger> {
        self.lock().subscribe_triggers()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MonitoringSession> {
        // Session ops never panic, so poisoning only follows a bug elsewhere
        self.session.lock().expect("session lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::emergency::{GeoPoint, StaticContactDirectory, StaticLocationProvider};

    fn runtime() -> SessionRuntime {
        SessionRuntime::new(MonitoringSession::new(
            AppConfig::default(),
            Arc::new(StaticLocationProvider(GeoPoint { lat: 0.1, lng: 0.2 })),
            Arc::new(StaticContactDirectory(Vec::new())),
        ))
    }

    #[tokio::test]
    async fn test_start_stop_lifecycle() {
        let mut rt = runtime();
        assert!(!rt.is_running());
        assert!(rt.start().is_ok());
        assert!(rt.is_running());
        assert_eq!(rt.start(), Err(SessionError::AlreadyRunning));
        assert!(rt.stop().is_ok());
        assert!(!rt.is_running());
        assert_eq!(rt.stop(), Err(SessionError::NotRunning));
    }

    #[tokio::test]
    async fn test_ticker_emits_risk_updates() {
        tokio::time::pause();

        let mut rt = runtime();
        let mut rx = rt.subscribe_risk();
        rt.start().unwrap();

        tokio::time::advance(Duration::from_millis(3_100)).await;
        // Yield so the ticker tasks actually run
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert!(received >= 2, "expected ticks, got {}", received);

        rt.stop().unwrap();
    }

    #[tokio::test]
    async fn test_stop_resets_session() {
        let mut rt = runtime();
        rt.start().unwrap();
        rt.panic();
        rt.stop().unwrap();
        assert_eq!(
            rt.lock().emergency_state(),
            crate::emergency::EmergencyState::Idle
        );
    }
}
