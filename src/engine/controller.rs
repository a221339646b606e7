use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, PoisonError, Weak,
};
use std::time::Duration;

use tokio::sync::watch;

use crate::{
    aggregation::summarize,
    capture::{CaptureHandle, CaptureSource},
    clock::SessionClock,
    error::EngineError,
    models::{
        format_remaining, progress_percent, LiveState, SessionConfig, SessionState,
        SessionSummary,
    },
    observer::SessionObserver,
    sampling::{CaptureAndScore, SampleScheduler},
    scoring::ScoringClient,
    utils::lock,
    window::{AttentionWindow, DEFAULT_WINDOW_CAPACITY},
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

type EndedCallback = Box<dyn FnOnce(&SessionSummary) + Send>;

/// Internal lifecycle. `Starting` and `Ending` cover the awaits inside
/// `begin` and `end` so neither can run twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Configuring,
    Starting,
    Active,
    Ending,
    Ended,
}

impl Phase {
    fn public(self) -> SessionState {
        match self {
            Phase::Configuring | Phase::Starting => SessionState::Configuring,
            Phase::Active | Phase::Ending => SessionState::Active,
            Phase::Ended => SessionState::Ended,
        }
    }
}

struct Lifecycle {
    phase: Phase,
    config: Option<SessionConfig>,
    /// Set by `end` while `begin` is still acquiring the capture.
    end_requested: bool,
}

struct EngineInner {
    capture: Arc<dyn CaptureSource>,
    scorer: Arc<dyn ScoringClient>,
    observer: Arc<dyn SessionObserver>,
    window: Arc<Mutex<AttentionWindow>>,
    clock: Mutex<SessionClock>,
    scheduler: Mutex<SampleScheduler>,
    lifecycle: Mutex<Lifecycle>,
    remaining_secs: Arc<AtomicU64>,
    capture_handle: Mutex<Option<Arc<CaptureHandle>>>,
    ended_callbacks: Mutex<Vec<EndedCallback>>,
    summary_tx: watch::Sender<Option<SessionSummary>>,
}

/// Owns one session from `begin` to its summary.
///
/// Cheap to clone; clones share the same session. A finished engine cannot be
/// restarted, create a new one for the next session.
#[derive(Clone)]
pub struct SessionEngine {
    inner: Arc<EngineInner>,
}

impl SessionEngine {
    pub fn new(
        capture: Arc<dyn CaptureSource>,
        scorer: Arc<dyn ScoringClient>,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        Self::with_window_capacity(capture, scorer, observer, DEFAULT_WINDOW_CAPACITY)
    }

    pub fn with_window_capacity(
        capture: Arc<dyn CaptureSource>,
        scorer: Arc<dyn ScoringClient>,
        observer: Arc<dyn SessionObserver>,
        window_capacity: usize,
    ) -> Self {
        let window = Arc::new(Mutex::new(AttentionWindow::with_capacity(window_capacity)));
        let scheduler = SampleScheduler::new(Arc::clone(&window), Arc::clone(&observer));
        let (summary_tx, _) = watch::channel(None);

        Self {
            inner: Arc::new(EngineInner {
                capture,
                scorer,
                observer,
                window,
                clock: Mutex::new(SessionClock::new()),
                scheduler: Mutex::new(scheduler),
                lifecycle: Mutex::new(Lifecycle {
                    phase: Phase::Configuring,
                    config: None,
                    end_requested: false,
                }),
                remaining_secs: Arc::new(AtomicU64::new(0)),
                capture_handle: Mutex::new(None),
                ended_callbacks: Mutex::new(Vec::new()),
                summary_tx,
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        lock(&self.inner.lifecycle).phase.public()
    }

    pub fn config(&self) -> Option<SessionConfig> {
        lock(&self.inner.lifecycle).config.clone()
    }

    /// Start the session: acquire the camera, then the clock and sampler.
    ///
    /// A camera that cannot be acquired does not fail the session; sampling
    /// runs and every round trip fails at the capture step.
    pub async fn begin(&self, config: SessionConfig) -> Result<(), EngineError> {
        config.validate().map_err(EngineError::InvalidConfig)?;

        {
            let mut lifecycle = lock(&self.inner.lifecycle);
            if lifecycle.phase != Phase::Configuring {
                return Err(EngineError::AlreadyStarted);
            }
            lifecycle.phase = Phase::Starting;
            lifecycle.config = Some(config.clone());
        }

        let handle = match self.inner.capture.acquire().await {
            Ok(handle) => {
                log_info!("capture acquired: {}", handle);
                Some(Arc::new(handle))
            }
            Err(err) => {
                log_warn!("capture unavailable, sampling will fail: {}", err);
                self.inner.observer.on_capture_unavailable(&err);
                None
            }
        };
        *lock(&self.inner.capture_handle) = handle.clone();
        self.inner
            .remaining_secs
            .store(config.total_seconds(), Ordering::SeqCst);

        let started = {
            let mut lifecycle = lock(&self.inner.lifecycle);
            let result = if lifecycle.end_requested {
                Ok(false)
            } else {
                self.start_periodic(&config, handle).map(|()| true)
            };
            if result.is_ok() {
                lifecycle.phase = Phase::Active;
            } else {
                lifecycle.phase = Phase::Configuring;
                lifecycle.end_requested = false;
            }
            result
        };

        match started {
            Ok(true) => {}
            Ok(false) => {
                log_info!("end requested while starting, ending session");
                self.end().await;
                return Ok(());
            }
            Err(err) => {
                log_error!("failed to start session: {}", err);
                lock(&self.inner.scheduler).stop();
                lock(&self.inner.clock).stop();
                self.release_capture().await;
                return Err(err);
            }
        }

        log_info!(
            "session started: {} min, mode '{}', sampling every {}s",
            config.duration_minutes,
            config.study_mode,
            config.sampling_interval_secs
        );
        Ok(())
    }

    fn start_periodic(
        &self,
        config: &SessionConfig,
        handle: Option<Arc<CaptureHandle>>,
    ) -> Result<(), EngineError> {
        let sample_fn = Arc::new(CaptureAndScore::new(
            Arc::clone(&self.inner.capture),
            Arc::clone(&self.inner.scorer),
            handle,
            config.study_mode.clone(),
        ));
        lock(&self.inner.scheduler)
            .start(
                Duration::from_secs(config.sampling_interval_secs),
                sample_fn,
            )
            .map_err(|e| EngineError::Scheduling(e.to_string()))?;

        let on_tick = {
            let remaining_secs = Arc::clone(&self.inner.remaining_secs);
            let observer = Arc::clone(&self.inner.observer);
            move |remaining: u64| {
                remaining_secs.store(remaining, Ordering::SeqCst);
                observer.on_tick(remaining);
            }
        };
        let on_complete = {
            let weak = Arc::downgrade(&self.inner);
            move || spawn_end(weak)
        };

        let total = i64::try_from(config.total_seconds()).unwrap_or(i64::MAX);
        lock(&self.inner.clock)
            .start(total, on_tick, on_complete)
            .map_err(|e| EngineError::Scheduling(e.to_string()))
    }

    /// End the session and produce its summary.
    ///
    /// Only the first call on an active session (manual or clock-driven) tears
    /// down and returns `Some`; every other call returns `None`.
    ///
    /// Called while `begin` is still acquiring the capture, the request is
    /// recorded and returns `None`. The session then ends as soon as `begin`
    /// has the capture, without sampling, and the summary arrives through
    /// `on_ended` and `wait_for_summary`.
    pub async fn end(&self) -> Option<SessionSummary> {
        let config = {
            let mut lifecycle = lock(&self.inner.lifecycle);
            match lifecycle.phase {
                Phase::Active => {}
                Phase::Starting => {
                    lifecycle.end_requested = true;
                    log_info!("end requested while the session is starting");
                    return None;
                }
                Phase::Configuring | Phase::Ending | Phase::Ended => return None,
            }
            lifecycle.phase = Phase::Ending;
            lifecycle.config.clone()
        }?;

        lock(&self.inner.scheduler).stop();
        lock(&self.inner.clock).stop();
        self.release_capture().await;

        let series = {
            let mut window = lock(&self.inner.window);
            let series = window.snapshot();
            *window = AttentionWindow::with_capacity(window.capacity());
            series
        };

        let summary = summarize(&series, &config);

        lock(&self.inner.lifecycle).phase = Phase::Ended;
        self.inner.remaining_secs.store(0, Ordering::SeqCst);
        log_info!(
            "session ended with {} samples, average {}",
            summary.series.len(),
            summary.average_score
        );

        self.deliver(&summary);
        Some(summary)
    }

    /// Register a callback for the summary. Runs immediately if the session
    /// has already ended.
    pub fn on_ended<F>(&self, callback: F)
    where
        F: FnOnce(&SessionSummary) + Send + 'static,
    {
        let mut callbacks = lock(&self.inner.ended_callbacks);
        let ended = self.inner.summary_tx.borrow().clone();
        match ended {
            Some(summary) => {
                drop(callbacks);
                callback(&summary);
            }
            None => callbacks.push(Box::new(callback)),
        }
    }

    /// Wait until the session ends and return its summary.
    pub async fn wait_for_summary(&self) -> Option<SessionSummary> {
        let mut rx = self.inner.summary_tx.subscribe();
        let summary = rx.wait_for(Option::is_some).await.ok()?.clone();
        summary
    }

    pub fn live_state(&self) -> LiveState {
        let (state, total_secs) = {
            let lifecycle = lock(&self.inner.lifecycle);
            let total = lifecycle
                .config
                .as_ref()
                .map(SessionConfig::total_seconds)
                .unwrap_or(0);
            (lifecycle.phase.public(), total)
        };

        let remaining_secs = match state {
            SessionState::Active => self.inner.remaining_secs.load(Ordering::SeqCst),
            SessionState::Configuring | SessionState::Ended => 0,
        };
        let progress = match state {
            SessionState::Configuring => 0.0,
            SessionState::Active => progress_percent(total_secs, remaining_secs),
            SessionState::Ended => 100.0,
        };

        let window = lock(&self.inner.window);
        LiveState {
            state,
            remaining_secs,
            remaining_label: format_remaining(remaining_secs),
            progress_percent: progress,
            latest_score: window.latest().map(|s| s.score),
            running_average: window.mean_score(),
            series: window.snapshot(),
        }
    }

    async fn release_capture(&self) {
        let handle = lock(&self.inner.capture_handle).take();
        let Some(handle) = handle else {
            return;
        };

        match self.inner.capture.release(&handle).await {
            Ok(()) => log_info!("capture released: {}", handle),
            Err(err) => {
                log_warn!("capture release failed for {}: {}", handle, err);
                self.inner.observer.on_capture_release_failed(&err);
            }
        }
    }

    fn deliver(&self, summary: &SessionSummary) {
        self.inner.summary_tx.send_replace(Some(summary.clone()));

        let callbacks = std::mem::take(&mut *lock(&self.inner.ended_callbacks));
        for callback in callbacks {
            callback(summary);
        }
        self.inner.observer.on_ended(summary);
    }
}

fn spawn_end(weak: Weak<EngineInner>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    tokio::spawn(async move {
        let engine = SessionEngine { inner };
        if engine.end().await.is_some() {
            log_info!("session completed by clock");
        }
    });
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        let handle = self
            .capture_handle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(handle) = handle else {
            return;
        };

        // Dropped mid-session: the clock and scheduler stop through their own
        // Drop, the camera still has to be given back.
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let capture = Arc::clone(&self.capture);
                runtime.spawn(async move {
                    match capture.release(&handle).await {
                        Ok(()) => log_info!("capture released on drop: {}", handle),
                        Err(err) => log_warn!("capture release on drop failed: {}", err),
                    }
                });
            }
            Err(_) => log_error!("no runtime to release capture {}", handle),
        }
    }
}
