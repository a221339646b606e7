#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use async_trait::async_trait;
use neurofocus_lib::{
    AttentionSample, CaptureError, CaptureFrame, CaptureHandle, CaptureSource, SampleError,
    ScoreRequest, ScoringClient, SessionEngine, SessionObserver, SessionSummary,
};
use tokio::sync::Notify;

/// Camera double that counts acquisitions and releases.
#[derive(Default)]
pub struct FakeCamera {
    pub fail_acquire: bool,
    /// How long `acquire` takes, like a permission prompt.
    pub acquire_delay: Option<Duration>,
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
    pub frames: AtomicUsize,
}

impl FakeCamera {
    pub fn working() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn denied() -> Arc<Self> {
        Arc::new(Self {
            fail_acquire: true,
            ..Self::default()
        })
    }

    pub fn slow(acquire_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            acquire_delay: Some(acquire_delay),
            ..Self::default()
        })
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureSource for FakeCamera {
    async fn acquire(&self) -> Result<CaptureHandle, CaptureError> {
        if let Some(delay) = self.acquire_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_acquire {
            return Err(CaptureError::Unavailable("permission denied".into()));
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(CaptureHandle::new("fake-cam"))
    }

    async fn capture_frame(&self, _handle: &CaptureHandle) -> Result<CaptureFrame, CaptureError> {
        let n = self.frames.fetch_add(1, Ordering::SeqCst);
        Ok(CaptureFrame::new(format!("data:image/jpeg;base64,frame{n}")))
    }

    async fn release(&self, _handle: &CaptureHandle) -> Result<(), CaptureError> {
        self.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Scorer that replays a fixed script, then fails every later call.
pub struct ScriptedScorer {
    results: Mutex<VecDeque<Result<f64, SampleError>>>,
    pub requests: Mutex<Vec<ScoreRequest>>,
}

impl ScriptedScorer {
    pub fn new(results: Vec<Result<f64, SampleError>>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn scores(scores: &[f64]) -> Arc<Self> {
        Self::new(scores.iter().copied().map(Ok).collect())
    }
}

#[async_trait]
impl ScoringClient for ScriptedScorer {
    async fn score(&self, request: &ScoreRequest) -> Result<f64, SampleError> {
        self.requests.lock().unwrap().push(request.clone());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SampleError::Transport("service unreachable".into())))
    }
}

/// First call takes `delay`; every later call answers at once. Scores follow
/// call order: 10, 20, 30, ...
pub struct SlowFirstScorer {
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl SlowFirstScorer {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ScoringClient for SlowFirstScorer {
    async fn score(&self, _request: &ScoreRequest) -> Result<f64, SampleError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == 1 {
            tokio::time::sleep(self.delay).await;
        }
        Ok(call as f64 * 10.0)
    }
}

/// Scorer whose calls hang until the test releases them.
#[derive(Default)]
pub struct GatedScorer {
    pub started: Notify,
    pub release: Notify,
}

#[async_trait]
impl ScoringClient for GatedScorer {
    async fn score(&self, _request: &ScoreRequest) -> Result<f64, SampleError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(95.0)
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    pub ticks: Mutex<Vec<u64>>,
    pub samples: Mutex<Vec<AttentionSample>>,
    pub failures: Mutex<Vec<SampleError>>,
    pub discarded: AtomicUsize,
    pub capture_unavailable: AtomicUsize,
    pub ended: Mutex<Vec<SessionSummary>>,
}

impl RecordingObserver {
    pub fn failure_count(&self) -> usize {
        self.failures.lock().unwrap().len()
    }

    pub fn ended_count(&self) -> usize {
        self.ended.lock().unwrap().len()
    }
}

impl SessionObserver for RecordingObserver {
    fn on_tick(&self, remaining_secs: u64) {
        self.ticks.lock().unwrap().push(remaining_secs);
    }

    fn on_sample(&self, sample: &AttentionSample) {
        self.samples.lock().unwrap().push(*sample);
    }

    fn on_sample_failed(&self, _tick: u64, error: &SampleError) {
        self.failures.lock().unwrap().push(error.clone());
    }

    fn on_sample_discarded(&self, _tick: u64) {
        self.discarded.fetch_add(1, Ordering::SeqCst);
    }

    fn on_capture_unavailable(&self, _error: &CaptureError) {
        self.capture_unavailable.fetch_add(1, Ordering::SeqCst);
    }

    fn on_ended(&self, summary: &SessionSummary) {
        self.ended.lock().unwrap().push(summary.clone());
    }
}

pub fn engine(
    camera: &Arc<FakeCamera>,
    scorer: Arc<dyn ScoringClient>,
    observer: &Arc<RecordingObserver>,
) -> SessionEngine {
    SessionEngine::new(camera.clone(), scorer, observer.clone())
}

pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
