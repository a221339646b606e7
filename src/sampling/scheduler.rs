use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::{task::JoinHandle, time::Instant};
use tokio_util::sync::CancellationToken;

use crate::{observer::SessionObserver, utils::lock, window::AttentionWindow};

use super::{
    loop_worker::{sampling_loop, SamplingContext},
    SampleFn,
};

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Runs `sample_fn` every interval and feeds successful results into the
/// shared window.
///
/// Each `start` and `stop` advances the generation; a result is pushed only if
/// the generation it was issued under is still current.
pub struct SampleScheduler {
    window: Arc<Mutex<AttentionWindow>>,
    generation: Arc<AtomicU64>,
    observer: Arc<dyn SessionObserver>,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SampleScheduler {
    pub fn new(window: Arc<Mutex<AttentionWindow>>, observer: Arc<dyn SessionObserver>) -> Self {
        Self {
            window,
            generation: Arc::new(AtomicU64::new(0)),
            observer,
            handle: None,
            cancel_token: None,
        }
    }

    /// Returns the generation the new loop runs under.
    pub fn start(&mut self, interval: Duration, sample_fn: Arc<dyn SampleFn>) -> Result<u64> {
        if self.handle.is_some() {
            bail!("sampling already active");
        }
        if interval.is_zero() {
            bail!("sampling interval must be greater than zero");
        }
        if Instant::now().checked_add(interval).is_none() {
            bail!("sampling interval {:?} is out of range", interval);
        }

        let generation = self.advance_generation();
        let cancel_token = CancellationToken::new();

        let ctx = Arc::new(SamplingContext {
            window: Arc::clone(&self.window),
            current_generation: Arc::clone(&self.generation),
            generation,
            observer: Arc::clone(&self.observer),
            sample_fn,
        });

        let handle = tokio::spawn(sampling_loop(ctx, interval, cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        log_info!(
            "sampling started every {:?} (generation {})",
            interval,
            generation
        );
        Ok(generation)
    }

    /// Stop scheduling and invalidate every round trip still in flight.
    /// Idempotent.
    pub fn stop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if self.handle.take().is_some() {
            let generation = self.advance_generation();
            log_info!("sampling stopped (generation now {})", generation);
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn advance_generation(&self) -> u64 {
        let _window = lock(&self.window);
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Drop for SampleScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
