use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::{task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Countdown that calls `on_tick(remaining)` once per period and
/// `on_complete()` once when it reaches zero.
///
/// The clock knows nothing about sessions; it only drives the callbacks.
pub struct SessionClock {
    tick_interval: Duration,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    completed: Arc<AtomicBool>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::with_tick_interval(Duration::from_secs(1))
    }

    pub fn with_tick_interval(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            handle: None,
            cancel_token: None,
            completed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn start<T, C>(&mut self, total_seconds: i64, on_tick: T, on_complete: C) -> Result<()>
    where
        T: Fn(u64) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        if self.handle.is_some() {
            bail!("clock already running");
        }

        self.completed.store(false, Ordering::SeqCst);

        if total_seconds <= 0 {
            self.completed.store(true, Ordering::SeqCst);
            on_complete();
            return Ok(());
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(countdown(
            total_seconds as u64,
            self.tick_interval,
            cancel_token.clone(),
            Arc::clone(&self.completed),
            on_tick,
            on_complete,
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancel future ticks. Safe to call repeatedly or after completion.
    pub fn stop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        // The task is parked on its interval or already finished; dropping the
        // handle detaches it and the cancelled token makes it exit.
        self.handle.take();
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
            && !self.completed.load(Ordering::SeqCst)
    }

    pub fn has_completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn countdown<T, C>(
    total_seconds: u64,
    tick_interval: Duration,
    cancel_token: CancellationToken,
    completed: Arc<AtomicBool>,
    on_tick: T,
    on_complete: C,
) where
    T: Fn(u64) + Send + 'static,
    C: FnOnce() + Send + 'static,
{
    let mut interval = time::interval_at(time::Instant::now() + tick_interval, tick_interval);
    let mut remaining = total_seconds;

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_debug!("clock stopped with {}s remaining", remaining);
                return;
            }
            _ = interval.tick() => {
                remaining = remaining.saturating_sub(1);
                on_tick(remaining);
                if remaining == 0 {
                    break;
                }
            }
        }
    }

    if cancel_token.is_cancelled() {
        return;
    }
    completed.store(true, Ordering::SeqCst);
    on_complete();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{atomic::AtomicUsize, Mutex};

    #[derive(Default)]
    struct Recorder {
        ticks: Mutex<Vec<u64>>,
        completions: AtomicUsize,
    }

    fn start_recorded(clock: &mut SessionClock, total: i64) -> Arc<Recorder> {
        let recorder = Arc::new(Recorder::default());
        let on_tick = {
            let recorder = Arc::clone(&recorder);
            move |remaining| recorder.ticks.lock().unwrap().push(remaining)
        };
        let on_complete = {
            let recorder = Arc::clone(&recorder);
            move || {
                recorder.completions.fetch_add(1, Ordering::SeqCst);
            }
        };
        clock.start(total, on_tick, on_complete).unwrap();
        recorder
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_down_then_completes_once() {
        let mut clock = SessionClock::new();
        let recorder = start_recorded(&mut clock, 3);

        time::sleep(Duration::from_secs(10)).await;

        assert_eq!(*recorder.ticks.lock().unwrap(), vec![2, 1, 0]);
        assert_eq!(recorder.completions.load(Ordering::SeqCst), 1);
        assert!(clock.has_completed());

        clock.stop();
        clock.stop();
        assert_eq!(recorder.completions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn non_positive_total_completes_without_ticking() {
        for total in [0, -5] {
            let mut clock = SessionClock::new();
            let recorder = start_recorded(&mut clock, total);

            assert_eq!(recorder.completions.load(Ordering::SeqCst), 1);
            time::sleep(Duration::from_secs(3)).await;
            assert!(recorder.ticks.lock().unwrap().is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_future_ticks() {
        let mut clock = SessionClock::new();
        let recorder = start_recorded(&mut clock, 60);

        time::sleep(Duration::from_millis(2500)).await;
        clock.stop();
        time::sleep(Duration::from_secs(120)).await;

        assert_eq!(*recorder.ticks.lock().unwrap(), vec![59, 58]);
        assert_eq!(recorder.completions.load(Ordering::SeqCst), 0);
        assert!(!clock.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn refuses_double_start() {
        let mut clock = SessionClock::new();
        let _recorder = start_recorded(&mut clock, 5);
        assert!(clock.start(5, |_| {}, || {}).is_err());
    }
}
