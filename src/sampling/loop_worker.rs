use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    error::SampleError,
    models::AttentionSample,
    observer::SessionObserver,
    utils::lock,
    window::AttentionWindow,
};

use super::SampleFn;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Everything one run of the sampling loop shares with its round trips.
pub(crate) struct SamplingContext {
    pub window: Arc<Mutex<AttentionWindow>>,
    pub current_generation: Arc<AtomicU64>,
    /// Generation this loop was started with.
    pub generation: u64,
    pub observer: Arc<dyn SessionObserver>,
    pub sample_fn: Arc<dyn SampleFn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Applied {
    Pushed,
    Failed,
    Discarded,
}

pub(crate) async fn sampling_loop(
    ctx: Arc<SamplingContext>,
    period: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut tick: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("sampling loop shutting down after {} ticks", tick);
                break;
            }
            _ = ticker.tick() => {
                tick += 1;
                // Round trips are not serialized: a slow one does not hold
                // back the next tick.
                tokio::spawn(round_trip(Arc::clone(&ctx), tick));
            }
        }
    }
}

async fn round_trip(ctx: Arc<SamplingContext>, tick: u64) {
    let result = ctx.sample_fn.sample().await;
    apply_result(&ctx, tick, result);
}

/// Apply one resolved round trip. The generation check and the push happen
/// under the window lock, which is also held while the generation advances.
pub(crate) fn apply_result(
    ctx: &SamplingContext,
    tick: u64,
    result: Result<AttentionSample, SampleError>,
) -> Applied {
    let mut window = lock(&ctx.window);

    if ctx.current_generation.load(Ordering::SeqCst) != ctx.generation {
        drop(window);
        match result {
            Ok(_) => ctx.observer.on_sample_discarded(tick),
            Err(err) => log_debug!("ignoring failure from stopped tick {}: {}", tick, err),
        }
        return Applied::Discarded;
    }

    match result {
        Ok(sample) => {
            window.push(sample);
            drop(window);
            log_debug!("tick {} pushed score {:.2}", tick, sample.score);
            ctx.observer.on_sample(&sample);
            Applied::Pushed
        }
        Err(err) => {
            drop(window);
            log_debug!("tick {} failed: {}", tick, err);
            ctx.observer.on_sample_failed(tick, &err);
            Applied::Failed
        }
    }
}
