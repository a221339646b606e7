mod loop_worker;
pub mod round_trip;
pub mod scheduler;

use async_trait::async_trait;

use crate::{error::SampleError, models::AttentionSample};

pub use round_trip::CaptureAndScore;
pub use scheduler::SampleScheduler;

/// One sampling round trip. Implementations may take arbitrarily long; the
/// scheduler never waits for one before issuing the next.
#[async_trait]
pub trait SampleFn: Send + Sync {
    async fn sample(&self) -> Result<AttentionSample, SampleError>;
}
