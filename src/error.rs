//! Error types for the session engine and its collaborators.
//!
//! Only [`EngineError`] ever reaches the host, and only from `begin`. The
//! other two are absorbed inside the engine and reported to the observer.

use thiserror::Error;

/// Failure reported by a [`crate::capture::CaptureSource`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CaptureError {
    /// The capture device could not be opened (denied, missing, busy).
    #[error("capture device unavailable: {0}")]
    Unavailable(String),

    /// A frame could not be read from an acquired handle.
    #[error("frame capture failed: {0}")]
    FrameFailed(String),

    #[error("capture release failed: {0}")]
    ReleaseFailed(String),
}

/// Why a single sampling round trip produced no sample.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SampleError {
    /// No capture handle was acquired for this session.
    #[error("no capture handle available")]
    CaptureUnavailable,

    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// The request never produced an HTTP response.
    #[error("scoring transport error: {0}")]
    Transport(String),

    /// The scoring service answered with a non-success status.
    #[error("scoring service returned {status}: {body}")]
    ServiceStatus { status: u16, body: String },

    /// The scoring service answered successfully but reported an error.
    #[error("scoring service error: {0}")]
    Service(String),

    #[error("malformed scoring response: {0}")]
    MalformedResponse(String),

    /// Attention scores must lie in [0, 100].
    #[error("attention score must be in [0, 100], got {0}")]
    ScoreOutOfRange(f64),
}

/// Errors returned to the host by [`crate::engine::SessionEngine::begin`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// `begin` was called on an engine that already left `Configuring`.
    #[error("session already started")]
    AlreadyStarted,

    #[error("invalid session config: {0}")]
    InvalidConfig(String),

    #[error("scheduling failed: {0}")]
    Scheduling(String),
}
