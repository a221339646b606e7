//! Session telemetry engine for timed focus-training sessions.
//!
//! A [`SessionEngine`] runs one session: a one-second countdown and a
//! fixed-interval sampler that sends camera frames to a scoring service and
//! keeps the last scores in a bounded window. When the countdown expires or
//! the host calls `end`, both stop, the camera is released, and the window is
//! summarised into a [`SessionSummary`].

pub mod aggregation;
pub mod capture;
pub mod clock;
pub mod engine;
pub mod error;
pub mod models;
pub mod observer;
pub mod sampling;
pub mod scoring;
pub mod settings;
pub mod utils;
pub mod window;

pub use aggregation::summarize;
pub use capture::{CaptureFrame, CaptureHandle, CaptureSource, FileFrameSource};
pub use engine::SessionEngine;
pub use error::{CaptureError, EngineError, SampleError};
pub use models::{AttentionSample, FocusDistribution, LiveState, SessionConfig, SessionState, SessionSummary};
pub use observer::{LoggingObserver, NoopObserver, SessionObserver};
pub use scoring::{HttpScoringClient, ScoreRequest, ScoringClient};
pub use settings::{EngineSettings, SettingsStore};
pub use utils::logging::init_logging;
pub use window::AttentionWindow;
