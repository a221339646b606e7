//! Capture collaborator contract.
//!
//! The environment owns the camera; the engine only acquires a handle at
//! session start, asks it for frames, and releases it exactly once.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CaptureError;

/// Opaque token for an open capture stream. Not `Clone`: the engine holds the
/// only owner and releases it once.
#[derive(Debug, PartialEq, Eq)]
pub struct CaptureHandle {
    id: Uuid,
    device: String,
}

impl CaptureHandle {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            device: device.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

impl fmt::Display for CaptureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.device, self.id)
    }
}

/// One frame, already encoded as the string the scoring service expects
/// (typically a `data:image/jpeg;base64,...` URL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureFrame {
    pub data: String,
}

impl CaptureFrame {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

#[async_trait]
pub trait CaptureSource: Send + Sync {
    async fn acquire(&self) -> Result<CaptureHandle, CaptureError>;

    async fn capture_frame(&self, handle: &CaptureHandle) -> Result<CaptureFrame, CaptureError>;

    async fn release(&self, handle: &CaptureHandle) -> Result<(), CaptureError>;
}

/// Capture source backed by a file holding one already-encoded frame.
///
/// Used by the command-line host where no camera pipeline is wired in; the
/// file is re-read on every capture so an external encoder can keep
/// replacing it.
pub struct FileFrameSource {
    path: PathBuf,
}

impl FileFrameSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CaptureSource for FileFrameSource {
    async fn acquire(&self) -> Result<CaptureHandle, CaptureError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) if meta.is_file() => Ok(CaptureHandle::new(self.path.display().to_string())),
            Ok(_) => Err(CaptureError::Unavailable(format!(
                "{} is not a file",
                self.path.display()
            ))),
            Err(err) => Err(CaptureError::Unavailable(format!(
                "{}: {err}",
                self.path.display()
            ))),
        }
    }

    async fn capture_frame(&self, _handle: &CaptureHandle) -> Result<CaptureFrame, CaptureError> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| CaptureError::FrameFailed(format!("{}: {err}", self.path.display())))?;
        let data = data.trim();
        if data.is_empty() {
            return Err(CaptureError::FrameFailed(format!(
                "{} is empty",
                self.path.display()
            )));
        }
        Ok(CaptureFrame::new(data))
    }

    async fn release(&self, _handle: &CaptureHandle) -> Result<(), CaptureError> {
        Ok(())
    }
}
