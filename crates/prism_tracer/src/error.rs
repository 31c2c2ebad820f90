//! Errors raised before a frame starts.

use thiserror::Error;

/// Errors that can occur when starting a render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("A frame is already rendering")]
    AlreadyRunning,
    #[error("Render thread panicked")]
    WorkerPanicked,
}

pub type RenderResult<T> = Result<T, RenderError>;
