//! Common error types for pick-platform.

use thiserror::Error;

/// Platform-level errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("not implemented on this platform")]
    NotImplemented,
    #[error("capture failed: {0}")]
    CaptureFailed(String),
    #[error(
        "captured image is {got_width}x{got_height}, requested {want_width}x{want_height}"
    )]
    SizeMismatch {
        want_width: u32,
        want_height: u32,
        got_width: u32,
        got_height: u32,
    },
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
