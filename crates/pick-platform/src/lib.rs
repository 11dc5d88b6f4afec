//! pick-platform: platform-specific I/O boundary for pick.
//!
//! This crate provides:
//! - Cursor position polling
//! - Screen capture into a pixel buffer, with window exclusion
//! - Screen-capture permission probing
//! - DPI awareness so cursor and capture coordinates agree
//!
//! ## Module Structure
//!
//! Each functional area is organized as a submodule with platform-specific
//! implementations selected at build time:
//!
//! - `error` - Common error types
//! - `cursor` - Cursor position polling
//! - `sampler` - Screen region capture with window exclusion
//! - `permission` - Screen-capture permission probe/request
//! - `dpi` - DPI scaling utilities

mod cursor;
mod dpi;
mod error;
mod permission;
mod sampler;

// Re-export error types
pub use error::{PlatformError, PlatformResult};

// Re-export cursor polling
pub use cursor::{cursor_position, SystemCursor};

// Re-export screen capture
pub use sampler::{capture_region, SystemSampler};

// Re-export permission probing
pub use permission::{request_screen_capture_access, screen_capture_allowed};

// Re-export DPI utilities
pub use dpi::{get_primary_scale_factor, set_dpi_aware};
