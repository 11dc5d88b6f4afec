//! DPI scaling utilities.
//!
//! The picker works in physical pixels end to end: the cursor position
//! feeds the capture region and the window placement directly. On scaled
//! Windows desktops that only holds once the process opts into DPI
//! awareness, so embeddings call `set_dpi_aware` before creating the host
//! window.
//!
//! Platform implementations:
//! - Windows: Per-Monitor V2 DPI awareness (`windows.rs`)
//! - macOS: system-handled Retina scaling (`macos.rs`)

#[cfg(windows)]
mod windows;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(windows)]
pub use windows::{get_primary_scale_factor, set_dpi_aware};

#[cfg(target_os = "macos")]
pub use macos::{get_primary_scale_factor, set_dpi_aware};

#[cfg(not(any(windows, target_os = "macos")))]
mod fallback {
    /// Set DPI awareness (no-op on unsupported platforms).
    pub fn set_dpi_aware() {}

    /// Get the current DPI scale factor.
    pub fn get_primary_scale_factor() -> f64 {
        1.0
    }
}

#[cfg(not(any(windows, target_os = "macos")))]
pub use fallback::{get_primary_scale_factor, set_dpi_aware};
