//! Screen region capture into a `PixelBuffer`.
//!
//! Composites everything on screen within a capture region, with the
//! windows in the exclusion set omitted so the picker never samples its
//! own preview, and writes normalized sRGB samples row-major, top row
//! first.
//!
//! Platform implementations:
//! - Windows: GDI blit with capture-affinity exclusion (`windows.rs`)
//! - macOS: window-list composite below the picker window (`macos.rs`)

use crate::error::{PlatformError, PlatformResult};
use pick_core::{CaptureRegion, PixelBuffer, ScreenSampler, WindowExclusionSet};
use tracing::debug;

#[cfg(windows)]
mod windows;

#[cfg(target_os = "macos")]
mod macos;

/// Capture `region` into `out`, omitting the excluded windows.
///
/// `region` dimensions must match the buffer's fixed allocation. On any
/// error `out` keeps its previous contents: platform implementations
/// decode into a scratch frame and commit it in one step only after the
/// capture fully succeeded.
pub fn capture_region(
    region: &CaptureRegion,
    excluded: &WindowExclusionSet,
    out: &mut PixelBuffer,
) -> PlatformResult<()> {
    if region.width != out.width() || region.height != out.height() {
        return Err(PlatformError::SizeMismatch {
            want_width: out.width(),
            want_height: out.height(),
            got_width: region.width,
            got_height: region.height,
        });
    }

    #[cfg(windows)]
    {
        windows::capture_region(region, excluded, out)
    }
    #[cfg(target_os = "macos")]
    {
        macos::capture_region(region, excluded, out)
    }
    #[cfg(not(any(windows, target_os = "macos")))]
    {
        let _ = (region, excluded, out);
        Err(PlatformError::NotImplemented)
    }
}

/// `ScreenSampler` backed by the platform capture path.
///
/// Failures are demoted to a `false` return and a debug log; the session
/// treats a stale buffer as "no update this tick".
#[derive(Debug, Default)]
pub struct SystemSampler;

impl SystemSampler {
    pub fn new() -> Self {
        Self
    }
}

impl ScreenSampler for SystemSampler {
    fn capture(
        &mut self,
        region: &CaptureRegion,
        excluded: &WindowExclusionSet,
        out: &mut PixelBuffer,
    ) -> bool {
        match capture_region(region, excluded, out) {
            Ok(()) => true,
            Err(error) => {
                debug!(%error, "screen capture failed");
                false
            }
        }
    }
}
