//! Cursor position polling.
//!
//! The scheduler polls the cursor once per tick; there is no event hook.
//!
//! Platform implementations:
//! - Windows: `GetCursorPos` (`windows.rs`)
//! - macOS: Quartz event location (`macos.rs`)

use pick_core::{CursorTracker, Point};
use tracing::debug;

#[cfg(windows)]
mod windows;

#[cfg(target_os = "macos")]
mod macos;

/// Poll the current cursor position in global display coordinates
/// (top-left origin on every platform).
pub fn cursor_position() -> Option<Point> {
    #[cfg(windows)]
    {
        windows::cursor_position()
    }
    #[cfg(target_os = "macos")]
    {
        macos::cursor_position()
    }
    #[cfg(not(any(windows, target_os = "macos")))]
    {
        None
    }
}

/// `CursorTracker` backed by the OS cursor.
///
/// Keeps the last good position so a transient query failure reuses the
/// previous point instead of snapping to a default.
#[derive(Debug, Default)]
pub struct SystemCursor {
    last: Point,
}

impl SystemCursor {
    pub fn new() -> Self {
        Self {
            last: cursor_position().unwrap_or_default(),
        }
    }
}

impl CursorTracker for SystemCursor {
    fn position(&mut self) -> Point {
        match cursor_position() {
            Some(position) => {
                self.last = position;
                position
            }
            None => {
                debug!("cursor query failed, reusing last position");
                self.last
            }
        }
    }
}
