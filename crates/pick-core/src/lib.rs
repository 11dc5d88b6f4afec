//! pick-core: domain model + sampling session engine.
//!
//! Design goal: keep this crate UI-agnostic and platform-agnostic.
//! Platform specific I/O (cursor polling, screen capture, permission
//! probing) lives in `pick-platform`; the host window glue lives in the
//! embedding. This crate owns:
//!
//! - `PixelBuffer` - the fixed-size sample grid overwritten each capture
//! - `Color` - 8-bit sRGB color and the float -> hex conversion point
//! - `PickerConfig` - session configuration + `--name=value` parsing
//! - `Session` - the refresh scheduler state machine and event channel
//! - `reporter` - terminal color reporting with cancel suppression

mod buffer;
mod color;
mod config;
pub mod reporter;
mod session;

pub use buffer::{PixelBuffer, Sample};
pub use color::Color;
pub use config::{arg_value, ConfigError, PickerConfig};
pub use session::{
    run_session, CursorTracker, HostWindow, ScreenSampler, Session, SessionEvent, SessionState,
    TerminalInput,
};

use serde::{Deserialize, Serialize};

/// Half-extent of the sample grid, in cells, on each side of the center.
pub const GRID_CELLS_HALF: u32 = 8;

/// Default capture region side length: a center cell plus the half-extent
/// on both sides, always odd so the center sample is well defined.
pub const GRID_CELLS: u32 = GRID_CELLS_HALF * 2 + 1;

/// Default scheduler tick frequency in Hz.
pub const DEFAULT_REFRESH_FREQUENCY: u32 = 144;

/// Default number of scheduler ticks per screen capture.
pub const DEFAULT_CAPTURE_RATIO: u32 = 1;

/// A point in global display coordinates, top-left origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The rectangular screen area sampled on a capture tick.
///
/// Recomputed from the cursor position every tick; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub center: Point,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    pub fn centered(center: Point, width: u32, height: u32) -> Self {
        Self { center, width, height }
    }

    /// Top-left corner of the region in global display coordinates.
    pub fn origin(&self) -> Point {
        Point {
            x: self.center.x - self.width as i32 / 2,
            y: self.center.y - self.height as i32 / 2,
        }
    }
}

/// Opaque platform window identity (HWND on Windows, CGWindowID on macOS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowHandle(pub usize);

/// Windows omitted from the screen composite so the picker never samples
/// its own pixels.
///
/// Mutated only by the owning session at start/teardown; read-only during
/// capture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowExclusionSet {
    handles: Vec<WindowHandle>,
}

impl WindowExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: WindowHandle) {
        if !self.contains(handle) {
            self.handles.push(handle);
        }
    }

    pub fn contains(&self, handle: WindowHandle) -> bool {
        self.handles.contains(&handle)
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = WindowHandle> + '_ {
        self.handles.iter().copied()
    }
}
