//! Host window glue over `minifb`.
//!
//! A borderless topmost window sized to the magnified grid. It exposes
//! exactly what the session needs: its platform identity for exclusion
//! registration, cursor-following repositioning, preview redraw, and
//! cancel/confirm input mapping.

use crate::grid;
use minifb::{Key, KeyRepeat, MouseButton, Window, WindowOptions};
use pick_core::{HostWindow, PickerConfig, PixelBuffer, Point, TerminalInput, WindowHandle};
use thiserror::Error;
use tracing::warn;

/// Host window errors, fatal to session start.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("window creation failed: {0}")]
    WindowCreation(String),
}

/// The picker's floating preview window.
pub struct PickerHost {
    window: Window,
    frame: Vec<u32>,
    width: usize,
    height: usize,
    mouse_was_down: bool,
}

impl PickerHost {
    pub fn new(config: &PickerConfig) -> Result<Self, HostError> {
        let (width, height) = grid::frame_dimensions(
            config.bound_width as usize,
            config.bound_height as usize,
        );

        let options = WindowOptions {
            borderless: true,
            title: false,
            resize: false,
            topmost: true,
            ..WindowOptions::default()
        };
        let mut window = Window::new("pick", width, height, options)
            .map_err(|e| HostError::WindowCreation(e.to_string()))?;
        // The session loop owns the tick cadence.
        window.set_target_fps(0);

        Ok(Self {
            window,
            frame: vec![0u32; width * height],
            width,
            height,
            mouse_was_down: false,
        })
    }
}

impl HostWindow for PickerHost {
    fn handle(&self) -> WindowHandle {
        WindowHandle(native_handle(&self.window))
    }

    fn move_center_to(&mut self, center: Point) {
        let x = center.x as isize - (self.width / 2) as isize;
        let y = center.y as isize - (self.height / 2) as isize;
        self.window.set_position(x, y);
    }

    fn redraw(&mut self, buffer: &PixelBuffer) {
        grid::render(buffer, &mut self.frame, self.width, self.height);
        // update_with_buffer also pumps the window's input events.
        if let Err(error) = self
            .window
            .update_with_buffer(&self.frame, self.width, self.height)
        {
            warn!(%error, "window update failed");
        }
    }

    fn poll_input(&mut self) -> Option<TerminalInput> {
        if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
            return Some(TerminalInput::Cancel);
        }
        if self.window.is_key_pressed(Key::Enter, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Space, KeyRepeat::No)
        {
            return Some(TerminalInput::Confirm);
        }

        // Confirm on button release, matching "mouse up or click".
        let down = self.window.get_mouse_down(MouseButton::Left)
            || self.window.get_mouse_down(MouseButton::Right);
        if self.mouse_was_down && !down {
            return Some(TerminalInput::Confirm);
        }
        self.mouse_was_down = down;
        None
    }
}

/// Resolve the window identity the capture exclusion understands.
#[cfg(target_os = "macos")]
fn native_handle(window: &Window) -> usize {
    use objc::{msg_send, sel, sel_impl};

    // minifb hands back the NSWindow; exclusion needs its window number.
    let ns_window = window.get_window_handle();
    if ns_window.is_null() {
        return 0;
    }
    let number: isize = unsafe { msg_send![ns_window as *mut objc::runtime::Object, windowNumber] };
    number as usize
}

#[cfg(not(target_os = "macos"))]
fn native_handle(window: &Window) -> usize {
    window.get_window_handle() as usize
}
