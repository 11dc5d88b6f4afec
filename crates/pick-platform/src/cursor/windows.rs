//! Windows cursor polling via `GetCursorPos`.

use pick_core::Point;
use windows_sys::Win32::Foundation::POINT;
use windows_sys::Win32::UI::WindowsAndMessaging::GetCursorPos;

pub fn cursor_position() -> Option<Point> {
    unsafe {
        let mut point = POINT { x: 0, y: 0 };
        if GetCursorPos(&mut point) == 0 {
            return None;
        }
        Some(Point::new(point.x, point.y))
    }
}
