//! macOS cursor polling via a throwaway Quartz event.
//!
//! The event location is in Quartz coordinates (top-left origin), the same
//! space the capture bounds use, so nothing downstream needs flipping.

use core_graphics::event::CGEvent;
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use pick_core::Point;

pub fn cursor_position() -> Option<Point> {
    let source = CGEventSource::new(CGEventSourceStateID::CombinedSessionState).ok()?;
    let event = CGEvent::new(source).ok()?;
    let location = event.location();
    Some(Point::new(location.x as i32, location.y as i32))
}
