//! Terminal color reporting.
//!
//! The single point where a finished session turns its buffer into a
//! result. Cancelled sessions produce nothing on the result channel; the
//! sampled color is still logged for diagnostics.

use crate::buffer::PixelBuffer;
use crate::color::Color;
use tracing::debug;

/// The center color of the buffer, converted to 8-bit sRGB.
pub fn center_color(buffer: &PixelBuffer) -> Color {
    Color::from_sample(buffer.center())
}

/// Produce the session result from the buffer's center sample.
///
/// Returns `None` when `suppressed` is set (session cancelled).
pub fn emit(buffer: &PixelBuffer, suppressed: bool) -> Option<Color> {
    let color = center_color(buffer);
    if suppressed {
        debug!(color = %color, "session cancelled, result suppressed");
        return None;
    }
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Sample;

    fn buffer_with_center(sample: Sample) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(17, 17);
        let (x, y) = buffer.center_coords();
        buffer.set(x, y, sample);
        buffer
    }

    #[test]
    fn test_emit_center_color() {
        let buffer = buffer_with_center(Sample::new(1.0, 0.0, 0.0, 1.0));
        let color = emit(&buffer, false).unwrap();
        assert_eq!(color.to_hex(), "#FF0000");
    }

    #[test]
    fn test_emit_is_deterministic() {
        let buffer = buffer_with_center(Sample::new(0.25, 0.5, 0.75, 1.0));
        let first = emit(&buffer, false);
        let second = emit(&buffer, false);
        assert_eq!(first, second);
    }

    #[test]
    fn test_emit_suppressed_yields_nothing() {
        let buffer = buffer_with_center(Sample::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(emit(&buffer, true), None);
    }

    #[test]
    fn test_rounding_boundaries() {
        let buffer = buffer_with_center(Sample::new(1.0, 0.0, 0.5, 1.0));
        let color = emit(&buffer, false).unwrap();
        assert_eq!(color.to_hex(), "#FF0080");
    }
}
