//! The fixed-size screen sample buffer.
//!
//! One `PixelBuffer` is allocated when the picker session starts and is
//! overwritten in place on every capture tick. Its dimensions never change
//! after allocation.

use serde::{Deserialize, Serialize};

/// A single screen sample with channels normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Sample {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build a sample from 8-bit channels, treating them as sRGB.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }
}

/// Row-major grid of screen samples, row 0 topmost.
///
/// Capacity is fixed at construction; samplers replace the whole frame via
/// [`PixelBuffer::fill_from`] and only after a capture fully succeeded, so
/// a failed capture leaves the previous contents intact.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    samples: Vec<Sample>,
}

impl PixelBuffer {
    /// Allocate a zeroed buffer. Dimensions must be positive; the session
    /// configuration is validated before any buffer is created.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "buffer dimensions must be positive");
        Self {
            width,
            height,
            samples: vec![Sample::default(); (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<Sample> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.samples[(y * self.width + x) as usize])
    }

    /// Overwrite the sample at `(x, y)`; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, sample: Sample) {
        if x < self.width && y < self.height {
            self.samples[(y * self.width + x) as usize] = sample;
        }
    }

    /// Coordinates of the center sample: `(width/2, height/2)`.
    pub fn center_coords(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    /// The center sample.
    pub fn center(&self) -> Sample {
        let (x, y) = self.center_coords();
        self.samples[(y * self.width + x) as usize]
    }

    /// Read-only view of the whole frame, row-major.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Replace the whole frame in one step.
    ///
    /// Returns `false` without touching the buffer when `frame` does not
    /// match the fixed capacity.
    pub fn fill_from(&mut self, frame: &[Sample]) -> bool {
        if frame.len() != self.samples.len() {
            return false;
        }
        self.samples.copy_from_slice(frame);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_fixed() {
        let buffer = PixelBuffer::new(17, 17);
        assert_eq!(buffer.width(), 17);
        assert_eq!(buffer.height(), 17);
        assert_eq!(buffer.samples().len(), 17 * 17);
    }

    #[test]
    fn test_center_coords_odd() {
        let buffer = PixelBuffer::new(17, 17);
        assert_eq!(buffer.center_coords(), (8, 8));
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut buffer = PixelBuffer::new(3, 3);
        let red = Sample::new(1.0, 0.0, 0.0, 1.0);
        buffer.set(2, 1, red);
        assert_eq!(buffer.get(2, 1), Some(red));
        assert_eq!(buffer.get(3, 1), None);
        assert_eq!(buffer.get(2, 3), None);
    }

    #[test]
    fn test_center_tracks_set() {
        let mut buffer = PixelBuffer::new(17, 17);
        buffer.set(8, 8, Sample::new(0.5, 0.25, 0.75, 1.0));
        assert_eq!(buffer.center(), Sample::new(0.5, 0.25, 0.75, 1.0));
    }

    #[test]
    fn test_fill_from_rejects_wrong_length() {
        let mut buffer = PixelBuffer::new(4, 4);
        let before = buffer.clone();
        assert!(!buffer.fill_from(&[Sample::default(); 15]));
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_fill_from_replaces_frame() {
        let mut buffer = PixelBuffer::new(2, 2);
        let frame = [
            Sample::new(1.0, 0.0, 0.0, 1.0),
            Sample::new(0.0, 1.0, 0.0, 1.0),
            Sample::new(0.0, 0.0, 1.0, 1.0),
            Sample::new(1.0, 1.0, 1.0, 1.0),
        ];
        assert!(buffer.fill_from(&frame));
        assert_eq!(buffer.get(1, 0), Some(frame[1]));
        assert_eq!(buffer.get(0, 1), Some(frame[2]));
    }

    #[test]
    fn test_from_rgba8_normalizes() {
        let sample = Sample::from_rgba8(255, 0, 128, 255);
        assert_eq!(sample.r, 1.0);
        assert_eq!(sample.g, 0.0);
        assert!((sample.b - 128.0 / 255.0).abs() < f32::EPSILON);
        assert_eq!(sample.a, 1.0);
    }
}
