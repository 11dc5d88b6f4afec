//! macOS screen capture via the CoreGraphics window list.
//!
//! The on-screen composite is taken below the picker's own window, so the
//! picker never samples itself. The captured image may carry the display's
//! color profile; drawing it into an sRGB bitmap context converts every
//! pixel before the frame is committed.

use crate::error::{PlatformError, PlatformResult};
use core_graphics::base::kCGImageAlphaPremultipliedLast;
use core_graphics::color_space::{kCGColorSpaceSRGB, CGColorSpace};
use core_graphics::context::CGContext;
use core_graphics::geometry::{CGPoint, CGRect, CGSize};
use core_graphics::image::CGImage;
use core_graphics::window::{
    self, kCGNullWindowID, kCGWindowImageNominalResolution,
    kCGWindowListOptionOnScreenBelowWindow, kCGWindowListOptionOnScreenOnly, CGWindowID,
};
use pick_core::{CaptureRegion, PixelBuffer, Sample, WindowExclusionSet};
use tracing::debug;

pub fn capture_region(
    region: &CaptureRegion,
    excluded: &WindowExclusionSet,
    out: &mut PixelBuffer,
) -> PlatformResult<()> {
    let origin = region.origin();
    let bounds = CGRect::new(
        &CGPoint::new(origin.x as f64, origin.y as f64),
        &CGSize::new(region.width as f64, region.height as f64),
    );

    // The exclusion set only ever holds the picker's own window; composite
    // everything below it. Extra handles are ignored.
    let (list_option, relative_window) = match excluded.iter().next() {
        Some(handle) => {
            if excluded.len() > 1 {
                debug!(extra = excluded.len() - 1, "only the first excluded window is honored");
            }
            (kCGWindowListOptionOnScreenBelowWindow, handle.0 as CGWindowID)
        }
        None => (kCGWindowListOptionOnScreenOnly, kCGNullWindowID),
    };

    let image = window::create_image(
        bounds,
        list_option,
        relative_window,
        kCGWindowImageNominalResolution,
    )
    .ok_or_else(|| PlatformError::CaptureFailed("window list image unavailable".into()))?;

    let width = image.width() as u32;
    let height = image.height() as u32;
    if width != region.width || height != region.height {
        // Clipped at a screen edge, or capture permission not granted.
        return Err(PlatformError::SizeMismatch {
            want_width: region.width,
            want_height: region.height,
            got_width: width,
            got_height: height,
        });
    }

    let frame = convert_to_srgb(&image, width, height)?;
    if !out.fill_from(&frame) {
        return Err(PlatformError::CaptureFailed("decoded frame size mismatch".into()));
    }
    Ok(())
}

/// Draw the captured image into an sRGB bitmap context and read it back as
/// normalized samples, top row first.
fn convert_to_srgb(image: &CGImage, width: u32, height: u32) -> PlatformResult<Vec<Sample>> {
    let name = unsafe { kCGColorSpaceSRGB };
    let color_space = CGColorSpace::create_with_name(name)
        .ok_or_else(|| PlatformError::CaptureFailed("sRGB color space unavailable".into()))?;

    let mut context = CGContext::create_bitmap_context(
        None,
        width as usize,
        height as usize,
        8,
        width as usize * 4,
        &color_space,
        kCGImageAlphaPremultipliedLast,
    );

    let rect = CGRect::new(
        &CGPoint::new(0.0, 0.0),
        &CGSize::new(width as f64, height as f64),
    );
    context.draw_image(rect, image);

    let data = context.data();
    let mut frame = Vec::with_capacity((width * height) as usize);
    for chunk in data.chunks_exact(4) {
        let a = chunk[3] as f32 / 255.0;
        // Undo the context's premultiplication; screen composites are
        // opaque so this is normally a no-op.
        let (r, g, b) = if a > 0.0 {
            (
                (chunk[0] as f32 / 255.0 / a).min(1.0),
                (chunk[1] as f32 / 255.0 / a).min(1.0),
                (chunk[2] as f32 / 255.0 / a).min(1.0),
            )
        } else {
            (0.0, 0.0, 0.0)
        };
        frame.push(Sample::new(r, g, b, a));
    }
    Ok(frame)
}
