//! Windows screen capture via GDI.
//!
//! The region is blitted from the screen DC into a 32-bit top-down DIB and
//! decoded BGRA -> normalized RGBA. GDI hands back device RGB, which is
//! treated as sRGB. Exclusion uses `WDA_EXCLUDEFROMCAPTURE` display
//! affinity on the excluded handles; the layered preview window is skipped
//! by a plain SRCCOPY blit anyway.

use crate::error::{PlatformError, PlatformResult};
use pick_core::{CaptureRegion, PixelBuffer, Sample, WindowExclusionSet};
use std::ptr;
use tracing::debug;
use windows_sys::Win32::Foundation::HWND;
use windows_sys::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC, GetDIBits,
    ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, RGBQUAD,
    SRCCOPY,
};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    SetWindowDisplayAffinity, WDA_EXCLUDEFROMCAPTURE,
};

pub fn capture_region(
    region: &CaptureRegion,
    excluded: &WindowExclusionSet,
    out: &mut PixelBuffer,
) -> PlatformResult<()> {
    let width = region.width as i32;
    let height = region.height as i32;
    let origin = region.origin();

    // Affinity sticks to the window, so re-applying each tick is a no-op
    // after the first capture.
    for handle in excluded.iter() {
        unsafe {
            if SetWindowDisplayAffinity(handle.0 as HWND, WDA_EXCLUDEFROMCAPTURE) == 0 {
                debug!(handle = handle.0, "display affinity not applied");
            }
        }
    }

    let raw = unsafe { blit_screen_region(origin.x, origin.y, width, height)? };

    // Decode BGRA and commit the whole frame at once.
    let mut frame = Vec::with_capacity((width * height) as usize);
    for chunk in raw.chunks_exact(4) {
        frame.push(Sample::from_rgba8(chunk[2], chunk[1], chunk[0], 0xFF));
    }
    if !out.fill_from(&frame) {
        return Err(PlatformError::CaptureFailed("decoded frame size mismatch".into()));
    }
    Ok(())
}

/// Blit a screen rectangle into a top-down 32bpp DIB and return its bytes.
///
/// Every GDI handle acquired here is released before returning.
unsafe fn blit_screen_region(x: i32, y: i32, width: i32, height: i32) -> PlatformResult<Vec<u8>> {
    let hdc_screen = GetDC(ptr::null_mut()); // null = entire screen
    if hdc_screen.is_null() {
        return Err(PlatformError::CaptureFailed("GetDC failed".into()));
    }

    let hdc_mem = CreateCompatibleDC(hdc_screen);
    if hdc_mem.is_null() {
        ReleaseDC(ptr::null_mut(), hdc_screen);
        return Err(PlatformError::CaptureFailed("CreateCompatibleDC failed".into()));
    }

    let hbitmap = CreateCompatibleBitmap(hdc_screen, width, height);
    if hbitmap.is_null() {
        DeleteDC(hdc_mem);
        ReleaseDC(ptr::null_mut(), hdc_screen);
        return Err(PlatformError::CaptureFailed("CreateCompatibleBitmap failed".into()));
    }

    let old_bitmap = SelectObject(hdc_mem, hbitmap);

    let blit_ok = BitBlt(hdc_mem, 0, 0, width, height, hdc_screen, x, y, SRCCOPY) != 0;

    let mut bmi = BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: width,
            biHeight: -height, // Top-down
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB,
            biSizeImage: 0,
            biXPelsPerMeter: 0,
            biYPelsPerMeter: 0,
            biClrUsed: 0,
            biClrImportant: 0,
        },
        bmiColors: [RGBQUAD {
            rgbBlue: 0,
            rgbGreen: 0,
            rgbRed: 0,
            rgbReserved: 0,
        }],
    };

    let mut raw = vec![0u8; (width * height * 4) as usize];
    let lines = if blit_ok {
        GetDIBits(
            hdc_mem,
            hbitmap,
            0,
            height as u32,
            raw.as_mut_ptr() as *mut _,
            &mut bmi,
            DIB_RGB_COLORS,
        )
    } else {
        0
    };

    // Cleanup
    SelectObject(hdc_mem, old_bitmap);
    DeleteObject(hbitmap);
    DeleteDC(hdc_mem);
    ReleaseDC(ptr::null_mut(), hdc_screen);

    if !blit_ok {
        return Err(PlatformError::CaptureFailed("BitBlt failed".into()));
    }
    if lines != height {
        return Err(PlatformError::SizeMismatch {
            want_width: width as u32,
            want_height: height as u32,
            got_width: width as u32,
            got_height: lines.max(0) as u32,
        });
    }

    Ok(raw)
}
