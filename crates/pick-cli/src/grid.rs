//! Magnified grid preview rendering.
//!
//! Pure pixel pushing into a `u32` 0RGB frame: every buffer sample becomes
//! a magnified cell with one-pixel separators on a gray backdrop, and the
//! center cell gets a black/white ring so the reported pixel is obvious.

use pick_core::{Color, PixelBuffer};

/// Side length of one magnified cell in window pixels.
pub const CELL_PIXELS: usize = 9;
/// Separator between cells in window pixels.
pub const CELL_GAP: usize = 1;

/// Backdrop showing through between cells (72% gray).
const BACKDROP: u32 = 0x00B8_B8B8;
const BLACK: u32 = 0x0000_0000;
const WHITE: u32 = 0x00FF_FFFF;

/// Window span hosting `cells` magnified samples along one axis.
pub fn span(cells: usize) -> usize {
    cells * (CELL_PIXELS + CELL_GAP) + CELL_GAP
}

/// Window dimensions for a preview of `cells_x` by `cells_y` samples.
pub fn frame_dimensions(cells_x: usize, cells_y: usize) -> (usize, usize) {
    (span(cells_x), span(cells_y))
}

fn pack(color: Color) -> u32 {
    ((color.r as u32) << 16) | ((color.g as u32) << 8) | color.b as u32
}

fn fill_rect(frame: &mut [u32], frame_width: usize, x: usize, y: usize, w: usize, h: usize, color: u32) {
    let frame_height = frame.len() / frame_width.max(1);
    for row in y..(y + h).min(frame_height) {
        for col in x..(x + w).min(frame_width) {
            frame[row * frame_width + col] = color;
        }
    }
}

/// Top-left window pixel of the cell at grid coordinates `(x, y)`.
fn cell_origin(x: usize, y: usize) -> (usize, usize) {
    (
        CELL_GAP + x * (CELL_PIXELS + CELL_GAP),
        CELL_GAP + y * (CELL_PIXELS + CELL_GAP),
    )
}

/// Render the buffer into `frame` (`width * height`, row-major).
pub fn render(buffer: &PixelBuffer, frame: &mut [u32], width: usize, height: usize) {
    debug_assert_eq!(frame.len(), width * height);

    for pixel in frame.iter_mut() {
        *pixel = BACKDROP;
    }

    for cell_y in 0..buffer.height() {
        for cell_x in 0..buffer.width() {
            let Some(sample) = buffer.get(cell_x, cell_y) else {
                continue;
            };
            let (x0, y0) = cell_origin(cell_x as usize, cell_y as usize);
            fill_rect(
                frame,
                width,
                x0,
                y0,
                CELL_PIXELS,
                CELL_PIXELS,
                pack(Color::from_sample(sample)),
            );
        }
    }

    // Black/white ring around the center cell, sample color inside.
    let (center_x, center_y) = buffer.center_coords();
    let (x0, y0) = cell_origin(center_x as usize, center_y as usize);
    fill_rect(frame, width, x0 - 1, y0 - 1, CELL_PIXELS + 2, CELL_PIXELS + 2, BLACK);
    fill_rect(frame, width, x0, y0, CELL_PIXELS, CELL_PIXELS, WHITE);
    let center = pack(Color::from_sample(buffer.center()));
    fill_rect(frame, width, x0 + 1, y0 + 1, CELL_PIXELS - 2, CELL_PIXELS - 2, center);
}
