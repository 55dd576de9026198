//! Generated placeholder graphics for unbound logo/signature elements.
//!
//! A placeholder renders as a bordered light-gray box with a centered
//! uppercase label, so a template preview shows where the asset will land
//! before any recipient data is bound.

use image::{Rgba, RgbaImage};

use super::font::{self, GlyphCache};
use crate::template::PlaceholderKind;

const FILL: Rgba<u8> = Rgba([229, 231, 235, 255]);
const BORDER: Rgba<u8> = Rgba([156, 163, 175, 255]);
const LABEL: Rgba<u8> = Rgba([107, 114, 128, 255]);
const BORDER_PX: i64 = 2;

/// Draw the labeled box for `kind` into `canvas`. The rectangle may extend
/// past the canvas; out-of-bounds pixels are skipped.
pub fn draw(
    canvas: &mut RgbaImage,
    cache: &mut GlyphCache,
    kind: PlaceholderKind,
    left: i64,
    top: i64,
    width: u32,
    height: u32,
) {
    let right = left + width as i64;
    let bottom = top + height as i64;

    for y in top..bottom {
        for x in left..right {
            let on_border = x - left < BORDER_PX
                || right - x <= BORDER_PX
                || y - top < BORDER_PX
                || bottom - y <= BORDER_PX;
            put_pixel(canvas, x, y, if on_border { BORDER } else { FILL });
        }
    }

    let label: String = kind.label().to_uppercase();
    // Label sized to the box, clamped so small boxes stay legible
    let label_px = (height as usize / 4).clamp(10, 28);
    let (cell_w, cell_h) = font::char_cell(label_px);
    let label_w = (label.chars().count() * cell_w) as i64;
    let text_left = left + (width as i64 - label_w) / 2;
    let text_top = top + (height as i64 - cell_h as i64) / 2;

    let mut x = text_left;
    for ch in label.chars() {
        let glyph = font::scale_bitmap(cache.glyph(ch), cell_w, cell_h);
        blit_glyph(canvas, &glyph, cell_w, cell_h, x, text_top, LABEL);
        x += cell_w as i64;
    }
}

/// Copy a scaled glyph bitmap onto the canvas at the given color.
pub fn blit_glyph(
    canvas: &mut RgbaImage,
    glyph: &[u8],
    cell_w: usize,
    cell_h: usize,
    left: i64,
    top: i64,
    color: Rgba<u8>,
) {
    for gy in 0..cell_h {
        for gx in 0..cell_w {
            if glyph[gy * cell_w + gx] != 0 {
                put_pixel(canvas, left + gx as i64, top + gy as i64, color);
            }
        }
    }
}

fn put_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_box_has_fill_border_and_label() {
        let mut canvas = RgbaImage::from_pixel(300, 300, Rgba([255, 255, 255, 255]));
        let mut cache = GlyphCache::new();
        draw(&mut canvas, &mut cache, PlaceholderKind::Logo, 50, 50, 150, 150);

        assert_eq!(*canvas.get_pixel(51, 51), BORDER);
        assert_eq!(*canvas.get_pixel(60, 60), FILL);
        // The centered "LOGO" label leaves darker pixels somewhere inside
        let has_label = canvas.pixels().any(|p| *p == LABEL);
        assert!(has_label);
    }

    #[test]
    fn off_canvas_region_is_clipped_not_panicking() {
        let mut canvas = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
        let mut cache = GlyphCache::new();
        draw(
            &mut canvas,
            &mut cache,
            PlaceholderKind::Signature,
            -40,
            60,
            120,
            90,
        );
        assert_eq!(*canvas.get_pixel(10, 70), FILL);
    }
}
