//! Glyph generation and text measurement for the rasterizer.
//!
//! Uses the Spleen 12x24 bitmap font, nearest-neighbor scaled to the
//! element's font size. Bitmap glyphs keep the raster output fully
//! deterministic across platforms, which the thumbnail and export tests
//! rely on.

use std::collections::HashMap;

use spleen_font::{FONT_12X24, PSF2Font};

/// Native glyph cell of the source font.
pub const GLYPH_WIDTH: usize = 12;
pub const GLYPH_HEIGHT: usize = 24;

/// Scaled character cell for a target pixel height (the 12x24 aspect).
pub fn char_cell(pixel_height: usize) -> (usize, usize) {
    let h = pixel_height.max(4);
    (h.div_ceil(2), h)
}

/// Base glyph bitmaps, generated once per character.
#[derive(Default)]
pub struct GlyphCache {
    glyphs: HashMap<char, Vec<u8>>,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The 12x24 bitmap for a character: one byte per pixel, 0 or 1.
    pub fn glyph(&mut self, ch: char) -> &[u8] {
        self.glyphs.entry(ch).or_insert_with(|| generate_glyph(ch))
    }
}

/// Generate a 12x24 glyph bitmap. Unknown characters render as a box.
fn generate_glyph(ch: char) -> Vec<u8> {
    let mut glyph = vec![0u8; GLYPH_WIDTH * GLYPH_HEIGHT];
    let mut spleen = match PSF2Font::new(FONT_12X24) {
        Ok(f) => f,
        Err(_) => {
            draw_box(&mut glyph, GLYPH_WIDTH, GLYPH_HEIGHT);
            return glyph;
        }
    };
    let utf8 = ch.to_string();
    if let Some(rows) = spleen.glyph_for_utf8(utf8.as_bytes()) {
        for (y, row) in rows.enumerate() {
            for (x, on) in row.enumerate() {
                let idx = y * GLYPH_WIDTH + x;
                if idx < glyph.len() && on {
                    glyph[idx] = 1;
                }
            }
        }
    } else {
        draw_box(&mut glyph, GLYPH_WIDTH, GLYPH_HEIGHT);
    }
    glyph
}

/// Scale a bitmap to a new cell size using nearest neighbor.
pub fn scale_bitmap(src: &[u8], dst_w: usize, dst_h: usize) -> Vec<u8> {
    let mut dst = vec![0u8; dst_w * dst_h];
    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = dx * GLYPH_WIDTH / dst_w;
            let sy = dy * GLYPH_HEIGHT / dst_h;
            dst[dy * dst_w + dx] = src[sy * GLYPH_WIDTH + sx];
        }
    }
    dst
}

/// Draw a box outline for characters missing from the font.
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = 1;
        glyph[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        glyph[y * width] = 1;
        glyph[y * width + width - 1] = 1;
    }
}

/// Break text into lines for a wrap width given in characters.
///
/// Explicit newlines are honored first; each resulting line is then
/// word-wrapped. Words longer than the wrap width are split hard.
pub fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        if raw.chars().count() <= max_chars {
            lines.push(raw.to_string());
            continue;
        }
        let mut current = String::new();
        for word in raw.split(' ') {
            let word_len = word.chars().count();
            let current_len = current.chars().count();
            if current.is_empty() && word_len <= max_chars {
                current.push_str(word);
            } else if current_len + 1 + word_len <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                // Hard-split oversized words
                let mut rest: Vec<char> = word.chars().collect();
                while rest.len() > max_chars {
                    lines.push(rest[..max_chars].iter().collect());
                    rest.drain(..max_chars);
                }
                current = rest.into_iter().collect();
            }
        }
        lines.push(current);
    }
    lines
}

/// Measured text block: wrapped lines plus pixel dimensions.
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: usize,
    pub height: usize,
    pub cell_w: usize,
    pub cell_h: usize,
}

/// Lay out a text run at a pixel font size. `wrap_width` in pixels; `None`
/// means intrinsic width.
pub fn layout_text(text: &str, pixel_height: usize, wrap_width: Option<usize>) -> TextBlock {
    let (cell_w, cell_h) = char_cell(pixel_height);
    let lines = match wrap_width {
        Some(w) => wrap_lines(text, w / cell_w),
        None => text.split('\n').map(str::to_string).collect(),
    };
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    // A fixed wrap width is also the visual box width for alignment
    let width = match wrap_width {
        Some(w) => w.max(longest * cell_w),
        None => longest * cell_w,
    };
    TextBlock {
        height: lines.len() * cell_h,
        lines,
        width,
        cell_w,
        cell_h,
    }
}
