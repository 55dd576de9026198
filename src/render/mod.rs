//! # Certificate Rasterizer
//!
//! Renders a resolved certificate to an RGBA page image.
//!
//! ```text
//! Template + BindingContext → resolve() → ResolvedCertificate
//!                                              ↓ AssetResolver::materialize
//!                                         Rasterizer::render → RgbaImage
//!                                              ↓
//!                                    PNG preview / thumbnail / PDF export
//! ```
//!
//! The scale factor is the pixel-density multiplier: the output image is
//! `(1123·scale) × (794·scale)` pixels, so export sharpness is controlled
//! independently of the logical canvas size.

pub mod font;
pub mod placeholder;

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage, imageops};

use crate::error::LaureaError;
use crate::resolve::{ImageInstruction, RenderInstruction, ResolvedCertificate, TextInstruction};
use crate::template::{CANVAS_HEIGHT, CANVAS_WIDTH, FontWeight, ImageSource, TextAlign};

use font::GlyphCache;

/// Renders resolved certificates at a fixed pixel-density multiplier.
pub struct Rasterizer {
    scale: f32,
    cache: GlyphCache,
}

impl Rasterizer {
    /// `scale` is clamped to a sane positive range.
    pub fn new(scale: f32) -> Self {
        Self {
            scale: scale.clamp(0.05, 8.0),
            cache: GlyphCache::new(),
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Rasterize onto a white page.
    ///
    /// Image instructions with a URL or data-URI source must have been
    /// materialized first; finding one without pixels is an asset error, not
    /// a blank box.
    pub fn render(&mut self, resolved: &ResolvedCertificate) -> Result<RgbaImage, LaureaError> {
        let page_w = (CANVAS_WIDTH * self.scale as f64).round() as u32;
        let page_h = (CANVAS_HEIGHT * self.scale as f64).round() as u32;
        let mut canvas = RgbaImage::from_pixel(page_w, page_h, Rgba([255, 255, 255, 255]));

        for instruction in &resolved.instructions {
            match instruction {
                RenderInstruction::Text(text) => self.draw_text(&mut canvas, text)?,
                RenderInstruction::Image(img) => self.draw_image(&mut canvas, img)?,
            }
        }
        Ok(canvas)
    }

    /// Convenience: rasterize straight to PNG bytes.
    pub fn render_png(&mut self, resolved: &ResolvedCertificate) -> Result<Vec<u8>, LaureaError> {
        let canvas = self.render(resolved)?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(canvas)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .map_err(|e| LaureaError::Export(format!("Failed to encode preview PNG: {}", e)))?;
        Ok(bytes)
    }

    fn draw_text(
        &mut self,
        canvas: &mut RgbaImage,
        text: &TextInstruction,
    ) -> Result<(), LaureaError> {
        if text.content.is_empty() {
            return Ok(());
        }
        let color = parse_hex_color(&text.color)?;
        let pixel_height = ((text.font_size * self.scale).round() as usize).max(4);
        let wrap = (text.width > 0.0)
            .then(|| ((text.width * self.scale).round() as usize).max(1));
        let block = font::layout_text(&text.content, pixel_height, wrap);

        // Visual anchoring is centered on (x, y)
        let left = (text.x * self.scale as f64).round() as i64 - block.width as i64 / 2;
        let top = (text.y * self.scale as f64).round() as i64 - block.height as i64 / 2;

        for (row, line) in block.lines.iter().enumerate() {
            let line_w = (line.chars().count() * block.cell_w) as i64;
            let line_left = match text.align {
                TextAlign::Left => left,
                TextAlign::Center => left + (block.width as i64 - line_w) / 2,
                TextAlign::Right => left + block.width as i64 - line_w,
            };
            let line_top = top + (row * block.cell_h) as i64;
            let mut x = line_left;
            for ch in line.chars() {
                let glyph =
                    font::scale_bitmap(self.cache.glyph(ch), block.cell_w, block.cell_h);
                placeholder::blit_glyph(canvas, &glyph, block.cell_w, block.cell_h, x, line_top, color);
                if text.font_weight == FontWeight::Bold {
                    // Double-strike one pixel right
                    placeholder::blit_glyph(
                        canvas,
                        &glyph,
                        block.cell_w,
                        block.cell_h,
                        x + 1,
                        line_top,
                        color,
                    );
                }
                x += block.cell_w as i64;
            }
        }
        Ok(())
    }

    fn draw_image(
        &mut self,
        canvas: &mut RgbaImage,
        img: &ImageInstruction,
    ) -> Result<(), LaureaError> {
        let box_w = ((img.width * self.scale as f64).round() as u32).max(1);
        let box_h = ((img.height * self.scale as f64).round() as u32).max(1);
        let left = (img.x * self.scale as f64).round() as i64 - box_w as i64 / 2;
        let top = (img.y * self.scale as f64).round() as i64 - box_h as i64 / 2;

        match (&img.source, &img.pixels) {
            (ImageSource::Placeholder(kind), _) => {
                placeholder::draw(canvas, &mut self.cache, *kind, left, top, box_w, box_h);
                Ok(())
            }
            (_, Some(pixels)) => {
                let resized = pixels.resize_exact(box_w, box_h, FilterType::Lanczos3);
                imageops::overlay(canvas, &resized.to_rgba8(), left, top);
                Ok(())
            }
            (source, None) => Err(LaureaError::Asset(format!(
                "Image source was not materialized before rendering: {:?}",
                source
            ))),
        }
    }
}

/// Parse a `#rrggbb` color string.
pub fn parse_hex_color(color: &str) -> Result<Rgba<u8>, LaureaError> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(LaureaError::Validation(format!(
            "Invalid color \"{}\" (expected #rrggbb)",
            color
        )));
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    Ok(Rgba([channel(0), channel(2), channel(4), 255]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{BindingContext, resolve};
    use crate::template::{Element, ImageElement, PlaceholderKind, Template, TextElement};

    fn title_template() -> Template {
        Template {
            name: "t".into(),
            elements: vec![Element::Text(TextElement {
                id: 1,
                x: CANVAS_WIDTH / 2.0,
                y: CANVAS_HEIGHT / 2.0,
                value: "Certificate".into(),
                font_size: 40.0,
                font_family: "serif".into(),
                font_weight: FontWeight::Bold,
                color: "#000000".into(),
                width: 0.0,
                align: TextAlign::Center,
                is_required: false,
                label: None,
            })],
        }
    }

    fn render_at(scale: f32, template: &Template) -> RgbaImage {
        let resolved = resolve(template, &BindingContext::default()).unwrap();
        Rasterizer::new(scale).render(&resolved).unwrap()
    }

    #[test]
    fn page_dimensions_follow_the_density_multiplier() {
        let page = render_at(1.0, &title_template());
        assert_eq!((page.width(), page.height()), (1123, 794));
        let page = render_at(2.0, &title_template());
        assert_eq!((page.width(), page.height()), (2246, 1588));
    }

    #[test]
    fn text_ink_is_centered_on_its_anchor() {
        let page = render_at(1.0, &title_template());
        let ink: Vec<(u32, u32)> = page
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [255, 255, 255, 255])
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!ink.is_empty());
        let min_x = ink.iter().map(|&(x, _)| x).min().unwrap() as f64;
        let max_x = ink.iter().map(|&(x, _)| x).max().unwrap() as f64;
        let center = (min_x + max_x) / 2.0;
        assert!(
            (center - CANVAS_WIDTH / 2.0).abs() < 15.0,
            "ink center {} far from anchor",
            center
        );
    }

    #[test]
    fn placeholder_elements_render_without_materialization() {
        let template = Template {
            name: "t".into(),
            elements: vec![Element::Image(ImageElement {
                id: 1,
                x: 963.0,
                y: 130.0,
                value: "placeholder://logo".into(),
                width: 150.0,
                height: 150.0,
                is_required: true,
                placeholder_type: Some(PlaceholderKind::Logo),
                label: Some("Logo".into()),
            })],
        };
        let page = render_at(1.0, &template);
        // Box fill at the anchor
        assert_eq!(*page.get_pixel(963, 130), Rgba([229, 231, 235, 255]));
    }

    #[test]
    fn unmaterialized_url_fails_loudly() {
        let template = Template {
            name: "t".into(),
            elements: vec![Element::Image(ImageElement {
                id: 1,
                x: 200.0,
                y: 200.0,
                value: "https://example.com/logo.png".into(),
                width: 100.0,
                height: 100.0,
                is_required: false,
                placeholder_type: None,
                label: None,
            })],
        };
        let resolved = resolve(&template, &BindingContext::default()).unwrap();
        let err = Rasterizer::new(1.0).render(&resolved).unwrap_err();
        assert!(matches!(err, LaureaError::Asset(_)));
    }

    #[test]
    fn off_canvas_elements_do_not_panic() {
        let mut template = title_template();
        template.elements[0].set_position(-300.0, 2000.0);
        let page = render_at(0.5, &template);
        assert_eq!(page.width(), 562);
    }

    #[test]
    fn hex_colors_parse_and_reject() {
        assert_eq!(parse_hex_color("#ff8000").unwrap(), Rgba([255, 128, 0, 255]));
        assert!(parse_hex_color("red").is_err());
        assert!(parse_hex_color("#12345").is_err());
    }
}
