//! # PDF Export
//!
//! Embeds a rendered certificate page into a single-page PDF. The page is
//! always A4 landscape (297 x 210 mm); the raster is placed to cover it
//! edge to edge regardless of the pixel density it was rendered at, so a
//! higher `scale` sharpens the output without changing the layout.

use image::RgbaImage;
use printpdf::{ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px};

use crate::error::LaureaError;

/// Physical page size of the exported document.
pub const PAGE_WIDTH_MM: f64 = 297.0;
pub const PAGE_HEIGHT_MM: f64 = 210.0;

const MM_PER_INCH: f64 = 25.4;

/// A finished export: the suggested download name and the PDF bytes.
pub struct ExportedCertificate {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Build the single-page PDF around a rendered page.
///
/// `recipient` feeds the file name; `None` or a blank value falls back to
/// the literal `Recipient`.
pub fn export_pdf(
    page: &RgbaImage,
    recipient: Option<&str>,
) -> Result<ExportedCertificate, LaureaError> {
    let (doc, page_idx, layer_idx) = PdfDocument::new(
        "Certificate",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "certificate",
    );
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let xobject = ImageXObject {
        width: Px(page.width() as usize),
        height: Px(page.height() as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: flatten_to_rgb(page),
        image_filter: None,
        clipping_bbox: None,
    };

    // A dpi that makes the raster exactly 297 mm wide fills the page.
    let dpi = page.width() as f64 * MM_PER_INCH / PAGE_WIDTH_MM;
    Image::from(xobject).add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(0.0)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| LaureaError::Export(format!("Failed to serialize PDF: {e}")))?;

    Ok(ExportedCertificate {
        file_name: file_name(recipient),
        bytes,
    })
}

/// `Certificate-<recipient>.pdf`, with path-hostile characters stripped.
pub fn file_name(recipient: Option<&str>) -> String {
    let name = recipient
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Recipient");
    let safe: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("Certificate-{safe}.pdf")
}

/// Drop the alpha channel by compositing onto white, matching the page
/// background the rasterizer starts from.
fn flatten_to_rgb(page: &RgbaImage) -> Vec<u8> {
    let mut data = Vec::with_capacity(page.width() as usize * page.height() as usize * 3);
    for pixel in page.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u16;
        for channel in [r, g, b] {
            let composited = (channel as u16 * alpha + 255 * (255 - alpha)) / 255;
            data.push(composited as u8);
        }
    }
    data
}
