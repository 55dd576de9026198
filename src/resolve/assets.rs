//! Asset materialization: decodes image source references into pixels.
//!
//! `AssetResolver` handles the I/O-bound part of resolution (data-URI
//! decoding, HTTP fetch) so the rasterizer stays synchronous and the
//! resolver stays a pure data transformation. Placeholder graphics carry no
//! pixel data; the rasterizer draws them directly.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::DynamicImage;

use super::{RenderInstruction, ResolvedCertificate};
use crate::error::LaureaError;
use crate::template::ImageSource;

/// Materializes data-URI and URL image sources into decoded pixels.
pub struct AssetResolver {
    client: reqwest::Client,
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetResolver {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Populate `pixels` on every image instruction that needs fetching or
    /// decoding. Any failure aborts the whole pass; a certificate is never
    /// rendered with a silently-missing asset.
    pub async fn materialize(&self, resolved: &mut ResolvedCertificate) -> Result<(), LaureaError> {
        for instruction in &mut resolved.instructions {
            let RenderInstruction::Image(img) = instruction else {
                continue;
            };
            if img.pixels.is_some() {
                continue;
            }
            img.pixels = match &img.source {
                ImageSource::Placeholder(_) => None,
                ImageSource::DataUri(uri) => Some(decode_data_uri(uri)?),
                ImageSource::Url(url) => Some(self.fetch(url).await?),
            };
        }
        Ok(())
    }

    async fn fetch(&self, url: &str) -> Result<DynamicImage, LaureaError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LaureaError::Asset(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(LaureaError::Asset(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| LaureaError::Asset(format!("Failed to read image data: {}", e)))?;
        image::load_from_memory(&bytes)
            .map_err(|e| LaureaError::Asset(format!("Failed to decode image from {}: {}", url, e)))
    }
}

/// Decode a `data:<mime>;base64,<payload>` reference.
pub fn decode_data_uri(uri: &str) -> Result<DynamicImage, LaureaError> {
    let payload = uri
        .split_once(";base64,")
        .map(|(_, p)| p)
        .ok_or_else(|| LaureaError::Asset(format!("Unsupported data URI encoding: {}", truncate(uri))))?;
    let bytes = BASE64
        .decode(payload)
        .map_err(|e| LaureaError::Asset(format!("Invalid base64 in data URI: {}", e)))?;
    image::load_from_memory(&bytes)
        .map_err(|e| LaureaError::Asset(format!("Failed to decode data URI image: {}", e)))
}

/// Encode an image as a PNG data URI (used for thumbnails).
pub fn encode_png_data_uri(image: &DynamicImage) -> Result<String, LaureaError> {
    let mut bytes = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .map_err(|e| LaureaError::Asset(format!("Failed to encode PNG: {}", e)))?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(&bytes)))
}

fn truncate(s: &str) -> String {
    s.chars().take(48).collect()
}
