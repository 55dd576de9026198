//! Asset upload handler.
//!
//! Uploaded logo/signature images are normalized to a PNG data URI, which is
//! the form the element model and binding context carry. Oversized uploads
//! are downscaled so saved templates stay reasonably small.

use axum::{Json, extract::Multipart, http::StatusCode};
use image::imageops::FilterType;
use serde::Serialize;

use crate::resolve::assets;

/// Longest edge kept after upload; larger images are downscaled.
const MAX_DIMENSION: u32 = 1123;

/// Response from the upload endpoint.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub data_uri: String,
    pub width: u32,
    pub height: u32,
}

/// POST /api/assets/upload - Upload an image file.
pub async fn upload(
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let mut image_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        if field.name().unwrap_or("") == "file" {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read upload: {}", e)))?;
            image_data = Some(bytes.to_vec());
            break;
        }
    }

    let image_bytes =
        image_data.ok_or((StatusCode::BAD_REQUEST, "No file field found".to_string()))?;

    let img = image::load_from_memory(&image_bytes)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to decode image: {}", e)))?;

    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Triangle)
    } else {
        img
    };

    let data_uri = assets::encode_png_data_uri(&img)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(UploadResponse {
        width: img.width(),
        height: img.height(),
        data_uri,
    }))
}
