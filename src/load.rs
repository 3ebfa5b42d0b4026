//! Image decoding; every failure surfaces as invalid input.

use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::error::{Result, ThemeError};

pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ThemeError::invalid_input_from("unable to decode image", e))?;
    debug!(width = img.width(), height = img.height(), "decoded image");
    Ok(img)
}

pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        ThemeError::invalid_input_from(format!("unable to read {}", path.display()), e)
    })?;
    decode_image(&bytes)
}
