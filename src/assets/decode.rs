use image::RgbaImage;

use crate::foundation::error::{NewsreelError, NewsreelResult};

/// Downloads smaller than this are tracking pixels, error pages or truncated
/// bodies, not usable article photography.
pub const MIN_IMAGE_BYTES: usize = 1000;

/// Decode downloaded image bytes into straight-alpha RGBA8.
///
/// Any failure here means "skip this news item", not "abort the run".
pub fn decode_image(bytes: &[u8]) -> NewsreelResult<RgbaImage> {
    if bytes.len() < MIN_IMAGE_BYTES {
        return Err(NewsreelError::image_unusable(format!(
            "image body too small ({} bytes)",
            bytes.len()
        )));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| NewsreelError::image_unusable(format!("decode: {e}")))?;
    Ok(dyn_img.to_rgba8())
}
