//! Brush texture loading.

use image::RgbaImage;

use crate::error::{RenderError, RenderResult};

/// Decode a brush texture from encoded image bytes.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] if the bytes cannot be decoded.
pub fn load_texture_from_bytes(data: &[u8]) -> RenderResult<RgbaImage> {
    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::Resource(format!("failed to decode brush texture: {e}")))?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_garbage_bytes() {
        let result = load_texture_from_bytes(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(RenderError::Resource(_))));
    }
}
