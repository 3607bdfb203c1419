use std::io::Cursor;

use crate::foundation::error::{GlowupError, GlowupResult};

/// Encode straight RGBA8 pixels as PNG.
pub fn encode_png(width: u32, height: u32, rgba8: Vec<u8>) -> GlowupResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(width, height, rgba8).ok_or_else(|| {
        GlowupError::encode(format!(
            "pixel buffer does not match {width}x{height} rgba8"
        ))
    })?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| GlowupError::encode(format!("png encode failed: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
