// sample/ - Image in, brightness grid out
//
// Decoding is explicit and happens before any stage runs; after sampling
// nothing downstream holds on to the source pixels.

mod luminance;

pub use luminance::{Color, extract_brightness, resample};

use image::DynamicImage;

use crate::error::{ReliefError, ReliefResult};

/// Decode an encoded image (PNG, JPEG, ...) from memory
pub fn decode_image(bytes: &[u8]) -> ReliefResult<DynamicImage> {
    let img = image::load_from_memory(bytes)?;
    ensure_non_empty(&img)?;
    Ok(img)
}

/// Reject rasters with a zero dimension
pub fn ensure_non_empty(img: &DynamicImage) -> ReliefResult<()> {
    if img.width() == 0 || img.height() == 0 {
        return Err(ReliefError::EmptyImage { width: img.width(), height: img.height() });
    }
    Ok(())
}
