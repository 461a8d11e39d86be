// preview.rs - Grayscale PNG previews of the per-cell maps
//
// One pixel per grid cell. Mask: foreground white. Heights: scaled so the
// tallest cell is white; background cells stay black.

use image::{GrayImage, Luma};

use relief_engine::{HeightMap, Mask};

pub fn mask_image(mask: &Mask) -> GrayImage {
    let n = mask.size() as u32;
    GrayImage::from_fn(n, n, |x, y| {
        Luma([if mask.get(y as usize, x as usize) { 255 } else { 0 }])
    })
}

pub fn height_image(heights: &HeightMap) -> GrayImage {
    let n = heights.size() as u32;
    let max = heights.cells().iter().copied().fold(0.0f32, f32::max);
    let scale = if max > 0.0 { 255.0 / max } else { 0.0 };
    GrayImage::from_fn(n, n, |x, y| {
        Luma([(heights.get(y as usize, x as usize) * scale).clamp(0.0, 255.0) as u8])
    })
}
