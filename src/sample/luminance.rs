// luminance.rs - Resample to the grid and measure brightness
//
// Brightness is Rec.601 luma of the resampled pixel, normalized to [0, 1].

use image::{DynamicImage, RgbaImage, imageops, imageops::FilterType};

use crate::grid::{BrightnessMap, Grid};

#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r: r as f32, g: g as f32, b: b as f32 }
    }

    /// 0.0 = black, 1.0 = white
    #[inline]
    pub fn luminance(self) -> f32 {
        (self.r * 0.299 + self.g * 0.587 + self.b * 0.114) / 255.0
    }
}

/// Resample `img` onto a `size` x `size` square, optionally mirrored left-right.
/// An image that already has the target shape is taken as-is.
pub fn resample(img: &DynamicImage, size: usize, mirrored: bool) -> RgbaImage {
    let n = size as u32;
    let mut out = if img.width() == n && img.height() == n {
        img.to_rgba8()
    } else {
        img.resize_exact(n, n, FilterType::Triangle).to_rgba8()
    };
    if mirrored {
        imageops::flip_horizontal_in_place(&mut out);
    }
    out
}

/// Brightness map of `img` sampled on a `size` x `size` grid.
/// Cells with no backing pixel read as white.
pub fn extract_brightness(img: &DynamicImage, size: usize, mirrored: bool) -> BrightnessMap {
    let pixels = resample(img, size, mirrored);
    let map = Grid::from_fn(size, |r, c| {
        pixels
            .get_pixel_checked(c as u32, r as u32)
            .map_or(1.0, |p| Color::from_rgb(p[0], p[1], p[2]).luminance())
    });
    tracing::debug!(size, mirrored, "sampled brightness map");
    map
}
