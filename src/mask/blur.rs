// blur.rs - Box blur over the brightness grid
//
// The window is clamped to the grid: edge cells average fewer samples.

use crate::grid::{BrightnessMap, Grid};

/// Mean over the (2*radius+1)^2 window around each cell, in-bounds samples only
pub fn box_blur(map: &BrightnessMap, radius: usize) -> BrightnessMap {
    let n = map.size();
    Grid::from_fn(n, |r, c| {
        let (r0, r1) = (r.saturating_sub(radius), (r + radius).min(n - 1));
        let (c0, c1) = (c.saturating_sub(radius), (c + radius).min(n - 1));

        let mut sum = 0.0f32;
        for y in r0..=r1 {
            for x in c0..=c1 {
                sum += map.get(y, x);
            }
        }
        let count = (r1 - r0 + 1) * (c1 - c0 + 1);
        sum / count as f32
    })
}
