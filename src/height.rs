// height.rs - Brightness + mask -> per-cell height
//
// Background cells sit at 0. Foreground cells get base + brightness * depth,
// with brightness flipped when inverted. No clamping here.

use crate::grid::{BrightnessMap, Grid, HeightMap, Mask};
use crate::params::ReliefParams;

#[inline]
pub fn cell_height(brightness: f32, foreground: bool, params: &ReliefParams) -> f32 {
    if !foreground {
        return 0.0;
    }
    let b = if params.inverted { 1.0 - brightness } else { brightness };
    params.base_height + b * params.depth
}

pub fn build_height_map(brightness: &BrightnessMap, mask: &Mask, params: &ReliefParams) -> HeightMap {
    debug_assert_eq!(brightness.size(), mask.size());
    let cells = brightness
        .cells()
        .iter()
        .zip(mask.cells())
        .map(|(&b, &fg)| cell_height(b, fg, params))
        .collect();
    Grid::from_cells(brightness.size(), cells)
}
