// mask/ - Foreground segmentation for cutout mode
//
// Pipeline: blur -> border flood fill -> complement -> dilate -> hole removal
// -> empty fallback. The constants are tuned behaviour, keep them exact.

mod blur;
mod fill;
mod holes;

pub use blur::box_blur;
pub use fill::{collect_region, dilate, dilate_once, flood_background};
pub use holes::{HoleReport, remove_holes};

use crate::grid::{BrightnessMap, Grid, Mask};

pub const BLUR_RADIUS: usize = 3;
pub const DILATE_PASSES: usize = 2;
/// Holes must be smaller than this share of the foreground
pub const HOLE_MAX_RATIO: f64 = 0.08;
/// Regions of 4 cells or fewer are noise, not holes
pub const HOLE_MIN_CELLS: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct Segmentation {
    pub mask: Mask,
    /// Foreground before dilation
    pub raw: Mask,
    pub holes: HoleReport,
    /// Everything was classified background; the mask was reset to all-foreground
    pub fallback: bool,
}

impl Segmentation {
    pub fn foreground_count(&self) -> usize {
        self.mask.count()
    }
}

/// Plate mode: every cell is foreground
pub fn full_mask(size: usize) -> Mask {
    Grid::filled(size, true)
}

/// Classify each cell as foreground (printable) or background
pub fn segment(brightness: &BrightnessMap, threshold: f32) -> Segmentation {
    let n = brightness.size();

    let blurred = box_blur(brightness, BLUR_RADIUS);
    let background = flood_background(&blurred, threshold);
    let raw = background.map(|bg| !bg);
    let mut mask = dilate(&raw, DILATE_PASSES);

    tracing::debug!(
        size = n,
        background = background.count(),
        raw = raw.count(),
        dilated = mask.count(),
        "segmented foreground"
    );

    let holes = remove_holes(&mut mask, brightness, threshold);
    if holes.regions > 0 {
        tracing::debug!(regions = holes.regions, cells = holes.cells, "removed enclosed holes");
    }

    let fallback = mask.count() == 0;
    if fallback {
        tracing::info!(size = n, threshold, "no foreground left after segmentation, using full plate");
        mask = full_mask(n);
    }

    Segmentation { mask, raw, holes, fallback }
}
