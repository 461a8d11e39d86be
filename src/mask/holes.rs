// holes.rs - Punch out small enclosed bright regions
//
// A bright region inside the foreground that the border fill never reached
// is either a deliberate opening (keychain eyelet) or part of the artwork.
// Size decides: tiny specks and large areas stay, mid-sized ones go.

use crate::grid::{BrightnessMap, Mask};

use super::fill::collect_region;
use super::{HOLE_MAX_RATIO, HOLE_MIN_CELLS};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoleReport {
    pub regions: usize,
    pub cells: usize,
}

/// Clear every bright foreground region with `HOLE_MIN_CELLS <= size` and
/// `size < HOLE_MAX_RATIO * foreground` where the foreground count is taken
/// before any region is removed. Uses raw, unblurred brightness.
pub fn remove_holes(mask: &mut Mask, brightness: &BrightnessMap, threshold: f32) -> HoleReport {
    let n = mask.size();
    let fg_count = mask.count();
    let mut report = HoleReport::default();
    if fg_count == 0 {
        return report;
    }

    let max_size = fg_count as f64 * HOLE_MAX_RATIO;
    let mut visited = vec![false; mask.len()];

    for start in 0..mask.len() {
        if visited[start] || !mask[start] || brightness[start] <= threshold {
            continue;
        }
        let region = {
            let mask = &*mask;
            collect_region(n, start, &mut visited, |i| mask[i] && brightness[i] > threshold)
        };

        if region.len() >= HOLE_MIN_CELLS && (region.len() as f64) < max_size {
            for &idx in &region {
                mask[idx] = false;
            }
            report.regions += 1;
            report.cells += region.len();
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    /// 20x20 all-foreground mask (400 cells, hole limit 0.08 * 400 = 32)
    /// with one bright region of `size` cells laid out row by row from (2, 2)
    fn bright_patch(size: usize) -> (Mask, BrightnessMap) {
        let n = 20;
        let mask = Grid::filled(n, true);
        let mut brightness = Grid::filled(n, 0.0f32);
        for k in 0..size {
            let (r, c) = (2 + k / 16, 2 + k % 16);
            brightness.set(r, c, 1.0);
        }
        (mask, brightness)
    }

    #[test]
    fn region_just_below_ratio_is_removed() {
        let (mut mask, brightness) = bright_patch(31);
        let report = remove_holes(&mut mask, &brightness, 0.9);
        assert_eq!(report, HoleReport { regions: 1, cells: 31 });
        assert_eq!(mask.count(), 400 - 31);
        assert!(!mask.get(2, 2));
    }

    #[test]
    fn region_just_above_ratio_is_kept() {
        let (mut mask, brightness) = bright_patch(33);
        let report = remove_holes(&mut mask, &brightness, 0.9);
        assert_eq!(report.regions, 0);
        assert_eq!(mask.count(), 400);
    }

    #[test]
    fn tiny_regions_are_kept() {
        let (mut mask, brightness) = bright_patch(4);
        remove_holes(&mut mask, &brightness, 0.9);
        assert_eq!(mask.count(), 400);

        let (mut mask, brightness) = bright_patch(5);
        remove_holes(&mut mask, &brightness, 0.9);
        assert_eq!(mask.count(), 395);
    }

    #[test]
    fn background_cells_are_not_holes() {
        let (mut mask, brightness) = bright_patch(10);
        // Same bright cells, but already background
        for k in 0..10 {
            mask.set(2, 2 + k, false);
        }
        let report = remove_holes(&mut mask, &brightness, 0.9);
        assert_eq!(report.regions, 0);
        assert_eq!(mask.count(), 390);
    }

    #[test]
    fn brightness_equal_to_threshold_is_not_bright() {
        let (mut mask, mut brightness) = bright_patch(10);
        for v in brightness.cells_mut() {
            if *v == 1.0 { *v = 0.9; }
        }
        remove_holes(&mut mask, &brightness, 0.9);
        assert_eq!(mask.count(), 400);
    }
}
