// fill.rs - Flood fill and dilation
//
// Breadth-first over flat indices with an explicit queue; stack use stays
// flat no matter how large a region grows.

use std::collections::VecDeque;

use crate::grid::{BrightnessMap, Grid, Mask, neighbors4};

/// Cells reachable from the grid border through cells with `blurred > threshold`
pub fn flood_background(blurred: &BrightnessMap, threshold: f32) -> Mask {
    let n = blurred.size();
    let mut background = Grid::filled(n, false);
    let mut queue = VecDeque::new();

    for r in 0..n {
        for c in 0..n {
            let on_border = r == 0 || c == 0 || r == n - 1 || c == n - 1;
            let idx = r * n + c;
            if on_border && blurred[idx] > threshold {
                background[idx] = true;
                queue.push_back(idx);
            }
        }
    }

    while let Some(idx) = queue.pop_front() {
        for ni in neighbors4(n, idx) {
            if !background[ni] && blurred[ni] > threshold {
                background[ni] = true;
                queue.push_back(ni);
            }
        }
    }

    background
}

/// Connected region around `start` under `member`, marking cells in `visited`.
/// `start` itself is assumed to be a member.
pub fn collect_region(
    size: usize,
    start: usize,
    visited: &mut [bool],
    member: impl Fn(usize) -> bool,
) -> Vec<usize> {
    let mut region = Vec::new();
    let mut queue = VecDeque::from([start]);
    visited[start] = true;

    while let Some(idx) = queue.pop_front() {
        region.push(idx);
        for ni in neighbors4(size, idx) {
            if !visited[ni] && member(ni) {
                visited[ni] = true;
                queue.push_back(ni);
            }
        }
    }

    region
}

/// One pass: a cell is set if it or any 4-neighbour is set
pub fn dilate_once(mask: &Mask) -> Mask {
    let n = mask.size();
    let mut out = mask.clone();
    for idx in 0..mask.len() {
        if !mask[idx] && neighbors4(n, idx).any(|ni| mask[ni]) {
            out[idx] = true;
        }
    }
    out
}

pub fn dilate(mask: &Mask, passes: usize) -> Mask {
    let mut current = mask.clone();
    for _ in 0..passes {
        current = dilate_once(&current);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(rows: &[&str]) -> Mask {
        let n = rows.len();
        Grid::from_fn(n, |r, c| rows[r].as_bytes()[c] == b'#')
    }

    #[test]
    fn background_does_not_enter_closed_ring() {
        // Dark ring; inside is bright but unreachable from the border
        let map = Grid::from_fn(7, |r, c| {
            let ring = (1..=5).contains(&r) && (1..=5).contains(&c)
                && (r == 1 || r == 5 || c == 1 || c == 5);
            if ring { 0.0 } else { 1.0 }
        });
        let bg = flood_background(&map, 0.9);
        assert!(bg.get(0, 0));
        assert!(bg.get(6, 3));
        assert!(!bg.get(1, 1));
        assert!(!bg.get(3, 3), "enclosed bright cell must not be background");
    }

    #[test]
    fn threshold_is_strict() {
        let map = Grid::filled(3, 0.9f32);
        assert_eq!(flood_background(&map, 0.9).count(), 0);
        assert_eq!(flood_background(&map, 0.89).count(), 9);
    }

    #[test]
    fn dark_border_blocks_fill() {
        let map = Grid::from_fn(5, |r, c| if r == 0 || c == 0 || r == 4 || c == 4 { 0.0 } else { 1.0 });
        assert_eq!(flood_background(&map, 0.5).count(), 0);
    }

    #[test]
    fn dilation_grows_plus_shape() {
        let mask = mask_from(&[
            ".....",
            ".....",
            "..#..",
            ".....",
            ".....",
        ]);
        let once = dilate_once(&mask);
        assert_eq!(once, mask_from(&[
            ".....",
            "..#..",
            ".###.",
            "..#..",
            ".....",
        ]));
        assert_eq!(dilate(&mask, 2).count(), 13);
    }

    #[test]
    fn dilation_is_monotone() {
        let mask = Grid::from_fn(16, |r, c| (r * 31 + c * 17) % 7 == 0);
        let grown = dilate(&mask, 2);
        assert!(mask.is_subset_of(&grown));
        assert!(grown.count() > mask.count());
    }

    #[test]
    fn region_respects_predicate() {
        let mask = mask_from(&[
            "##..",
            "#...",
            "...#",
            "..##",
        ]);
        let mut visited = vec![false; 16];
        let region = collect_region(4, 0, &mut visited, |i| mask[i]);
        let mut sorted = region.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 4]);
        assert!(!visited[15]);
    }
}
