// cutout.rs - Cutout mode: one extruded box per foreground cell
//
// Each foreground cell emits a top and a bottom quad plus a wall on every
// side whose neighbour is background or off-grid. Vertices are never
// shared between cells.

use crate::grid::{HeightMap, Mask};

use super::Mesh;

const UP: [f32; 3] = [0.0, 0.0, 1.0];
const DOWN: [f32; 3] = [0.0, 0.0, -1.0];
const WALL_UV: [[f32; 2]; 4] = [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];

/// (row step, col step, outward normal)
const SIDES: [(isize, isize, [f32; 3]); 4] = [
    (-1, 0, [0.0, 1.0, 0.0]),
    (1, 0, [0.0, -1.0, 0.0]),
    (0, -1, [-1.0, 0.0, 0.0]),
    (0, 1, [1.0, 0.0, 0.0]),
];

#[inline]
fn exposed(mask: &Mask, r: usize, c: usize, dr: isize, dc: isize) -> bool {
    !mask.get_signed(r as isize + dr, c as isize + dc).unwrap_or(false)
}

/// Number of quads `build_cutout` will emit for `mask`
pub fn quad_count(mask: &Mask) -> usize {
    let n = mask.size();
    let mut quads = 0;
    for r in 0..n {
        for c in 0..n {
            if !mask.get(r, c) { continue; }
            quads += 2 + SIDES.iter().filter(|&&(dr, dc, _)| exposed(mask, r, c, dr, dc)).count();
        }
    }
    quads
}

/// Extrude every foreground cell to its height on a `size` x `size` footprint
pub fn build_cutout(heights: &HeightMap, mask: &Mask, size: f32) -> Mesh {
    let n = mask.size();
    debug_assert_eq!(heights.size(), n);

    let cell = size / n as f32;
    let half = size / 2.0;
    let quads = quad_count(mask);
    let mut mesh = Mesh::with_capacity(quads * 4, quads * 6);

    for r in 0..n {
        for c in 0..n {
            if !mask.get(r, c) { continue; }

            let h = heights.get(r, c);
            let x0 = -half + c as f32 * cell;
            let x1 = x0 + cell;
            let y0 = half - r as f32 * cell;
            let y1 = y0 - cell;

            // v flipped: image row 0 is the top of the texture
            let (u0, u1) = (c as f32 / n as f32, (c + 1) as f32 / n as f32);
            let (v0, v1) = (1.0 - r as f32 / n as f32, 1.0 - (r + 1) as f32 / n as f32);

            mesh.push_quad(
                [[x0, y1, h], [x1, y1, h], [x1, y0, h], [x0, y0, h]],
                UP,
                [[u0, v1], [u1, v1], [u1, v0], [u0, v0]],
            );
            mesh.push_quad(
                [[x0, y0, 0.0], [x1, y0, 0.0], [x1, y1, 0.0], [x0, y1, 0.0]],
                DOWN,
                [[u0, v0], [u1, v0], [u1, v1], [u0, v1]],
            );

            for &(dr, dc, normal) in &SIDES {
                if !exposed(mask, r, c, dr, dc) { continue; }
                // Edge endpoints ordered with the outside on the right
                let (a, b) = match (dr, dc) {
                    (-1, _) => ([x1, y0], [x0, y0]),
                    (1, _) => ([x0, y1], [x1, y1]),
                    (_, -1) => ([x0, y0], [x0, y1]),
                    _ => ([x1, y1], [x1, y0]),
                };
                mesh.push_quad(
                    [[a[0], a[1], h], [a[0], a[1], 0.0], [b[0], b[1], 0.0], [b[0], b[1], h]],
                    normal,
                    WALL_UV,
                );
            }
        }
    }

    tracing::debug!(
        grid = n,
        cells = mask.count(),
        quads,
        vertices = mesh.vertex_count(),
        "built cutout mesh"
    );
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::grid::Grid;
    use crate::mesh::face_normal;
    use crate::mesh::topology::{analyze_edges, signed_volume};

    fn mask_from(rows: &[&str]) -> Mask {
        let n = rows.len();
        Grid::from_fn(n, |r, c| rows[r].as_bytes()[c] == b'#')
    }

    fn wall_quads(mesh: &Mesh) -> usize {
        mesh.normals.chunks_exact(4).filter(|q| q[0][2] == 0.0).count()
    }

    #[test]
    fn isolated_cell_is_a_closed_box() {
        let mask = mask_from(&["...", ".#.", "..."]);
        let heights = Grid::filled(3, 4.0f32);
        let mesh = build_cutout(&heights, &mask, 60.0);

        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(wall_quads(&mesh), 4);

        let report = analyze_edges(&mesh);
        assert!(report.is_watertight());
        assert!(report.is_consistently_wound());
        assert_abs_diff_eq!(signed_volume(&mesh), 20.0 * 20.0 * 4.0, epsilon = 1e-3);
    }

    #[test]
    fn winding_agrees_with_normals() {
        let mask = mask_from(&["#..#", ".##.", ".#..", "...#"]);
        let heights = Grid::from_fn(4, |r, c| 1.0 + (r + c) as f32);
        let mesh = build_cutout(&heights, &mask, 60.0);
        for tri in mesh.indices.chunks_exact(3) {
            let p = [tri[0], tri[1], tri[2]].map(|i| mesh.positions[i as usize]);
            let f = face_normal(p[0], p[1], p[2]);
            let n = mesh.normals[tri[0] as usize];
            assert!(f[0] * n[0] + f[1] * n[1] + f[2] * n[2] > 0.0);
        }
    }

    #[test]
    fn center_block_has_no_interior_walls() {
        // 4x4, only the centre 2x2 is foreground, all at height 3
        let mask = mask_from(&["....", ".##.", ".##.", "...."]);
        let heights = Grid::from_fn(4, |r, c| if mask.get(r, c) { 3.0 } else { 0.0 });
        let mesh = build_cutout(&heights, &mask, 60.0);

        let tops = mesh.normals.chunks_exact(4).filter(|q| q[0] == UP).count();
        let bottoms = mesh.normals.chunks_exact(4).filter(|q| q[0] == DOWN).count();
        assert_eq!(tops, 4);
        assert_eq!(bottoms, 4);
        // Two perimeter-facing walls per cell, none between the four cells
        assert_eq!(wall_quads(&mesh), 8);
        assert_eq!(quad_count(&mask), 16);
        assert_eq!(mesh.vertex_count(), 64);

        for q in mesh.positions.chunks_exact(4).zip(mesh.normals.chunks_exact(4)) {
            let (p, n) = q;
            if n[0] == UP {
                assert!(p.iter().all(|v| v[2] == 3.0));
            }
            // Interior walls would sit on x = 0 or y = 0
            if n[0][2] == 0.0 {
                assert!(p.iter().all(|v| v[0].abs() == 15.0) || p.iter().all(|v| v[1].abs() == 15.0));
            }
        }

        let report = analyze_edges(&mesh);
        assert!(report.is_watertight());
        assert!(report.is_consistently_wound());
    }

    #[test]
    fn grid_edge_cells_get_walls() {
        let mask = Grid::filled(2, true);
        let heights = Grid::filled(2, 1.0f32);
        let mesh = build_cutout(&heights, &mask, 60.0);
        assert_eq!(wall_quads(&mesh), 8);
    }

    #[test]
    fn uvs_follow_pixel_grid() {
        let mask = mask_from(&["....", "..#.", "....", "...."]);
        let heights = Grid::filled(4, 1.0f32);
        let mesh = build_cutout(&heights, &mask, 60.0);
        // Top quad comes first: (x0,y1) (x1,y1) (x1,y0) (x0,y0)
        assert_eq!(&mesh.uvs[..4], &[[0.5, 0.5], [0.75, 0.5], [0.75, 0.75], [0.5, 0.75]]);
    }

    #[test]
    fn largest_grid_stays_within_u32_indices() {
        // Checkerboard at the maximum grid: every cell is an isolated box
        let n = crate::params::MAX_RESOLUTION as usize;
        let mask = Grid::from_fn(n, |r, c| (r + c) % 2 == 0);
        let quads = quad_count(&mask);
        assert_eq!(quads, n * n / 2 * 6);
        assert!(quads * 4 < u32::MAX as usize);
        assert!(quad_count(&Grid::filled(n, true)) < quads);
    }

    #[test]
    fn empty_mask_builds_nothing() {
        let mask = Grid::filled(5, false);
        let mesh = build_cutout(&Grid::filled(5, 0.0f32), &mask, 60.0);
        assert!(mesh.is_empty());
        assert_eq!(quad_count(&mask), 0);
    }
}
