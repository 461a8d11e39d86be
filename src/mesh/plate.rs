// plate.rs - Plate mode: one deformed top surface closed into a solid
//
// Top: R x R vertex grid over the S x S footprint, z = height.
// Walls: one quad per boundary segment from the top down to z = 0.
// Bottom: fan over the same boundary positions at z = 0, facing down.
// Walls and bottom copy the top's boundary coordinates, so the merged
// mesh closes exactly when welded by position.

use crate::grid::HeightMap;

use super::Mesh;

const DOWN: [f32; 3] = [0.0, 0.0, -1.0];
const WALL_UV: [[f32; 2]; 4] = [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];

/// Build the closed plate for `heights` on a `size` x `size` footprint.
/// Needs at least a 2 x 2 grid.
pub fn build_plate(heights: &HeightMap, size: f32) -> Mesh {
    let n = heights.size();
    debug_assert!(n >= 2, "plate needs at least 2x2 samples");

    let top = top_surface(heights, size);
    let [north, south, west, east] = perimeter(n);
    let bottom = bottom_cap(&top, &[&south, &east, &north, &west], size);
    let walls = [north, south, west, east].map(|edge| side_wall(&top, &edge));

    let mesh = Mesh::merge([&top, &bottom, &walls[0], &walls[1], &walls[2], &walls[3]]);
    tracing::debug!(
        grid = n,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "built plate mesh"
    );
    mesh
}

/// Grid surface: vertex (r, c) at x = -S/2 + c*step, y = S/2 - r*step
fn top_surface(heights: &HeightMap, size: f32) -> Mesh {
    let n = heights.size();
    let segs = n - 1;
    let step = size / segs as f32;
    let half = size / 2.0;

    let mut mesh = Mesh::with_capacity(n * n, segs * segs * 6);
    for r in 0..n {
        let y = half - r as f32 * step;
        let v = 1.0 - r as f32 / n as f32;
        for c in 0..n {
            let x = -half + c as f32 * step;
            let u = c as f32 / n as f32;
            mesh.push_vertex([x, y, heights.get(r, c)], [0.0, 0.0, 1.0], [u, v]);
        }
    }

    let n32 = n as u32;
    for r in 0..segs as u32 {
        for c in 0..segs as u32 {
            let a = r * n32 + c;
            let b = a + n32;
            let d = a + 1;
            let e = b + 1;
            mesh.push_triangle(a, b, d);
            mesh.push_triangle(b, e, d);
        }
    }

    mesh.compute_smooth_normals();
    mesh
}

/// Boundary grid indices per edge as [north, south, west, east], each
/// ordered so the outside lies to the right (counter-clockwise seen from +Z)
fn perimeter(n: usize) -> [Vec<usize>; 4] {
    let segs = n - 1;
    let north = (0..=segs).rev().collect();
    let south = (0..=segs).map(|c| segs * n + c).collect();
    let west = (0..=segs).map(|r| r * n).collect();
    let east = (0..=segs).rev().map(|r| r * n + segs).collect();
    [north, south, west, east]
}

/// Outward horizontal direction of an edge walked with the outside on the
/// right: tangent x +Z
fn outward(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    let (tx, ty) = (b[0] - a[0], b[1] - a[1]);
    let len = (tx * tx + ty * ty).sqrt();
    [ty / len, -tx / len, 0.0]
}

/// Vertical ribbon under one edge of the top surface, one quad per segment.
/// The normal comes from the edge, so zero-height stretches still face out.
fn side_wall(top: &Mesh, edge: &[usize]) -> Mesh {
    let segs = edge.len() - 1;
    let normal = outward(top.positions[edge[0]], top.positions[edge[segs]]);
    let mut mesh = Mesh::with_capacity(segs * 4, segs * 6);

    for pair in edge.windows(2) {
        let a = top.positions[pair[0]];
        let b = top.positions[pair[1]];
        mesh.push_quad(
            [a, [a[0], a[1], 0.0], [b[0], b[1], 0.0], b],
            normal,
            WALL_UV,
        );
    }
    mesh
}

/// Flat cap at z = 0: fan from the footprint centre over the boundary ring,
/// built facing up and then flipped
fn bottom_cap(top: &Mesh, edges: &[&Vec<usize>; 4], size: f32) -> Mesh {
    let half = size / 2.0;
    // Edges share corners: drop each edge's last index
    let ring: Vec<usize> = edges.iter().flat_map(|e| e[..e.len() - 1].iter().copied()).collect();

    let mut mesh = Mesh::with_capacity(ring.len() + 1, ring.len() * 3);
    let planar_uv = |x: f32, y: f32| [(x + half) / size, (y + half) / size];

    let center = mesh.push_vertex([0.0, 0.0, 0.0], DOWN, planar_uv(0.0, 0.0));
    for &idx in &ring {
        let p = top.positions[idx];
        mesh.push_vertex([p[0], p[1], 0.0], DOWN, planar_uv(p[0], p[1]));
    }

    let count = ring.len() as u32;
    for k in 0..count {
        let a = 1 + k;
        let b = 1 + (k + 1) % count;
        mesh.push_triangle(center, a, b);
    }
    mesh.flip_winding();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::grid::Grid;
    use crate::mesh::face_normal;
    use crate::mesh::topology::{analyze_edges, signed_volume};

    fn bumpy(n: usize) -> HeightMap {
        Grid::from_fn(n, |r, c| 3.0 + ((r * 5 + c * 3) % 7) as f32 * 0.5)
    }

    #[test]
    fn vertex_and_index_counts() {
        let n = 5;
        let segs = n - 1;
        let mesh = build_plate(&bumpy(n), 60.0);
        let expected_vertices = n * n + (4 * segs + 1) + 4 * 4 * segs;
        let expected_indices = segs * segs * 6 + 4 * segs * 3 + 4 * segs * 6;
        assert_eq!(mesh.vertex_count(), expected_vertices);
        assert_eq!(mesh.indices.len(), expected_indices);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn plate_is_watertight_and_outward() {
        for n in [2, 3, 8, 17] {
            let mesh = build_plate(&bumpy(n), 60.0);
            let report = analyze_edges(&mesh);
            assert!(report.is_watertight(), "n = {n}: {report:?}");
            assert!(report.is_consistently_wound(), "n = {n}: {report:?}");
            assert_eq!(report.degenerate_triangles, 0);
            assert!(signed_volume(&mesh) > 0.0);
        }
    }

    #[test]
    fn flat_plate_volume_is_footprint_times_height() {
        let mesh = build_plate(&Grid::filled(6, 2.0f32), 60.0);
        let volume = signed_volume(&mesh);
        assert_abs_diff_eq!(volume, 60.0 * 60.0 * 2.0, epsilon = 1e-2);
    }

    #[test]
    fn top_follows_heights_and_footprint() {
        let heights = bumpy(4);
        let mesh = build_plate(&heights, 60.0);
        for i in 0..16 {
            assert_eq!(mesh.positions[i][2], heights[i]);
        }
        assert_eq!(mesh.positions[0][0], -30.0);
        assert_eq!(mesh.positions[0][1], 30.0);
        let (lo, hi) = mesh.bounds().unwrap();
        assert_abs_diff_eq!(lo[0], -30.0, epsilon = 1e-4);
        assert_abs_diff_eq!(hi[0], 30.0, epsilon = 1e-4);
        assert_abs_diff_eq!(lo[1], -30.0, epsilon = 1e-4);
        assert_abs_diff_eq!(hi[1], 30.0, epsilon = 1e-4);
        assert_eq!(lo[2], 0.0);
    }

    #[test]
    fn top_uv_follows_pixel_grid() {
        let mesh = build_plate(&bumpy(4), 60.0);
        assert_eq!(mesh.uvs[0], [0.0, 1.0]);
        assert_eq!(mesh.uvs[1 * 4 + 2], [0.5, 0.75]);
    }

    #[test]
    fn flat_top_normals_point_up() {
        let mesh = build_plate(&Grid::filled(4, 1.0f32), 60.0);
        for n in &mesh.normals[..16] {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn bottom_faces_down() {
        let n = 4;
        let mesh = build_plate(&bumpy(n), 60.0);
        let top_tris = (n - 1) * (n - 1) * 2;
        let bottom_tris = 4 * (n - 1);
        for tri in mesh.indices.chunks_exact(3).skip(top_tris).take(bottom_tris) {
            let p = [tri[0], tri[1], tri[2]].map(|i| mesh.positions[i as usize]);
            assert!(face_normal(p[0], p[1], p[2])[2] < 0.0);
            for i in tri {
                assert_eq!(mesh.normals[*i as usize], DOWN);
            }
        }
    }

    #[test]
    fn wall_normals_face_outward() {
        let mesh = build_plate(&Grid::filled(5, 2.0f32), 60.0);
        let wall_start = 25 + (4 * 4 + 1);
        for (p, n) in mesh.positions[wall_start..].iter().zip(&mesh.normals[wall_start..]) {
            // Outward: the normal agrees with the direction from the centre
            assert!(p[0] * n[0] + p[1] * n[1] > 0.0, "{p:?} {n:?}");
            assert!(n[2].abs() < 1e-6);
        }
    }

    #[test]
    fn zero_height_walls_still_face_outward() {
        let mesh = build_plate(&Grid::filled(4, 0.0f32), 60.0);
        let wall_start = 16 + (4 * 3 + 1);
        let walls = &mesh.normals[wall_start..];
        assert_eq!(walls.len(), 4 * 3 * 4);
        // north, south, west, east, three quads each
        let expected = [[0.0, 1.0, 0.0], [0.0, -1.0, 0.0], [-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        for (side, dir) in expected.iter().enumerate() {
            for n in &walls[side * 12..(side + 1) * 12] {
                assert_eq!(n, dir);
            }
        }
    }

    #[test]
    fn wall_quads_use_the_unit_square() {
        let mesh = build_plate(&bumpy(3), 60.0);
        let wall_start = 9 + (4 * 2 + 1);
        for quad in mesh.uvs[wall_start..].chunks_exact(4) {
            assert_eq!(quad, &WALL_UV);
        }
    }
}
