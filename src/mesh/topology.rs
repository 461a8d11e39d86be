// topology.rs - Edge and volume analysis
//
// Vertices are welded by exact position first, so sub-meshes that only
// share coordinates (not indices) still count as connected.

use std::collections::HashMap;

use super::Mesh;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeReport {
    /// Distinct undirected edges after welding
    pub edges: usize,
    /// Edges used by exactly one triangle
    pub boundary: usize,
    /// Edges used by more than two triangles
    pub non_manifold: usize,
    /// Two-triangle edges traversed in the same direction by both
    pub inconsistent: usize,
    /// Triangles that collapse to an edge or point after welding
    pub degenerate_triangles: usize,
}

impl EdgeReport {
    /// Closed surface: every edge shared by exactly two triangles
    pub fn is_watertight(&self) -> bool {
        self.boundary == 0 && self.non_manifold == 0
    }

    pub fn is_consistently_wound(&self) -> bool {
        self.inconsistent == 0
    }
}

/// Map each vertex to the id of the first vertex at the same position
pub fn weld_by_position(mesh: &Mesh) -> Vec<u32> {
    let mut seen: HashMap<[u32; 3], u32> = HashMap::with_capacity(mesh.vertex_count());
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            // -0.0 and 0.0 are the same point
            let key = p.map(|v| if v == 0.0 { 0 } else { v.to_bits() });
            *seen.entry(key).or_insert(i as u32)
        })
        .collect()
}

pub fn analyze_edges(mesh: &Mesh) -> EdgeReport {
    let welded = weld_by_position(mesh);
    // (lo, hi) -> (forward uses lo->hi, backward uses hi->lo)
    let mut edges: HashMap<(u32, u32), (u32, u32)> = HashMap::new();
    let mut report = EdgeReport::default();

    for tri in mesh.indices.chunks_exact(3) {
        let v = [welded[tri[0] as usize], welded[tri[1] as usize], welded[tri[2] as usize]];
        if v[0] == v[1] || v[1] == v[2] || v[0] == v[2] {
            report.degenerate_triangles += 1;
            continue;
        }
        for k in 0..3 {
            let (a, b) = (v[k], v[(k + 1) % 3]);
            let entry = edges.entry((a.min(b), a.max(b))).or_default();
            if a < b { entry.0 += 1 } else { entry.1 += 1 }
        }
    }

    report.edges = edges.len();
    for &(fwd, bwd) in edges.values() {
        match fwd + bwd {
            1 => report.boundary += 1,
            2 if fwd != 1 => report.inconsistent += 1,
            2 => {}
            _ => report.non_manifold += 1,
        }
    }
    report
}

/// Signed enclosed volume; positive when faces wind outward
pub fn signed_volume(mesh: &Mesh) -> f64 {
    mesh.indices
        .chunks_exact(3)
        .map(|tri| {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.positions[i as usize].map(f64::from));
            // a . (b x c) / 6
            a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
                + a[2] * (b[0] * c[1] - b[1] * c[0])
        })
        .sum::<f64>()
        / 6.0
}
