// mesh/ - Indexed triangle meshes and the two synthesis modes
//
// Mesh is a plain set of parallel attribute arrays plus a u32 index list.
// All faces are wound counter-clockwise seen from outside.

mod cutout;
mod plate;
pub mod topology;

pub use cutout::build_cutout;
pub use plate::build_plate;

use crate::error::{ReliefError, ReliefResult};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize { self.positions.len() }

    #[inline]
    pub fn triangle_count(&self) -> usize { self.indices.len() / 3 }

    #[inline]
    pub fn is_empty(&self) -> bool { self.indices.is_empty() }

    /// Append one vertex, returning its index
    #[inline]
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let idx = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        idx
    }

    #[inline]
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Four fresh vertices, two triangles (0,1,2) (0,2,3).
    /// Corners go counter-clockwise seen from the side `normal` points to.
    pub fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3], uvs: [[f32; 2]; 4]) {
        let base = self.push_vertex(corners[0], normal, uvs[0]);
        for k in 1..4 {
            self.push_vertex(corners[k], normal, uvs[k]);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Append `other`, shifting its indices past our vertices
    pub fn append(&mut self, other: &Mesh) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Concatenate sub-meshes into one buffer, in order
    pub fn merge<'a>(parts: impl IntoIterator<Item = &'a Mesh>) -> Mesh {
        let parts: Vec<&Mesh> = parts.into_iter().collect();
        let vertices = parts.iter().map(|m| m.vertex_count()).sum();
        let indices = parts.iter().map(|m| m.indices.len()).sum();
        let mut out = Mesh::with_capacity(vertices, indices);
        for part in parts {
            out.append(part);
        }
        out
    }

    /// Reverse every triangle by swapping its first and last index
    pub fn flip_winding(&mut self) {
        for tri in self.indices.chunks_exact_mut(3) {
            tri.swap(0, 2);
        }
    }

    /// Smooth normals: sum of adjacent face normals weighted by area
    pub fn compute_smooth_normals(&mut self) {
        let mut acc = vec![[0.0f32; 3]; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let n = face_normal(self.positions[a], self.positions[b], self.positions[c]);
            for v in [a, b, c] {
                acc[v][0] += n[0];
                acc[v][1] += n[1];
                acc[v][2] += n[2];
            }
        }
        self.normals = acc.into_iter().map(|n| normalize(n).unwrap_or([0.0, 0.0, 1.0])).collect();
    }

    /// Axis-aligned bounds, None for a mesh without vertices
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(mut lo, mut hi), p| {
            for k in 0..3 {
                lo[k] = lo[k].min(p[k]);
                hi[k] = hi[k].max(p[k]);
            }
            (lo, hi)
        }))
    }

    /// Check the buffer invariants: parallel attribute arrays, whole
    /// triangles, indices in range, finite attributes
    pub fn validate(&self) -> ReliefResult<()> {
        let n = self.positions.len();
        if self.normals.len() != n || self.uvs.len() != n {
            return Err(ReliefError::geometry(format!(
                "attribute length mismatch: {} positions, {} normals, {} uvs",
                n,
                self.normals.len(),
                self.uvs.len()
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(ReliefError::geometry(format!("{} indices is not whole triangles", self.indices.len())));
        }
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= n) {
            return Err(ReliefError::geometry(format!("index {bad} out of range for {n} vertices")));
        }
        if let Some(p) = self.positions.iter().find(|p| p.iter().any(|v| !v.is_finite())) {
            return Err(ReliefError::geometry(format!("non-finite position {p:?}")));
        }
        if self.normals.iter().any(|v| v.iter().any(|x| !x.is_finite()))
            || self.uvs.iter().any(|v| v.iter().any(|x| !x.is_finite()))
        {
            return Err(ReliefError::geometry("non-finite normal or uv"));
        }
        Ok(())
    }

    pub fn positions_flat(&self) -> &[f32] { self.positions.as_flattened() }
    pub fn normals_flat(&self) -> &[f32] { self.normals.as_flattened() }
    pub fn uvs_flat(&self) -> &[f32] { self.uvs.as_flattened() }
}

/// Unnormalized face normal (length = 2 * area)
#[inline]
pub fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

#[inline]
fn normalize(v: [f32; 3]) -> Option<[f32; 3]> {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    (len > 1e-12).then(|| [v[0] / len, v[1] / len, v[2] / len])
}
