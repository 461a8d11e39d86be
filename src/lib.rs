// ============================================================================
// RELIEF ENGINE - Image to printable relief mesh
// ============================================================================
//
// Brightness of a raster image becomes height. Plate mode closes one
// displaced surface into a solid; cutout mode segments the foreground and
// extrudes it cell by cell.

use std::sync::Arc;

use image::DynamicImage;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod grid;
pub mod height;
pub mod mask;
pub mod mesh;
pub mod params;
pub mod pipeline;
pub mod sample;
pub mod slot;

pub use error::{ReliefError, ReliefResult};
pub use grid::{BrightnessMap, Grid, HeightMap, Mask};
pub use mesh::Mesh;
pub use params::{PLATE_SIZE, Preset, ReliefParams};
pub use pipeline::{
    Relief, ReliefMaps, ReliefStats, SynthesisMode, build_relief, build_relief_from_bytes, build_relief_with_maps,
};
pub use slot::{Commit, ReliefSlot, Ticket};

// ============================================================================
// Browser binding
// ============================================================================

/// Owns the source image, the current parameters and the current mesh.
/// Setters only record; `rebuild` produces a new mesh from scratch.
#[wasm_bindgen]
pub struct ReliefWorld {
    source: Option<Arc<DynamicImage>>,
    params: ReliefParams,
    slot: ReliefSlot,
}

#[wasm_bindgen]
impl ReliefWorld {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { source: None, params: ReliefParams::default(), slot: ReliefSlot::new() }
    }

    /// Decode and keep a new source image. The current mesh stays until the next rebuild.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), JsError> {
        let img = sample::decode_image(bytes)?;
        self.source = Some(Arc::new(img));
        Ok(())
    }

    pub fn apply_preset(&mut self, name: &str) -> Result<(), JsError> {
        let preset: Preset = name.parse()?;
        self.params = preset.params();
        Ok(())
    }

    pub fn set_depth(&mut self, depth: f32) { self.params.depth = depth; }
    pub fn set_base_height(&mut self, base_height: f32) { self.params.base_height = base_height; }
    pub fn set_resolution(&mut self, resolution: u32) { self.params.resolution = resolution; }
    pub fn set_inverted(&mut self, inverted: bool) { self.params.inverted = inverted; }
    pub fn set_mirrored(&mut self, mirrored: bool) { self.params.mirrored = mirrored; }
    pub fn set_cutout(&mut self, cutout: bool) { self.params.cutout = cutout; }
    pub fn set_cutout_threshold(&mut self, threshold: f32) { self.params.cutout_threshold = threshold; }

    /// Build from the current image and parameters. On failure the previous
    /// mesh stays current and the error is returned.
    pub fn rebuild(&mut self) -> Result<(), JsError> {
        let Some(source) = self.source.clone() else {
            return Err(JsError::new("no image loaded"));
        };
        self.slot.rebuild(&source, &self.params)?;
        Ok(())
    }

    /// Drop the current mesh
    pub fn clear(&mut self) {
        self.slot.take();
    }

    pub fn has_mesh(&self) -> bool { self.slot.current().is_some() }

    pub fn positions(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.mesh().map_or(&[][..], Mesh::positions_flat))
    }

    pub fn normals(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.mesh().map_or(&[][..], Mesh::normals_flat))
    }

    pub fn uvs(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.mesh().map_or(&[][..], Mesh::uvs_flat))
    }

    pub fn indices(&self) -> js_sys::Uint32Array {
        js_sys::Uint32Array::from(self.mesh().map_or(&[][..], |m| m.indices.as_slice()))
    }

    pub fn vertex_count(&self) -> usize { self.mesh().map_or(0, Mesh::vertex_count) }
    pub fn triangle_count(&self) -> usize { self.mesh().map_or(0, Mesh::triangle_count) }

    pub fn foreground_cells(&self) -> usize {
        self.slot.current().map_or(0, |r| r.stats.foreground_cells)
    }

    /// Segmentation found nothing and the full plate was used
    pub fn used_fallback(&self) -> bool {
        self.slot.current().is_some_and(|r| r.stats.fallback)
    }
}

impl ReliefWorld {
    fn mesh(&self) -> Option<&Mesh> {
        self.slot.current().map(|r| &r.mesh)
    }

    pub fn params(&self) -> &ReliefParams { &self.params }

    pub fn current(&self) -> Option<&Relief> { self.slot.current() }
}

impl Default for ReliefWorld {
    fn default() -> Self { Self::new() }
}
