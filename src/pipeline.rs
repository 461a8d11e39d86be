// pipeline.rs - One full relief build
//
// Pipeline:
//   1. Validate parameters, reject empty images
//   2. Sample brightness on the R x R grid
//   3. Segment foreground (cutout) or take every cell (plate)
//   4. Map brightness to heights
//   5. Synthesize plate or cutout geometry, then check the buffers
//
// Every run starts from the source image; nothing is carried between runs.

use std::sync::Arc;

use image::DynamicImage;

use crate::error::ReliefResult;
use crate::grid::{BrightnessMap, HeightMap, Mask};
use crate::height::build_height_map;
use crate::mask::{HoleReport, full_mask, segment};
use crate::mesh::{Mesh, build_cutout, build_plate};
use crate::params::{PLATE_SIZE, ReliefParams};
use crate::sample::{decode_image, ensure_non_empty, extract_brightness};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SynthesisMode {
    Plate,
    Cutout,
}

impl SynthesisMode {
    pub fn of(params: &ReliefParams) -> Self {
        if params.cutout { Self::Cutout } else { Self::Plate }
    }
}

/// Intermediate per-cell maps of one build
#[derive(Clone, Debug, PartialEq)]
pub struct ReliefMaps {
    pub brightness: BrightnessMap,
    pub mask: Mask,
    pub heights: HeightMap,
    pub holes: HoleReport,
    /// Segmentation found no foreground and fell back to the full plate
    pub fallback: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReliefStats {
    pub mode: SynthesisMode,
    pub grid_size: usize,
    pub foreground_cells: usize,
    pub holes_removed: usize,
    pub fallback: bool,
    pub vertices: usize,
    pub triangles: usize,
}

/// Finished build: the mesh plus the image to drape over its top as texture
#[derive(Clone, Debug)]
pub struct Relief {
    pub mesh: Mesh,
    pub texture: Arc<DynamicImage>,
    pub stats: ReliefStats,
}

/// Stages 2-4
pub fn compute_maps(img: &DynamicImage, params: &ReliefParams) -> ReliefMaps {
    let size = params.grid_size();
    let brightness = extract_brightness(img, size, params.mirrored);

    let (mask, holes, fallback) = match SynthesisMode::of(params) {
        SynthesisMode::Cutout => {
            let seg = segment(&brightness, params.cutout_threshold);
            (seg.mask, seg.holes, seg.fallback)
        }
        SynthesisMode::Plate => (full_mask(size), HoleReport::default(), false),
    };

    let heights = build_height_map(&brightness, &mask, params);
    ReliefMaps { brightness, mask, heights, holes, fallback }
}

/// Stage 5. Fails if the produced buffers break the mesh invariants.
pub fn synthesize(maps: &ReliefMaps, params: &ReliefParams) -> ReliefResult<Mesh> {
    let mesh = match SynthesisMode::of(params) {
        SynthesisMode::Plate => build_plate(&maps.heights, PLATE_SIZE),
        SynthesisMode::Cutout => build_cutout(&maps.heights, &maps.mask, PLATE_SIZE),
    };
    mesh.validate()?;
    Ok(mesh)
}

/// Full build from an already decoded image
pub fn build_relief(texture: &Arc<DynamicImage>, params: &ReliefParams) -> ReliefResult<Relief> {
    build_relief_with_maps(texture, params).map(|(relief, _)| relief)
}

/// Full build that also hands back the intermediate maps it produced
pub fn build_relief_with_maps(
    texture: &Arc<DynamicImage>,
    params: &ReliefParams,
) -> ReliefResult<(Relief, ReliefMaps)> {
    params.validate()?;
    ensure_non_empty(texture)?;

    let maps = compute_maps(texture, params);
    let mesh = synthesize(&maps, params)?;

    let stats = ReliefStats {
        mode: SynthesisMode::of(params),
        grid_size: maps.mask.size(),
        foreground_cells: maps.mask.count(),
        holes_removed: maps.holes.regions,
        fallback: maps.fallback,
        vertices: mesh.vertex_count(),
        triangles: mesh.triangle_count(),
    };
    tracing::info!(
        mode = ?stats.mode,
        grid = stats.grid_size,
        foreground = stats.foreground_cells,
        vertices = stats.vertices,
        triangles = stats.triangles,
        "relief built"
    );

    Ok((Relief { mesh, texture: Arc::clone(texture), stats }, maps))
}

/// Full build from encoded image bytes; decode failures abort before any stage
pub fn build_relief_from_bytes(bytes: &[u8], params: &ReliefParams) -> ReliefResult<Relief> {
    let img = decode_image(bytes)?;
    build_relief(&Arc::new(img), params)
}
