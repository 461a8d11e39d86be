// img2relief - Turn an image into a printable relief mesh
//
// Pipeline:
//   1. Load image, apply preset and flag overrides
//   2. Build the relief (luminance, segmentation, heights, geometry)
//   3. Check the mesh is closed and outward-wound
//   4. Print a summary, optionally write mask / height previews
//
// Usage: cargo run --bin img2relief -- <image> [--preset NAME] [--cutout] [-v]
//
// Logging: RUST_LOG takes precedence over -v / -q.

mod preview;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use relief_engine::mesh::topology::{analyze_edges, signed_volume};
use relief_engine::pipeline::build_relief_with_maps;
use relief_engine::{Preset, ReliefParams};

/// img2relief - Build a 3D-printable relief from an image.
#[derive(Parser)]
#[command(name = "img2relief")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input image (png, jpeg, webp, bmp, gif)
    image: PathBuf,

    /// Scene preset applied before the individual overrides
    #[arg(long, short, value_enum, default_value = "relief")]
    preset: PresetArg,

    /// Relief depth above the base (mm)
    #[arg(long)]
    depth: Option<f32>,

    /// Base plate thickness (mm)
    #[arg(long)]
    base_height: Option<f32>,

    /// Grid resolution, clamped to 2..=256
    #[arg(long, short)]
    resolution: Option<u32>,

    /// Brightness threshold for background detection in cutout mode
    #[arg(long)]
    threshold: Option<f32>,

    /// Dark areas rise instead of bright ones (`--inverted=false` turns a preset's setting off)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    inverted: Option<bool>,

    /// Flip the image horizontally (`--mirrored=false` turns a preset's setting off)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    mirrored: Option<bool>,

    /// Extrude only the segmented foreground (`--cutout=false` turns a preset's setting off)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    cutout: Option<bool>,

    /// Write the foreground mask as a PNG
    #[arg(long)]
    mask_png: Option<PathBuf>,

    /// Write the height map as a PNG
    #[arg(long)]
    height_png: Option<PathBuf>,

    /// Suppress all non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Relief,
    Keychain,
    FridgeMagnet,
    Lithophane,
    Stamp,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Relief => Preset::Relief,
            PresetArg::Keychain => Preset::Keychain,
            PresetArg::FridgeMagnet => Preset::FridgeMagnet,
            PresetArg::Lithophane => Preset::Lithophane,
            PresetArg::Stamp => Preset::Stamp,
        }
    }
}

impl Cli {
    /// Preset first, then every flag that was given
    fn params(&self) -> ReliefParams {
        let mut params = Preset::from(self.preset).params();
        if let Some(depth) = self.depth { params.depth = depth; }
        if let Some(base) = self.base_height { params.base_height = base; }
        if let Some(res) = self.resolution { params.resolution = res; }
        if let Some(thr) = self.threshold { params.cutout_threshold = thr; }
        if let Some(inverted) = self.inverted { params.inverted = inverted; }
        if let Some(mirrored) = self.mirrored { params.mirrored = mirrored; }
        if let Some(cutout) = self.cutout { params.cutout = cutout; }
        params
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "relief_engine=info,img2relief=info",
            2 => "relief_engine=debug,img2relief=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let params = cli.params();
    let preset = Preset::from(cli.preset);
    if !cli.quiet {
        println!("Processing {} (preset {}, {}x{} grid)...", cli.image.display(), preset, params.grid_size(), params.grid_size());
    }

    let img = image::open(&cli.image).with_context(|| format!("failed to open {}", cli.image.display()))?;
    let img = Arc::new(img);

    let (relief, maps) = build_relief_with_maps(&img, &params).context("relief build failed")?;
    let stats = relief.stats;

    if let Some(path) = &cli.mask_png {
        preview::mask_image(&maps.mask)
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote mask preview");
    }
    if let Some(path) = &cli.height_png {
        preview::height_image(&maps.heights)
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote height preview");
    }

    if cli.quiet {
        return Ok(());
    }

    let edges = analyze_edges(&relief.mesh);
    println!("  Mode:        {:?}", stats.mode);
    println!("  Foreground:  {} / {} cells", stats.foreground_cells, stats.grid_size * stats.grid_size);
    if stats.fallback {
        println!("  Segmentation found no foreground, used the full plate");
    }
    if stats.holes_removed > 0 {
        println!("  Holes filled: {}", stats.holes_removed);
    }
    println!("  Vertices:    {}", stats.vertices);
    println!("  Triangles:   {}", stats.triangles);
    if let Some((lo, hi)) = relief.mesh.bounds() {
        println!(
            "  Bounds:      [{:.2}, {:.2}, {:.2}] .. [{:.2}, {:.2}, {:.2}]",
            lo[0], lo[1], lo[2], hi[0], hi[1], hi[2]
        );
    }
    println!("  Volume:      {:.1} mm^3", signed_volume(&relief.mesh));
    println!(
        "  Watertight:  {} ({} boundary, {} non-manifold, {} flipped edges)",
        if edges.is_watertight() && edges.is_consistently_wound() { "yes" } else { "no" },
        edges.boundary,
        edges.non_manifold,
        edges.inconsistent
    );

    println!("Done!");
    Ok(())
}
