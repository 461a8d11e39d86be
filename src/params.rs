// params.rs - Build parameters and scene presets
//
// ReliefParams is the full input contract of a build (minus the image).
// Presets mirror the scene types of the app: each one is a set of overrides
// on top of the defaults.

use std::fmt;
use std::str::FromStr;

use crate::error::{ReliefError, ReliefResult};

/// Hard cap on grid size; bounds worst-case cutout synthesis cost
pub const MAX_RESOLUTION: u32 = 256;
/// Plate mode needs at least one quad per side
pub const MIN_RESOLUTION: u32 = 2;
pub const DEFAULT_RESOLUTION: u32 = 128;
pub const DEFAULT_THRESHOLD: f32 = 0.92;
pub const DEFAULT_DEPTH: f32 = 5.0;
pub const DEFAULT_BASE_HEIGHT: f32 = 3.0;

/// World-space edge length of the square footprint, independent of resolution
pub const PLATE_SIZE: f32 = 60.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReliefParams {
    /// Height added for full brightness
    pub depth: f32,
    /// Height of a zero-brightness foreground cell
    pub base_height: f32,
    /// Requested samples per side, clamped by `grid_size`
    pub resolution: u32,
    /// Dark cells become tall
    pub inverted: bool,
    /// Sample the image mirrored left-right
    pub mirrored: bool,
    /// Segment the foreground and extrude it cell by cell
    pub cutout: bool,
    /// Brightness above which a cell may be background; cutout only
    pub cutout_threshold: f32,
}

impl Default for ReliefParams {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            base_height: DEFAULT_BASE_HEIGHT,
            resolution: DEFAULT_RESOLUTION,
            inverted: false,
            mirrored: false,
            cutout: false,
            cutout_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ReliefParams {
    /// Samples per side actually used: resolution clamped to [2, 256]
    pub fn grid_size(&self) -> usize {
        self.resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION) as usize
    }

    pub fn validate(&self) -> ReliefResult<()> {
        if !self.depth.is_finite() || self.depth < 0.0 {
            return Err(ReliefError::invalid("depth", format!("must be finite and >= 0, got {}", self.depth)));
        }
        if !self.base_height.is_finite() || self.base_height < 0.0 {
            return Err(ReliefError::invalid(
                "base_height",
                format!("must be finite and >= 0, got {}", self.base_height),
            ));
        }
        if self.cutout && !(self.cutout_threshold > 0.0 && self.cutout_threshold < 1.0) {
            return Err(ReliefError::invalid(
                "cutout_threshold",
                format!("must lie in (0, 1), got {}", self.cutout_threshold),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Scene presets
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    Relief,
    Keychain,
    FridgeMagnet,
    Lithophane,
    Stamp,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Relief,
        Preset::Keychain,
        Preset::FridgeMagnet,
        Preset::Lithophane,
        Preset::Stamp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Relief => "relief",
            Preset::Keychain => "keychain",
            Preset::FridgeMagnet => "fridge-magnet",
            Preset::Lithophane => "lithophane",
            Preset::Stamp => "stamp",
        }
    }

    pub fn params(self) -> ReliefParams {
        let base = ReliefParams::default();
        match self {
            Preset::Relief => ReliefParams { depth: 5.0, base_height: 3.0, ..base },
            Preset::Keychain => ReliefParams { depth: 1.0, base_height: 2.0, cutout: true, ..base },
            Preset::FridgeMagnet => ReliefParams { depth: 1.5, base_height: 2.0, cutout: true, ..base },
            // Light passes through thin (dark) areas, so bright pixels must be thin
            Preset::Lithophane => ReliefParams {
                depth: 3.0,
                base_height: 0.8,
                inverted: true,
                resolution: 192,
                ..base
            },
            // Printed mirror-image so the stamped result reads correctly
            Preset::Stamp => ReliefParams { depth: 4.0, base_height: 5.0, mirrored: true, ..base },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ReliefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == key || (key == "fridgemagnet" && *p == Preset::FridgeMagnet))
            .ok_or_else(|| ReliefError::invalid("preset", format!("unknown preset `{s}`")))
    }
}
