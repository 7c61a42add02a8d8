//! Terrain shaping and classification
//!
//! Provides the island mask and the elevation, hydrology and biome stages
//! that annotate the map graph.

mod biome;
mod elevation;
mod hydrology;
mod perlin;

pub use biome::{assign_biomes, classify_biome, Biome};
pub use elevation::{
    assign_center_elevations, assign_corner_elevations, assign_corner_water,
    flatten_ocean_elevations, redistribute_elevations,
};
pub use hydrology::{
    assign_center_moisture, assign_coast, assign_corner_moisture, assign_corner_types,
    assign_ocean_coast_and_land, flood_fill_ocean, mark_border_and_water_centers,
    redistribute_moisture,
};
pub use perlin::{sample_perlin_2d, PerlinConfig};

use glam::DVec2;
use rand::Rng;
use std::f64::consts::{PI, TAU};

use crate::config::IslandFunction;

/// Gap between the inner and outer ring of the radial shape
const ISLAND_FACTOR: f64 = 1.07;

/// Radius both rings collapse to inside the dip (inlet) window
const DIP_RADIUS: f64 = 0.2;

/// Procedural land mask over the map rectangle
///
/// Each variant carries the parameters drawn from the seeded generator at
/// construction; evaluation is a pure function of those and the position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IslandShape {
    /// Two sinusoidal rings around the map center, cut by an inlet
    Radial {
        width: f64,
        height: f64,
        bumps: u32,
        start_angle: f64,
        dip_angle: f64,
        dip_width: f64,
    },
    /// Gradient noise against a threshold growing with distance from center
    Noise {
        width: f64,
        height: f64,
        seed: u32,
        config: PerlinConfig,
    },
}

impl IslandShape {
    /// Create the shape selected by `function`
    pub fn new<R: Rng>(function: IslandFunction, width: f64, height: f64, rng: &mut R) -> Self {
        match function {
            IslandFunction::Radial => Self::radial(width, height, rng),
            IslandFunction::Noise => Self::noise(width, height, rng),
        }
    }

    pub fn radial<R: Rng>(width: f64, height: f64, rng: &mut R) -> Self {
        IslandShape::Radial {
            width,
            height,
            bumps: rng.gen_range(1..6),
            start_angle: rng.gen_range(0.0..TAU),
            dip_angle: rng.gen_range(0.0..TAU),
            dip_width: rng.gen_range(0.2..0.7),
        }
    }

    pub fn noise<R: Rng>(width: f64, height: f64, rng: &mut R) -> Self {
        IslandShape::Noise {
            width,
            height,
            seed: rng.gen(),
            config: PerlinConfig::default(),
        }
    }

    /// Whether `pos` (map coordinates) is land
    pub fn is_inside(&self, pos: DVec2) -> bool {
        match *self {
            IslandShape::Radial {
                width,
                height,
                bumps,
                start_angle,
                dip_angle,
                dip_width,
            } => {
                let p = normalize(pos, width, height);
                let angle = p.y.atan2(p.x);
                let length = 0.5 * (p.x.abs().max(p.y.abs()) + p.length());
                let bumps = bumps as f64;

                let mut r1 = 0.5 + 0.40 * (start_angle + bumps * angle + ((bumps + 3.0) * angle).cos()).sin();
                let mut r2 = 0.7 - 0.20 * (start_angle + bumps * angle - ((bumps + 2.0) * angle).sin()).sin();
                let in_dip = [0.0, 2.0 * PI, -2.0 * PI]
                    .iter()
                    .any(|wrap| (angle - dip_angle + wrap).abs() < dip_width);
                if in_dip {
                    r1 = DIP_RADIUS;
                    r2 = DIP_RADIUS;
                }

                length < r1 || (length > r1 * ISLAND_FACTOR && length < r2)
            }
            IslandShape::Noise {
                width,
                height,
                seed,
                ref config,
            } => {
                let p = normalize(pos, width, height);
                let noise = sample_perlin_2d(p, seed, config);
                noise > 0.3 * (1.0 + p.length_squared())
            }
        }
    }
}

/// Map coordinates to [-1, 1]² around the rectangle's center
#[inline]
fn normalize(pos: DVec2, width: f64, height: f64) -> DVec2 {
    DVec2::new(2.0 * (pos.x / width - 0.5), 2.0 * (pos.y / height - 0.5))
}
