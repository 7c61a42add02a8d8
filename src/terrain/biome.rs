//! Biome classification
//!
//! Fixed Whittaker-style lookup keyed by the water flags, an elevation band
//! and a moisture band that depends on the elevation band.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::Center;
use crate::map::Map;

/// Biome label of a center
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biome {
    Ocean,
    Lake,
    Marsh,
    Ice,
    Beach,
    Snow,
    Tundra,
    Bare,
    Scorched,
    Taiga,
    Shrubland,
    TemperateDesert,
    TemperateRainForest,
    TemperateDeciduousForest,
    Grassland,
    SubtropicalDesert,
    TropicalRainForest,
    TropicalSeasonalForest,
}

impl Biome {
    pub const ALL: [Biome; 18] = [
        Biome::Ocean,
        Biome::Lake,
        Biome::Marsh,
        Biome::Ice,
        Biome::Beach,
        Biome::Snow,
        Biome::Tundra,
        Biome::Bare,
        Biome::Scorched,
        Biome::Taiga,
        Biome::Shrubland,
        Biome::TemperateDesert,
        Biome::TemperateRainForest,
        Biome::TemperateDeciduousForest,
        Biome::Grassland,
        Biome::SubtropicalDesert,
        Biome::TropicalRainForest,
        Biome::TropicalSeasonalForest,
    ];

    /// Canonical label, e.g. `"TEMPERATE_DESERT"`
    pub fn name(self) -> &'static str {
        match self {
            Biome::Ocean => "OCEAN",
            Biome::Lake => "LAKE",
            Biome::Marsh => "MARSH",
            Biome::Ice => "ICE",
            Biome::Beach => "BEACH",
            Biome::Snow => "SNOW",
            Biome::Tundra => "TUNDRA",
            Biome::Bare => "BARE",
            Biome::Scorched => "SCORCHED",
            Biome::Taiga => "TAIGA",
            Biome::Shrubland => "SHRUBLAND",
            Biome::TemperateDesert => "TEMPERATE_DESERT",
            Biome::TemperateRainForest => "TEMPERATE_RAIN_FOREST",
            Biome::TemperateDeciduousForest => "TEMPERATE_DECIDUOUS_FOREST",
            Biome::Grassland => "GRASSLAND",
            Biome::SubtropicalDesert => "SUBTROPICAL_DESERT",
            Biome::TropicalRainForest => "TROPICAL_RAIN_FOREST",
            Biome::TropicalSeasonalForest => "TROPICAL_SEASONAL_FOREST",
        }
    }

    /// Whether this biome is open water
    pub fn is_water(self) -> bool {
        matches!(self, Biome::Ocean | Biome::Lake | Biome::Marsh | Biome::Ice)
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up the biome of a center from its flags, elevation and moisture
pub fn classify_biome(center: &Center) -> Biome {
    let e = center.elevation;
    let m = center.moisture;

    if center.ocean {
        Biome::Ocean
    } else if center.water {
        if e < 0.1 {
            Biome::Marsh
        } else if e > 0.8 {
            Biome::Ice
        } else {
            Biome::Lake
        }
    } else if center.coast {
        Biome::Beach
    } else if e > 0.8 {
        if m > 0.50 {
            Biome::Snow
        } else if m > 0.33 {
            Biome::Tundra
        } else if m > 0.16 {
            Biome::Bare
        } else {
            Biome::Scorched
        }
    } else if e > 0.6 {
        if m > 0.66 {
            Biome::Taiga
        } else if m > 0.33 {
            Biome::Shrubland
        } else {
            Biome::TemperateDesert
        }
    } else if e > 0.3 {
        if m > 0.83 {
            Biome::TemperateRainForest
        } else if m > 0.50 {
            Biome::TemperateDeciduousForest
        } else if m > 0.16 {
            Biome::Grassland
        } else {
            Biome::TemperateDesert
        }
    } else if m > 0.66 {
        Biome::TropicalRainForest
    } else if m > 0.33 {
        Biome::TropicalSeasonalForest
    } else if m > 0.16 {
        Biome::Grassland
    } else {
        Biome::SubtropicalDesert
    }
}

/// Label every center and record the distinct biomes in discovery order
pub fn assign_biomes(map: &mut Map) {
    map.biomes.clear();
    for center in &mut map.centers {
        let biome = classify_biome(center);
        center.biome = Some(biome);
        if !map.biomes.contains(&biome) {
            map.biomes.push(biome);
        }
    }
}
