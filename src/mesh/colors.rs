//! Color mapping for biomes

use crate::terrain::Biome;

/// RGBA color type
pub type BiomeColor = [f32; 4];

/// Trait for mapping terrain labels to colors
pub trait ColorMapper<T> {
    /// Map a terrain label to an RGBA color
    fn map_color(&self, terrain: &T) -> BiomeColor;
}

/// Default palette for [`Biome`]
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicColorMapper;

impl ColorMapper<Biome> for BasicColorMapper {
    fn map_color(&self, biome: &Biome) -> BiomeColor {
        let hex = match biome {
            Biome::Ocean => 0x44447a,
            Biome::Lake => 0x336699,
            Biome::Marsh => 0x2f6666,
            Biome::Ice => 0x99ffff,
            Biome::Beach => 0xa09077,
            Biome::Snow => 0xffffff,
            Biome::Tundra => 0xbbbbaa,
            Biome::Bare => 0x888888,
            Biome::Scorched => 0x555555,
            Biome::Taiga => 0x99aa77,
            Biome::Shrubland => 0x889977,
            Biome::TemperateDesert => 0xc9d29b,
            Biome::TemperateRainForest => 0x448855,
            Biome::TemperateDeciduousForest => 0x679459,
            Biome::Grassland => 0x88aa55,
            Biome::SubtropicalDesert => 0xd2b98b,
            Biome::TropicalRainForest => 0x337755,
            Biome::TropicalSeasonalForest => 0x559944,
        };
        from_hex(hex)
    }
}

/// Convert a `0xRRGGBB` value to an opaque RGBA color
#[inline]
pub fn from_hex(hex: u32) -> BiomeColor {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}
