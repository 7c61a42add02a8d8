//! Island Map Configuration and Builder
//!
//! This module provides configuration types for deterministic island map generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Strategy used to pick the initial site points
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointSelector {
    /// Uniformly distributed random points
    #[default]
    Random,
    /// Regular square grid (cell centers)
    Square,
    /// Offset grid producing hexagon-like cells
    Hexagon,
    /// Blue-noise sampling with a minimum distance between points
    PoissonDisc,
}

impl PointSelector {
    /// Whether this selector produces a regular grid
    ///
    /// Grid layouts skip Lloyd's relaxation (they are already uniform) and get
    /// extra elevation jitter to avoid perfectly flat plateaus.
    pub fn is_grid(self) -> bool {
        matches!(self, PointSelector::Square | PointSelector::Hexagon)
    }

    /// Get a human-readable name for this selector
    pub fn name(self) -> &'static str {
        match self {
            PointSelector::Random => "Random",
            PointSelector::Square => "Square",
            PointSelector::Hexagon => "Hexagon",
            PointSelector::PoissonDisc => "PoissonDisc",
        }
    }
}

/// Island mask variant used to decide land vs. water
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IslandFunction {
    /// Seeded sinusoidal radius bumps with an inlet
    #[default]
    Radial,
    /// Gradient noise against a threshold growing with distance from center
    Noise,
}

/// Configuration for deterministic island map generation
///
/// The same configuration will always produce the identical map.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_island::*;
///
/// let config = MapConfigBuilder::new()
///     .seed(42)
///     .dimensions(200.0, 200.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.width, 200.0);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    /// Random seed driving every stage of the pipeline
    pub seed: u32,

    /// Width of the bounding rectangle
    pub width: f64,

    /// Height of the bounding rectangle
    pub height: f64,

    /// How the initial sites are sampled
    pub point_selector: PointSelector,

    /// Number of sites requested from Random/Square/Hexagon selectors
    ///
    /// Grid selectors use `floor(sqrt(region_count))²` sites.
    pub region_count: usize,

    /// Minimum distance between Poisson-disc samples
    pub poisson_radius: f64,

    /// Number of Lloyd's relaxation rounds
    ///
    /// - 0: Raw Voronoi cells (irregular)
    /// - 2-3: Decent uniformity (default 2)
    ///
    /// Ignored for grid selectors.
    pub relaxation_count: usize,

    /// Early-exit threshold for Lloyd's relaxation (absolute distance)
    ///
    /// 0.0 runs every requested round.
    pub relaxation_convergence: f64,

    /// Island mask variant
    pub island_function: IslandFunction,
}

impl MapConfig {
    /// Relaxation rounds actually applied, after the grid override
    #[inline]
    pub fn effective_relaxation_count(&self) -> usize {
        if self.point_selector.is_grid() {
            0
        } else {
            self.relaxation_count
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 100.0,
            height: 100.0,
            point_selector: PointSelector::default(),
            region_count: 400,
            poisson_radius: 5.0,
            relaxation_count: 2,
            relaxation_convergence: 0.0,
            island_function: IslandFunction::default(),
        }
    }
}

/// Builder for creating MapConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_voronoi_island::*;
///
/// let config = MapConfigBuilder::new()
///     .seed(12345)
///     .point_selector(PointSelector::PoissonDisc)
///     .poisson_radius(4.0)
///     .unwrap()
///     .relaxation_count(3)
///     .unwrap()
///     .island_function(IslandFunction::Noise)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct MapConfigBuilder {
    seed: Option<u32>,
    config: MapConfig,
}

impl MapConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - dimensions: 100 x 100
    /// - point_selector: Random, 400 regions
    /// - poisson_radius: 5.0
    /// - relaxation_count: 2, convergence disabled
    /// - island_function: Radial
    pub fn new() -> Self {
        Self {
            seed: None,
            config: MapConfig::default(),
        }
    }

    /// Set the random seed for map generation
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the bounding rectangle dimensions
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is not positive
    pub fn dimensions(mut self, width: f64, height: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "dimensions must be positive (got {} x {})",
                width, height
            )));
        }
        self.config.width = width;
        self.config.height = height;
        Ok(self)
    }

    /// Set the site sampling strategy
    pub fn point_selector(mut self, selector: PointSelector) -> Self {
        self.config.point_selector = selector;
        self
    }

    /// Set the number of requested sites
    pub fn region_count(mut self, count: usize) -> Self {
        self.config.region_count = count;
        self
    }

    /// Set the Poisson-disc minimum distance
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if radius <= 0.0
    pub fn poisson_radius(mut self, radius: f64) -> Result<Self> {
        if !(radius > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "Poisson radius must be positive (got {})",
                radius
            )));
        }
        self.config.poisson_radius = radius;
        Ok(self)
    }

    /// Set the number of Lloyd's relaxation rounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 20 (excessive and impractical)
    pub fn relaxation_count(mut self, iterations: usize) -> Result<Self> {
        if iterations > 20 {
            return Err(MapError::InvalidConfig(format!(
                "relaxation count must be <= 20 (got {})",
                iterations
            )));
        }
        self.config.relaxation_count = iterations;
        Ok(self)
    }

    /// Set the early-exit displacement threshold for relaxation
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is negative
    pub fn relaxation_convergence(mut self, threshold: f64) -> Result<Self> {
        if threshold < 0.0 {
            return Err(MapError::InvalidConfig(format!(
                "relaxation convergence threshold must be >= 0 (got {})",
                threshold
            )));
        }
        self.config.relaxation_convergence = threshold;
        Ok(self)
    }

    /// Set the island mask variant
    pub fn island_function(mut self, function: IslandFunction) -> Self {
        self.config.island_function = function;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, one is drawn from thread-local entropy here
    /// and stored in the returned config. Generation itself only reads
    /// `MapConfig::seed`, so logging or saving it is enough to replay a map.
    pub fn build(self) -> Result<MapConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);
        Ok(MapConfig { seed, ..self.config })
    }
}

impl Default for MapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = MapConfigBuilder::new().build().unwrap();
        assert_eq!(config.width, 100.0);
        assert_eq!(config.height, 100.0);
        assert_eq!(config.point_selector, PointSelector::Random);
        assert_eq!(config.relaxation_count, 2);
        assert_eq!(config.island_function, IslandFunction::Radial);
    }

    #[test]
    fn test_builder_custom() {
        let config = MapConfigBuilder::new()
            .seed(42)
            .dimensions(300.0, 150.0)
            .unwrap()
            .point_selector(PointSelector::Hexagon)
            .region_count(900)
            .relaxation_count(3)
            .unwrap()
            .island_function(IslandFunction::Noise)
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.width, 300.0);
        assert_eq!(config.height, 150.0);
        assert_eq!(config.region_count, 900);
        assert_eq!(config.relaxation_count, 3);
        assert_eq!(config.island_function, IslandFunction::Noise);
    }

    #[test]
    fn test_grid_selectors_skip_relaxation() {
        let config = MapConfigBuilder::new()
            .seed(1)
            .point_selector(PointSelector::Square)
            .relaxation_count(4)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.effective_relaxation_count(), 0);

        let config = MapConfigBuilder::new()
            .seed(1)
            .point_selector(PointSelector::PoissonDisc)
            .relaxation_count(4)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.effective_relaxation_count(), 4);
    }

    #[test]
    fn test_builder_rejects_invalid_values() {
        assert!(MapConfigBuilder::new().relaxation_count(21).is_err());
        assert!(MapConfigBuilder::new().relaxation_convergence(-0.1).is_err());
        assert!(MapConfigBuilder::new().dimensions(0.0, 10.0).is_err());
        assert!(MapConfigBuilder::new().dimensions(10.0, -1.0).is_err());
        assert!(MapConfigBuilder::new().poisson_radius(0.0).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = MapConfigBuilder::new()
            .seed(12345)
            .point_selector(PointSelector::PoissonDisc)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: MapConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
