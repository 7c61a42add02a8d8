//! Voronoi-based island map generation
//!
//! A standalone library for generating procedural island maps as an
//! attributed planar graph: polygonal regions, their shared corners and the
//! edges between them, annotated with elevation, moisture, water/ocean/coast
//! flags and a biome label. Suitable for driving mesh generation in any
//! game engine.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rust_voronoi_island::*;
//!
//! // Generate a map
//! let config = MapConfigBuilder::new()
//!     .seed(42)
//!     .dimensions(200.0, 200.0).unwrap()
//!     .region_count(1000)
//!     .relaxation_count(3).unwrap()
//!     .build().unwrap();
//!
//! let map = Map::generate(config).unwrap().expect("at least 3 sites");
//!
//! // Generate mesh for rendering
//! let mesh = generate_mesh(&map, &BasicColorMapper, 20.0);
//! println!("Generated {} triangles", mesh.triangle_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-center lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and map entities

// Modules
pub mod config;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod graph;
pub mod map;
pub mod mesh;
pub mod terrain;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use config::{IslandFunction, MapConfig, MapConfigBuilder, PointSelector};
pub use error::{MapError, Result};
pub use generation::{LloydOptions, Subdivision, VoronoiProvider, VoronoiceProvider};
pub use geometry::{Rect, EPSILON};
pub use graph::{Center, Corner, Edge};
pub use map::Map;
pub use mesh::{generate_mesh, BasicColorMapper, BiomeColor, ColorMapper, MeshData};
pub use terrain::{Biome, IslandShape, PerlinConfig};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
