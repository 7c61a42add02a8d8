//! Core Voronoi graph generation
//!
//! Samples sites, relaxes them with Lloyd's algorithm and turns the final
//! Voronoi subdivision into the Center / Corner / Edge graph.

mod builder;
mod halfedge;
mod lloyd;
mod points;
mod voronoi;

pub use builder::{build_graph, improve_corners};
pub use halfedge::{Face, FaceEdges, HalfEdge, Subdivision, VoronoiProvider};
pub use lloyd::{lloyd_relaxation, lloyd_relaxation_with_options, LloydOptions};
pub use points::generate_points;
pub use voronoi::VoronoiceProvider;
