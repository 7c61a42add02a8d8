//! Lloyd's Relaxation for uniform site distribution
//!
//! Lloyd's Relaxation iteratively improves the uniformity of the sites by
//! moving each one to the centroid of its (rectangle-clipped) Voronoi cell.

use glam::DVec2;
use log::{debug, warn};
use std::time::Instant;

use super::halfedge::{Subdivision, VoronoiProvider};
use crate::error::Result;
use crate::geometry::{centroid, PointBuckets, Rect};

/// Options for Lloyd's relaxation algorithm
#[derive(Debug, Clone, Copy)]
pub struct LloydOptions {
    /// Number of relaxation rounds to run
    pub max_iterations: usize,
    /// Stop when max displacement < this value (absolute units)
    /// Set to 0.0 to always run `max_iterations` rounds
    pub convergence_threshold: f64,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 2,
            convergence_threshold: 0.0,
        }
    }
}

/// Apply Lloyd's Relaxation `iterations` times
///
/// # Arguments
///
/// * `points` - Initial sites
/// * `bounds` - Rectangle the cells are clipped to
/// * `iterations` - Number of relaxation rounds
/// * `provider` - Source of the Voronoi subdivision for each round
///
/// # Returns
///
/// Relaxed sites, one per input site, in the same order
pub fn lloyd_relaxation<P: VoronoiProvider + ?Sized>(
    points: Vec<DVec2>,
    bounds: Rect,
    iterations: usize,
    provider: &P,
) -> Result<Vec<DVec2>> {
    let options = LloydOptions {
        max_iterations: iterations,
        ..Default::default()
    };
    lloyd_relaxation_with_options(points, bounds, options, provider)
}

/// Apply Lloyd's Relaxation with custom options
///
/// # Algorithm
///
/// For each iteration:
/// 1. Subdivide the current sites into Voronoi cells
/// 2. Clip every cell edge to the rectangle; edges fully outside are dropped
/// 3. Move each site to the average of its cell's distinct clipped vertices
///
/// A cell whose edges are all clipped away leaves its site where it was.
pub fn lloyd_relaxation_with_options<P: VoronoiProvider + ?Sized>(
    mut points: Vec<DVec2>,
    bounds: Rect,
    options: LloydOptions,
    provider: &P,
) -> Result<Vec<DVec2>> {
    let total_start = Instant::now();

    for iteration in 0..options.max_iterations {
        let iter_start = Instant::now();
        let subdivision = provider.subdivide(&points, bounds)?;
        let (new_points, max_displacement) = compute_new_points(&points, &subdivision, bounds)?;
        points = new_points;

        debug!(
            "[Lloyd] Iter {}: {} sites, max_disp={:.4}, took {:?}",
            iteration + 1,
            points.len(),
            max_displacement,
            iter_start.elapsed()
        );

        if options.convergence_threshold > 0.0 && max_displacement < options.convergence_threshold {
            debug!(
                "[Lloyd] Converged at iteration {} (max_disp {:.4} < threshold {:.4})",
                iteration + 1,
                max_displacement,
                options.convergence_threshold
            );
            break;
        }
    }

    debug!("[Lloyd] Finished in {:?}", total_start.elapsed());
    Ok(points)
}

/// Compute new site positions and track maximum displacement
fn compute_new_points(
    points: &[DVec2],
    subdivision: &Subdivision,
    bounds: Rect,
) -> Result<(Vec<DVec2>, f64)> {
    let mut new_points = points.to_vec();
    let mut max_displacement: f64 = 0.0;

    for (face_idx, face) in subdivision.faces.iter().enumerate() {
        let Some(old_pos) = points.get(face.site).copied() else {
            continue;
        };

        match clipped_cell_centroid(subdivision, face_idx, bounds)? {
            Some(new_pos) => {
                max_displacement = max_displacement.max(new_pos.distance(old_pos));
                new_points[face.site] = new_pos;
            }
            None => warn!(
                "[Lloyd] Cell of site {} lies outside the bounds, keeping it in place",
                face.site
            ),
        }
    }

    Ok((new_points, max_displacement))
}

/// Centroid of the distinct clipped vertices of one cell
fn clipped_cell_centroid(
    subdivision: &Subdivision,
    face: usize,
    bounds: Rect,
) -> Result<Option<DVec2>> {
    let mut seen = PointBuckets::new();
    let mut vertices: Vec<DVec2> = Vec::new();

    for edge in subdivision.face_edges(face) {
        let edge = edge?;
        let p1 = subdivision.vertices[edge.origin];
        let p2 = subdivision.vertices[subdivision.destination(edge)];

        if let Some((a, b)) = bounds.clip_segment(p1, p2) {
            for p in [a, b] {
                if seen.find(p).is_none() {
                    seen.insert(p, vertices.len());
                    vertices.push(p);
                }
            }
        }
    }

    Ok(centroid(vertices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PointSelector;
    use crate::generation::halfedge::from_rings;
    use crate::generation::points::generate_points;
    use crate::generation::VoronoiceProvider;
    use crate::MapError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    fn sites(count: usize, seed: u64) -> Vec<DVec2> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate_points(PointSelector::Random, 100.0, 100.0, count, 0.0, &mut rng)
    }

    /// Hands back a fixed subdivision regardless of the sites
    struct FixedProvider(Subdivision);

    impl VoronoiProvider for FixedProvider {
        fn subdivide(&self, _sites: &[DVec2], _bounds: Rect) -> Result<Subdivision> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_lloyd_relaxation() {
        let relaxed = lloyd_relaxation(sites(100, 42), bounds(), 3, &VoronoiceProvider).unwrap();

        assert_eq!(relaxed.len(), 100);
        for p in &relaxed {
            assert!(bounds().contains(*p));
        }
    }

    #[test]
    fn test_lloyd_relaxation_determinism() {
        let relaxed1 = lloyd_relaxation(sites(50, 12345), bounds(), 2, &VoronoiceProvider).unwrap();
        let relaxed2 = lloyd_relaxation(sites(50, 12345), bounds(), 2, &VoronoiceProvider).unwrap();
        assert_eq!(relaxed1, relaxed2);
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let points = sites(30, 9);
        let relaxed = lloyd_relaxation(points.clone(), bounds(), 0, &VoronoiceProvider).unwrap();
        assert_eq!(relaxed, points);
    }

    #[test]
    fn test_centroid_of_clipped_cell() {
        // Square cell sticking out of the right side of the bounds
        let vertices = vec![
            DVec2::new(80.0, 40.0),
            DVec2::new(120.0, 40.0),
            DVec2::new(120.0, 60.0),
            DVec2::new(80.0, 60.0),
        ];
        let provider = FixedProvider(from_rings(vertices, &[(0, vec![0, 1, 2, 3])]));

        let relaxed = lloyd_relaxation(vec![DVec2::new(90.0, 50.0)], bounds(), 1, &provider).unwrap();

        // Edge 120,40 -> 120,60 is dropped; the others clip to x = 100
        assert!((relaxed[0].x - 90.0).abs() < 1e-9);
        assert!((relaxed[0].y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_fully_clipped_cell_keeps_site() {
        let vertices = vec![
            DVec2::new(150.0, 150.0),
            DVec2::new(160.0, 150.0),
            DVec2::new(160.0, 160.0),
        ];
        let provider = FixedProvider(from_rings(vertices, &[(0, vec![0, 1, 2])]));

        let site = DVec2::new(99.0, 99.0);
        let relaxed = lloyd_relaxation(vec![site], bounds(), 1, &provider).unwrap();
        assert_eq!(relaxed, vec![site]);
    }

    #[test]
    fn test_broken_ring_propagates() {
        let vertices = vec![DVec2::new(10.0, 10.0), DVec2::new(20.0, 10.0), DVec2::new(15.0, 20.0)];
        let mut subdivision = from_rings(vertices, &[(0, vec![0, 1, 2])]);
        subdivision.half_edges[1].next = None;
        let provider = FixedProvider(subdivision);

        let result = lloyd_relaxation(vec![DVec2::new(15.0, 13.0)], bounds(), 1, &provider);
        assert_eq!(result, Err(MapError::BrokenHalfEdgeRing { face: 0 }));
    }

    #[test]
    fn test_convergence_stops_early() {
        let options = LloydOptions {
            max_iterations: 20,
            convergence_threshold: 1e9,
        };
        let points = sites(40, 5);
        let once = lloyd_relaxation(points.clone(), bounds(), 1, &VoronoiceProvider).unwrap();
        let converged =
            lloyd_relaxation_with_options(points, bounds(), options, &VoronoiceProvider).unwrap();
        assert_eq!(once, converged);
    }
}
