//! Voronoi subdivision via the `voronoice` crate
//!
//! Delaunay triangulation and cell construction are delegated to
//! `voronoice`, which clips every cell to the bounding rectangle. The cells
//! are then converted into the half-edge form the rest of the pipeline uses.

use glam::DVec2;
use voronoice::{BoundingBox, ClipBehavior, Point, VoronoiBuilder};

use super::halfedge::{from_rings, Subdivision, VoronoiProvider};
use crate::error::{MapError, Result};
use crate::geometry::{PointBuckets, Rect};

/// Default [`VoronoiProvider`] backed by `voronoice`
#[derive(Debug, Clone, Copy, Default)]
pub struct VoronoiceProvider;

impl VoronoiProvider for VoronoiceProvider {
    fn subdivide(&self, sites: &[DVec2], bounds: Rect) -> Result<Subdivision> {
        let center = bounds.center();
        let voronoi = VoronoiBuilder::default()
            .set_sites(sites.iter().map(|p| Point { x: p.x, y: p.y }).collect())
            .set_bounding_box(BoundingBox::new(
                Point {
                    x: center.x,
                    y: center.y,
                },
                bounds.width,
                bounds.height,
            ))
            .set_clip_behavior(ClipBehavior::Clip)
            .build()
            .ok_or_else(|| {
                MapError::GenerationFailed(format!(
                    "could not triangulate {} sites (collinear or too few)",
                    sites.len()
                ))
            })?;

        if voronoi.sites().len() != sites.len() {
            return Err(MapError::GenerationFailed(format!(
                "provider dropped sites outside the bounds ({} of {} kept)",
                voronoi.sites().len(),
                sites.len()
            )));
        }

        // Clipped cells do not always share vertex indices along the
        // rectangle, so vertices are merged by position.
        let mut buckets = PointBuckets::new();
        let mut vertices: Vec<DVec2> = Vec::new();
        let rings: Vec<(usize, Vec<usize>)> = voronoi
            .iter_cells()
            .map(|cell| {
                let ring = cell
                    .iter_vertices()
                    .map(|p| {
                        let p = DVec2::new(p.x, p.y);
                        buckets.find_or_insert_with(p, || {
                            vertices.push(p);
                            vertices.len() - 1
                        })
                    })
                    .collect();
                (cell.site(), ring)
            })
            .collect();

        Ok(from_rings(vertices, &rings))
    }
}
