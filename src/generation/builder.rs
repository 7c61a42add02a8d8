//! Graph construction from a Voronoi subdivision
//!
//! Walks every face of the subdivision and materializes the cross-linked
//! Center / Corner / Edge graph, then optionally smooths corner positions.

use glam::DVec2;
use log::debug;

use super::halfedge::Subdivision;
use crate::error::Result;
use crate::geometry::{PointBuckets, Rect};
use crate::graph::{push_unique, Center, Corner, Edge};
use crate::map::Map;

/// Build the map graph from the final sites and their subdivision
///
/// One Center is created per site (index = site index). Every half-edge of
/// every face yields one Edge; its end points become Corners, merged with
/// any existing Corner at the same position. All relations are updated
/// symmetrically and never hold duplicates.
///
/// # Errors
///
/// Returns `BrokenHalfEdgeRing` if a face ring does not close.
pub fn build_graph(sites: &[DVec2], subdivision: &Subdivision, bounds: Rect, seed: u32) -> Result<Map> {
    let mut map = Map::empty(bounds, seed);
    map.centers = sites
        .iter()
        .enumerate()
        .map(|(id, &pos)| Center::new(id, pos))
        .collect();

    let mut corner_lookup = PointBuckets::new();

    for face_idx in 0..subdivision.faces.len() {
        for half_edge in subdivision.face_edges(face_idx) {
            let half_edge = half_edge?;
            let p0 = subdivision.vertices[half_edge.origin];
            let p1 = subdivision.vertices[subdivision.destination(half_edge)];

            let v0 = make_corner(&mut map, &mut corner_lookup, p0);
            let v1 = make_corner(&mut map, &mut corner_lookup, p1);
            let d0 = half_edge
                .face
                .map(|f| subdivision.faces[f].site)
                .filter(|&s| s < map.centers.len());
            let d1 = subdivision
                .twin_site(half_edge)
                .filter(|&s| s < map.centers.len());

            link_edge(&mut map, d0, d1, Some(v0), Some(v1), (p0 + p1) * 0.5);
        }
    }

    debug!(
        "[Graph] Built {} centers, {} corners, {} edges",
        map.centers.len(),
        map.corners.len(),
        map.edges.len()
    );

    Ok(map)
}

/// Find or create the corner at `pos`
fn make_corner(map: &mut Map, lookup: &mut PointBuckets, pos: DVec2) -> usize {
    if let Some(id) = lookup.find(pos) {
        return id;
    }
    let id = map.corners.len();
    map.corners.push(Corner::new(id, pos, map.bounds.on_perimeter(pos)));
    lookup.insert(pos, id);
    id
}

/// Register a new edge and update all adjacency relations it implies
fn link_edge(
    map: &mut Map,
    d0: Option<usize>,
    d1: Option<usize>,
    v0: Option<usize>,
    v1: Option<usize>,
    mid_point: DVec2,
) {
    let id = map.edges.len();
    map.edges.push(Edge {
        id,
        d0,
        d1,
        v0,
        v1,
        mid_point,
    });

    // Edges
    for d in [d0, d1].into_iter().flatten() {
        push_unique(&mut map.centers[d].borders, id);
    }
    for v in [v0, v1].into_iter().flatten() {
        push_unique(&mut map.corners[v].protrudes, id);
    }

    // Centers point to centers
    if let Some((a, b)) = d0.zip(d1).filter(|(a, b)| a != b) {
        push_unique(&mut map.centers[a].neighbours, b);
        push_unique(&mut map.centers[b].neighbours, a);
    }

    // Corners point to corners
    if let Some((a, b)) = v0.zip(v1).filter(|(a, b)| a != b) {
        push_unique(&mut map.corners[a].adjacent, b);
        push_unique(&mut map.corners[b].adjacent, a);
    }

    // Centers point to corners and back
    for d in [d0, d1].into_iter().flatten() {
        for v in [v0, v1].into_iter().flatten() {
            push_unique(&mut map.centers[d].corners, v);
            push_unique(&mut map.corners[v].touches, d);
        }
    }
}

/// Move each non-border corner to the average of the centers it touches
///
/// Lengthens short Voronoi edges at the cost of exact duality. New positions
/// are computed from the unmodified map and applied together; edge midpoints
/// are then recomputed.
pub fn improve_corners(map: &mut Map) {
    let new_positions: Vec<DVec2> = map
        .corners
        .iter()
        .map(|q| {
            if q.border || q.touches.is_empty() {
                q.pos
            } else {
                let sum: DVec2 = q.touches.iter().map(|&c| map.centers[c].pos).sum();
                sum / q.touches.len() as f64
            }
        })
        .collect();

    for (corner, pos) in map.corners.iter_mut().zip(new_positions) {
        corner.pos = pos;
    }

    for edge in &mut map.edges {
        match (edge.v0, edge.v1) {
            (Some(a), Some(b)) => edge.mid_point = (map.corners[a].pos + map.corners[b].pos) * 0.5,
            (Some(a), None) | (None, Some(a)) => edge.mid_point = map.corners[a].pos,
            (None, None) => {}
        }
    }
}
