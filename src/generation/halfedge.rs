//! Half-edge planar subdivision
//!
//! The contract between the triangulation provider and the rest of the
//! pipeline. Each Voronoi cell is a face whose boundary is a closed ring of
//! half-edges; every half-edge knows its origin vertex, its twin on the
//! neighbouring face and the next half-edge around its own face.

use glam::DVec2;

use crate::error::{MapError, Result};
use crate::geometry::Rect;

/// One directed element of a face boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    /// Index into `Subdivision::vertices`
    pub origin: usize,
    /// Opposite-direction half-edge
    pub twin: usize,
    /// Next half-edge around the owning face (`None` on the outer face)
    pub next: Option<usize>,
    /// Owning face (`None` on the outer face)
    pub face: Option<usize>,
}

/// One Voronoi cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Index of the site this cell belongs to
    pub site: usize,
    /// Any half-edge of the boundary ring
    pub edge: usize,
}

/// Planar subdivision produced by a [`VoronoiProvider`]
#[derive(Debug, Clone, Default)]
pub struct Subdivision {
    pub vertices: Vec<DVec2>,
    pub half_edges: Vec<HalfEdge>,
    pub faces: Vec<Face>,
}

impl Subdivision {
    /// Lazily walk the boundary ring of `face`
    ///
    /// The walk ends when it comes back to the starting half-edge. A missing
    /// `next` link or a ring that never closes yields a
    /// [`MapError::BrokenHalfEdgeRing`] error as its last item.
    pub fn face_edges(&self, face: usize) -> FaceEdges<'_> {
        let start = self.faces.get(face).map(|f| f.edge);
        FaceEdges {
            subdivision: self,
            face,
            start,
            current: start,
            steps: 0,
            failed: start.is_none(),
            finished: false,
        }
    }

    /// Origin of the half-edge's twin, i.e. the other end of the segment
    #[inline]
    pub fn destination(&self, edge: &HalfEdge) -> usize {
        self.half_edges[edge.twin].origin
    }

    /// Site of the face on the other side of `edge`, if any
    #[inline]
    pub fn twin_site(&self, edge: &HalfEdge) -> Option<usize> {
        self.half_edges[edge.twin].face.map(|f| self.faces[f].site)
    }
}

/// Iterator over the half-edges of one face, see [`Subdivision::face_edges`]
pub struct FaceEdges<'a> {
    subdivision: &'a Subdivision,
    face: usize,
    start: Option<usize>,
    current: Option<usize>,
    steps: usize,
    failed: bool,
    finished: bool,
}

impl<'a> FaceEdges<'a> {
    fn fail(&mut self) -> Option<Result<&'a HalfEdge>> {
        self.finished = true;
        Some(Err(MapError::BrokenHalfEdgeRing { face: self.face }))
    }
}

impl<'a> Iterator for FaceEdges<'a> {
    type Item = Result<&'a HalfEdge>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.failed {
            return self.fail();
        }

        if self.steps > 0 && self.current == self.start {
            self.finished = true;
            return None;
        }
        let Some(edge) = self.current.and_then(|i| self.subdivision.half_edges.get(i)) else {
            return self.fail();
        };
        if self.steps >= self.subdivision.half_edges.len() {
            return self.fail();
        }

        self.steps += 1;
        self.current = edge.next;
        if self.current.is_none() {
            // Report this edge now, the broken link on the following call
            self.failed = true;
        }
        Some(Ok(edge))
    }
}

/// Source of Voronoi subdivisions for a point set
///
/// Implementations must return one face per site they could build a cell
/// for, with `Face::site` indexing into `sites`.
pub trait VoronoiProvider {
    fn subdivide(&self, sites: &[DVec2], bounds: Rect) -> Result<Subdivision>;
}

/// Assemble a subdivision from closed vertex rings, one per face
///
/// Twins are matched through shared vertex pairs; edges without a matching
/// reverse edge get a twin on the outer face.
pub(crate) fn from_rings(vertices: Vec<DVec2>, rings: &[(usize, Vec<usize>)]) -> Subdivision {
    use std::collections::HashMap;

    let mut half_edges: Vec<HalfEdge> = Vec::new();
    let mut faces = Vec::new();
    let mut by_endpoints: HashMap<(usize, usize), usize> = HashMap::new();

    for (site, ring) in rings {
        let mut ring = ring.clone();
        ring.dedup();
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            continue;
        }

        let face = faces.len();
        let first = half_edges.len();
        let n = ring.len();
        for (i, &origin) in ring.iter().enumerate() {
            let id = first + i;
            half_edges.push(HalfEdge {
                origin,
                twin: id,
                next: Some(first + (i + 1) % n),
                face: Some(face),
            });
            by_endpoints.insert((origin, ring[(i + 1) % n]), id);
        }
        faces.push(Face { site: *site, edge: first });
    }

    let inner = half_edges.len();
    for id in 0..inner {
        let origin = half_edges[id].origin;
        let destination = half_edges[half_edges[id].next.unwrap_or(id)].origin;
        if let Some(&twin) = by_endpoints.get(&(destination, origin)) {
            half_edges[id].twin = twin;
        } else {
            let outer = half_edges.len();
            half_edges.push(HalfEdge {
                origin: destination,
                twin: id,
                next: None,
                face: None,
            });
            half_edges[id].twin = outer;
        }
    }

    Subdivision {
        vertices,
        half_edges,
        faces,
    }
}
