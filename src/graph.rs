//! Graph Entities
//!
//! The island map is a planar graph of three entity kinds, each stored in its
//! own arena on the [`Map`](crate::Map) and linked to the others by index:
//!
//! - [`Center`]: one polygonal region (Voronoi cell), dual to one input site
//! - [`Corner`]: one Voronoi vertex, shared by the regions meeting there
//! - [`Edge`]: one Delaunay/Voronoi dual pair
//!
//! Relation lists store indices into the arenas, never ownership.

use glam::DVec2;

use crate::terrain::Biome;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One polygonal region of the map
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Center {
    /// Index in `Map::centers` (creation order = site order)
    pub id: usize,
    /// Site position
    pub pos: DVec2,
    /// Touches a border corner of the bounding rectangle
    pub border: bool,
    pub ocean: bool,
    /// Ocean, or a lake (enough water corners)
    pub water: bool,
    /// Has at least one ocean and one land neighbour
    pub coast: bool,
    /// Mean corner elevation, in [0, 1] once the pipeline finishes
    pub elevation: f64,
    /// Mean corner moisture, in [0, 1] once the pipeline finishes
    pub moisture: f64,
    /// Assigned by the final classification stage
    pub biome: Option<Biome>,
    /// Adjacent centers
    pub neighbours: Vec<usize>,
    /// Incident edges
    pub borders: Vec<usize>,
    /// Polygon corners
    pub corners: Vec<usize>,
}

impl Center {
    pub fn new(id: usize, pos: DVec2) -> Self {
        Self {
            id,
            pos,
            border: false,
            ocean: false,
            water: false,
            coast: false,
            elevation: 0.0,
            moisture: 0.0,
            biome: None,
            neighbours: Vec::new(),
            borders: Vec::new(),
            corners: Vec::new(),
        }
    }

    /// Check if this center is a neighbour of another center
    #[inline]
    pub fn is_neighbour_of(&self, other_id: usize) -> bool {
        self.neighbours.contains(&other_id)
    }

    /// Land means neither ocean nor lake
    #[inline]
    pub fn is_land(&self) -> bool {
        !self.water
    }
}

/// One vertex of the Voronoi diagram
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Corner {
    /// Index in `Map::corners`
    pub id: usize,
    pub pos: DVec2,
    /// Lies on the bounding rectangle's perimeter
    pub border: bool,
    pub water: bool,
    pub ocean: bool,
    pub coast: bool,
    /// Number of rivers flowing through this corner
    pub river: u32,
    pub elevation: f64,
    pub moisture: f64,
    /// Corners connected to this one by an edge
    pub adjacent: Vec<usize>,
    /// Centers meeting at this corner
    pub touches: Vec<usize>,
    /// Incident edges
    pub protrudes: Vec<usize>,
}

impl Corner {
    pub fn new(id: usize, pos: DVec2, border: bool) -> Self {
        Self {
            id,
            pos,
            border,
            water: false,
            ocean: false,
            coast: false,
            river: 0,
            elevation: 0.0,
            moisture: 0.0,
            adjacent: Vec::new(),
            touches: Vec::new(),
            protrudes: Vec::new(),
        }
    }

    /// Corners on land take part in elevation and moisture redistribution
    #[inline]
    pub fn is_land(&self) -> bool {
        !self.ocean && !self.coast
    }

    /// Lakes and river corners feed moisture propagation; the ocean does not
    #[inline]
    pub fn is_fresh_water(&self) -> bool {
        (self.water || self.river > 0) && !self.ocean
    }
}

/// A Delaunay/Voronoi dual pair
///
/// `d0`/`d1` are the two centers on either side, `v0`/`v1` the two corners
/// at the ends. Either side may be absent at the outer boundary.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Index in `Map::edges`
    pub id: usize,
    pub d0: Option<usize>,
    pub d1: Option<usize>,
    pub v0: Option<usize>,
    pub v1: Option<usize>,
    pub mid_point: DVec2,
}

impl Edge {
    /// Both centers, when this edge separates two regions
    #[inline]
    pub fn centers(&self) -> Option<(usize, usize)> {
        self.d0.zip(self.d1)
    }

    /// Both corners, when the edge has two ends
    #[inline]
    pub fn corners(&self) -> Option<(usize, usize)> {
        self.v0.zip(self.v1)
    }
}

/// Insert `id` unless it is already present
#[inline]
pub(crate) fn push_unique(list: &mut Vec<usize>, id: usize) {
    if !list.contains(&id) {
        list.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_creation() {
        let mut center = Center::new(3, DVec2::new(10.0, 20.0));
        center.neighbours = vec![1, 2];

        assert_eq!(center.id, 3);
        assert!(center.is_neighbour_of(1));
        assert!(!center.is_neighbour_of(99));
        assert!(center.is_land());
        assert_eq!(center.biome, None);
    }

    #[test]
    fn test_corner_classification_helpers() {
        let mut corner = Corner::new(0, DVec2::ZERO, true);
        assert!(corner.border);
        assert!(corner.is_land());
        assert!(!corner.is_fresh_water());

        corner.river = 2;
        assert!(corner.is_fresh_water());

        corner.ocean = true;
        assert!(!corner.is_land());
        assert!(!corner.is_fresh_water());
    }

    #[test]
    fn test_push_unique_skips_duplicates() {
        let mut list = vec![];
        push_unique(&mut list, 1);
        push_unique(&mut list, 1);
        push_unique(&mut list, 2);
        assert_eq!(list, vec![1, 2]);
    }

    #[test]
    fn test_edge_pairs() {
        let edge = Edge {
            id: 0,
            d0: Some(1),
            d1: None,
            v0: Some(4),
            v1: Some(5),
            mid_point: DVec2::ZERO,
        };
        assert_eq!(edge.centers(), None);
        assert_eq!(edge.corners(), Some((4, 5)));
    }
}
