//! Spatial indexing for fast position-to-center lookups
//!
//! This module is only available with the `spatial-index` feature.

use std::fmt;

use glam::DVec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// Wrapper around KD-tree for nearest-site queries
///
/// The nearest site to a point is the center whose Voronoi cell contains
/// it, so this answers "which region is under the cursor" in O(log n).
/// Corner smoothing moves cell boundaries slightly, so points right next to
/// an edge may resolve to the neighbouring region.
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
    len: usize,
}

impl SpatialIndex {
    /// Build spatial index from center positions
    ///
    /// # Arguments
    ///
    /// * `positions` - Site positions, indexed by center ID
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_island::*;
    /// use glam::DVec2;
    ///
    /// let sites = vec![DVec2::new(10.0, 10.0), DVec2::new(90.0, 10.0), DVec2::new(50.0, 90.0)];
    /// let index = SpatialIndex::new(&sites);
    /// assert_eq!(index.find_nearest(DVec2::new(80.0, 20.0)), Some(1));
    /// ```
    pub fn new(positions: &[DVec2]) -> Self {
        let points: Vec<[f64; 2]> = positions.iter().map(|p| [p.x, p.y]).collect();

        Self {
            tree: (!points.is_empty()).then(|| ImmutableKdTree::new_from_slice(&points)),
            len: points.len(),
        }
    }

    /// Find the center nearest to a position
    ///
    /// Returns `None` for an empty index.
    pub fn find_nearest(&self, position: DVec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        Some(result.item as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex").field("len", &self.len).finish()
    }
}
