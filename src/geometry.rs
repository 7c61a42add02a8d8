//! Planar geometry helpers: bounding rectangle, clipping and point deduplication

use glam::DVec2;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance for coincident points, border detection and clipping
pub const EPSILON: f64 = 1e-6;

/// Axis-aligned bounding rectangle of the map
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Inclusive containment test, tolerant by `EPSILON`
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.left() - EPSILON
            && p.x <= self.right() + EPSILON
            && p.y >= self.bottom() - EPSILON
            && p.y <= self.top() + EPSILON
    }

    /// Whether `p` lies on one of the four rectangle edges
    pub fn on_perimeter(&self, p: DVec2) -> bool {
        if !self.contains(p) {
            return false;
        }
        (p.x - self.left()).abs() <= EPSILON
            || (p.x - self.right()).abs() <= EPSILON
            || (p.y - self.bottom()).abs() <= EPSILON
            || (p.y - self.top()).abs() <= EPSILON
    }

    /// Point where the segment from `inside` toward `outside` leaves the rectangle
    pub fn exit_point(&self, inside: DVec2, outside: DVec2) -> DVec2 {
        let d = outside - inside;
        let mut t: f64 = 1.0;

        if d.x > 0.0 {
            t = t.min((self.right() - inside.x) / d.x);
        } else if d.x < 0.0 {
            t = t.min((self.left() - inside.x) / d.x);
        }
        if d.y > 0.0 {
            t = t.min((self.top() - inside.y) / d.y);
        } else if d.y < 0.0 {
            t = t.min((self.bottom() - inside.y) / d.y);
        }

        // Snap onto the perimeter so the border test sees an exact hit
        let hit = inside + d * t.max(0.0);
        DVec2::new(
            hit.x.clamp(self.left(), self.right()),
            hit.y.clamp(self.bottom(), self.top()),
        )
    }

    /// Clip a segment against the rectangle
    ///
    /// Returns `None` when both endpoints are outside. A segment with exactly
    /// one outside endpoint gets that endpoint replaced by the boundary hit.
    pub fn clip_segment(&self, p1: DVec2, p2: DVec2) -> Option<(DVec2, DVec2)> {
        match (self.contains(p1), self.contains(p2)) {
            (true, true) => Some((p1, p2)),
            (true, false) => Some((p1, self.exit_point(p1, p2))),
            (false, true) => Some((self.exit_point(p2, p1), p2)),
            (false, false) => None,
        }
    }
}

/// Average of a set of points, `None` for an empty set
pub fn centroid<I>(points: I) -> Option<DVec2>
where
    I: IntoIterator<Item = DVec2>,
{
    let mut sum = DVec2::ZERO;
    let mut count = 0usize;
    for p in points {
        sum += p;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

/// Spatial lookup for coincident points
///
/// Points are bucketed by their floored x-coordinate; a lookup scans the
/// buckets at x-1, x and x+1 and accepts any stored point within `EPSILON`.
#[derive(Debug, Default)]
pub struct PointBuckets {
    buckets: HashMap<i64, Vec<(DVec2, usize)>>,
}

impl PointBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn key(p: DVec2) -> i64 {
        p.x.floor() as i64
    }

    /// Find the id of a stored point coinciding with `p`
    pub fn find(&self, p: DVec2) -> Option<usize> {
        let key = Self::key(p);
        (key - 1..=key + 1)
            .filter_map(|k| self.buckets.get(&k))
            .flatten()
            .find(|(q, _)| q.distance(p) < EPSILON)
            .map(|&(_, id)| id)
    }

    pub fn insert(&mut self, p: DVec2, id: usize) {
        self.buckets.entry(Self::key(p)).or_default().push((p, id));
    }

    /// Return the id of the point at `p`, registering `make_id()` if none exists
    pub fn find_or_insert_with<F>(&mut self, p: DVec2, make_id: F) -> usize
    where
        F: FnOnce() -> usize,
    {
        if let Some(id) = self.find(p) {
            return id;
        }
        let id = make_id();
        self.insert(p, id);
        id
    }
}
