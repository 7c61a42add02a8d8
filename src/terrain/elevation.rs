//! Elevation assignment
//!
//! Corners are raised by a multi-source relaxation starting at the map
//! border, then remapped by rank so that land area concentrates at low
//! altitudes. Centers take the mean of their corners.

use std::collections::VecDeque;

use log::warn;
use rand::Rng;

use super::IslandShape;
use crate::map::Map;

/// Cost of one hop that touches water
const WATER_STEP: f64 = 0.01;

/// Extra cost of a hop between two land corners
const LAND_STEP: f64 = 1.0;

/// Larger values push more of the land toward low elevations
const SCALE_FACTOR: f64 = 1.1;

/// Mark every corner outside the island mask as water
pub fn assign_corner_water(map: &mut Map, shape: &IslandShape) {
    for corner in &mut map.corners {
        corner.water = !shape.is_inside(corner.pos);
    }
}

/// Raise corners by distance from the border
///
/// Border corners start at 0 and every other corner at +inf. A corner is
/// re-queued whenever a cheaper path reaches it, so the result has no local
/// minima: every non-border corner has a strictly lower neighbour. With
/// `jitter`, land-to-land hops get a random extra cost in [0, 1).
pub fn assign_corner_elevations<R: Rng>(map: &mut Map, rng: &mut R, jitter: bool) {
    let mut queue = VecDeque::new();

    for corner in &mut map.corners {
        if corner.border {
            corner.elevation = 0.0;
            queue.push_back(corner.id);
        } else {
            corner.elevation = f64::INFINITY;
        }
    }

    while let Some(q) = queue.pop_front() {
        for i in 0..map.corners[q].adjacent.len() {
            let s = map.corners[q].adjacent[i];
            let mut elevation = map.corners[q].elevation + WATER_STEP;
            if !map.corners[q].water && !map.corners[s].water {
                elevation += LAND_STEP;
                if jitter {
                    elevation += rng.gen::<f64>();
                }
            }
            if elevation < map.corners[s].elevation {
                map.corners[s].elevation = elevation;
                queue.push_back(s);
            }
        }
    }

    let unreachable = map
        .corners
        .iter()
        .filter(|q| q.elevation.is_infinite())
        .count();
    if unreachable > 0 {
        let ceiling = map
            .corners
            .iter()
            .map(|q| q.elevation)
            .filter(|e| e.is_finite())
            .fold(0.0, f64::max);
        warn!(
            "[Elevation] {} corners unreachable from the border, clamping to {:.2}",
            unreachable, ceiling
        );
        for corner in map.corners.iter_mut().filter(|q| q.elevation.is_infinite()) {
            corner.elevation = ceiling;
        }
    }
}

/// Remap the given corners' elevations by rank onto [0, 1]
///
/// Rank `i` of `N` targets the cumulative fraction `y = i/(N-1)` and gets
/// `x = sqrt(1.1) - sqrt(1.1·(1-y))`, capped at 1. Ties keep their input
/// order.
pub fn redistribute_elevations(map: &mut Map, corners: &[usize]) {
    let mut sorted = corners.to_vec();
    sorted.sort_by(|&a, &b| map.corners[a].elevation.total_cmp(&map.corners[b].elevation));

    let last = sorted.len().saturating_sub(1);
    for (rank, &id) in sorted.iter().enumerate() {
        let y = if last == 0 { 0.0 } else { rank as f64 / last as f64 };
        let x = SCALE_FACTOR.sqrt() - (SCALE_FACTOR * (1.0 - y)).sqrt();
        map.corners[id].elevation = x.min(1.0);
    }
}

/// Pin ocean and coast corners to sea level
pub fn flatten_ocean_elevations(map: &mut Map) {
    for corner in &mut map.corners {
        if corner.ocean || corner.coast {
            corner.elevation = 0.0;
        }
    }
}

/// Set each center's elevation to the mean of its corners
///
/// Centers without corners keep their current value.
pub fn assign_center_elevations(map: &mut Map) {
    for center in &mut map.centers {
        if center.corners.is_empty() {
            continue;
        }
        let sum: f64 = center.corners.iter().map(|&q| map.corners[q].elevation).sum();
        center.elevation = sum / center.corners.len() as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::graph::{Center, Corner};
    use glam::DVec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Corners on a line: 0 (border) - 1 - 2 - 3 - 4 (border)
    fn chain_map() -> Map {
        let mut map = Map::empty(Rect::new(0.0, 0.0, 4.0, 1.0), 0);
        for i in 0..5 {
            let mut q = Corner::new(i, DVec2::new(i as f64, 0.5), i == 0 || i == 4);
            if i > 0 {
                q.adjacent.push(i - 1);
            }
            if i < 4 {
                q.adjacent.push(i + 1);
            }
            map.corners.push(q);
        }
        map
    }

    #[test]
    fn test_elevation_grows_away_from_border() {
        let mut map = chain_map();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assign_corner_elevations(&mut map, &mut rng, false);

        let elevations: Vec<f64> = map.corners.iter().map(|q| q.elevation).collect();
        assert_eq!(elevations[0], 0.0);
        assert_eq!(elevations[4], 0.0);
        assert!((elevations[1] - 1.01).abs() < 1e-12);
        assert!((elevations[2] - 2.02).abs() < 1e-12);
        assert!((elevations[3] - 1.01).abs() < 1e-12);
    }

    #[test]
    fn test_no_local_minima_on_generated_graph() {
        use crate::config::PointSelector;
        use crate::generation::{build_graph, generate_points, VoronoiProvider, VoronoiceProvider};

        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let sites = generate_points(PointSelector::Random, 100.0, 100.0, 200, 0.0, &mut rng);
        let sub = VoronoiceProvider.subdivide(&sites, bounds).unwrap();
        let mut map = build_graph(&sites, &sub, bounds, 0).unwrap();

        let shape = IslandShape::radial(100.0, 100.0, &mut rng);
        assign_corner_water(&mut map, &shape);
        assign_corner_elevations(&mut map, &mut rng, true);

        for q in map.corners.iter().filter(|q| !q.border) {
            let lowest = q
                .adjacent
                .iter()
                .map(|&s| map.corners[s].elevation)
                .fold(f64::INFINITY, f64::min);
            assert!(lowest < q.elevation, "corner {} is a local minimum", q.id);
        }
    }

    #[test]
    fn test_water_hops_are_cheap() {
        let mut map = chain_map();
        map.corners[1].water = true;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assign_corner_elevations(&mut map, &mut rng, false);

        assert!((map.corners[1].elevation - 0.01).abs() < 1e-12);
        // 1 -> 2 leaves a water corner, so it stays cheap too
        assert!((map.corners[2].elevation - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_jitter_only_adds_cost() {
        let mut plain = chain_map();
        let mut jittered = chain_map();
        assign_corner_elevations(&mut plain, &mut ChaCha8Rng::seed_from_u64(1), false);
        assign_corner_elevations(&mut jittered, &mut ChaCha8Rng::seed_from_u64(1), true);

        for (a, b) in plain.corners.iter().zip(&jittered.corners) {
            assert!(b.elevation >= a.elevation);
            assert!(b.elevation < a.elevation + 2.0);
        }
    }

    #[test]
    fn test_unreachable_corner_is_clamped() {
        let mut map = chain_map();
        map.corners.push(Corner::new(5, DVec2::new(2.0, 0.9), false));
        assign_corner_elevations(&mut map, &mut ChaCha8Rng::seed_from_u64(0), false);
        assert!(map.corners[5].elevation.is_finite());
    }

    #[test]
    fn test_redistribution_curve() {
        let mut map = chain_map();
        for (i, q) in map.corners.iter_mut().enumerate() {
            q.elevation = [5.0, 1.0, 3.0, 2.0, 4.0][i];
        }
        redistribute_elevations(&mut map, &[0, 1, 2, 3, 4]);

        // Lowest rank maps to 0, highest to sqrt(1.1) capped at 1
        assert_eq!(map.corners[1].elevation, 0.0);
        assert_eq!(map.corners[0].elevation, 1.0);
        let y: f64 = 0.5;
        let expected = 1.1f64.sqrt() - (1.1 * (1.0 - y)).sqrt();
        assert!((map.corners[2].elevation - expected).abs() < 1e-12);
        for q in &map.corners {
            assert!((0.0..=1.0).contains(&q.elevation));
        }
    }

    #[test]
    fn test_redistribute_single_corner() {
        let mut map = chain_map();
        map.corners[2].elevation = 7.0;
        redistribute_elevations(&mut map, &[2]);
        assert_eq!(map.corners[2].elevation, 0.0);
    }

    #[test]
    fn test_center_elevation_is_corner_mean() {
        let mut map = chain_map();
        for (i, q) in map.corners.iter_mut().enumerate() {
            q.elevation = i as f64 * 0.1;
        }
        let mut center = Center::new(0, DVec2::new(1.0, 0.5));
        center.corners = vec![0, 1, 2];
        map.centers.push(center);
        let mut lonely = Center::new(1, DVec2::new(3.0, 0.5));
        lonely.elevation = 0.42;
        map.centers.push(lonely);

        assign_center_elevations(&mut map);
        assert!((map.centers[0].elevation - 0.1).abs() < 1e-12);
        assert_eq!(map.centers[1].elevation, 0.42);
    }

    #[test]
    fn test_flatten_ocean_elevations() {
        let mut map = chain_map();
        for q in &mut map.corners {
            q.elevation = 0.5;
        }
        map.corners[0].ocean = true;
        map.corners[1].coast = true;
        flatten_ocean_elevations(&mut map);
        assert_eq!(map.corners[0].elevation, 0.0);
        assert_eq!(map.corners[1].elevation, 0.0);
        assert_eq!(map.corners[2].elevation, 0.5);
    }
}
