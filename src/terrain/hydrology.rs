//! Ocean, coast and moisture assignment
//!
//! Classifies centers and corners into ocean, lake, coast and land by
//! flood fill from the map border, then spreads moisture outward from
//! fresh water.

use std::collections::VecDeque;

use crate::map::Map;

/// Fraction of water corners that turns a center into a lake
const LAKE_THRESHOLD: f64 = 0.3;

/// Moisture kept per hop away from a source
const MOISTURE_DECAY: f64 = 0.9;

/// Upper bound of the moisture seeded by a river
const MAX_RIVER_MOISTURE: f64 = 3.0;

/// Run the full ocean/coast/land classification
pub fn assign_ocean_coast_and_land(map: &mut Map) {
    mark_border_and_water_centers(map);
    flood_fill_ocean(map);
    assign_coast(map);
    assign_corner_types(map);
}

/// Seed the ocean from the border and flag lake centers
///
/// A center touching a border corner becomes border and ocean (and the
/// corner becomes water). A center is water when it is ocean or when at
/// least 30% of its corners are water.
pub fn mark_border_and_water_centers(map: &mut Map) {
    for p in 0..map.centers.len() {
        let mut num_water = 0;
        for i in 0..map.centers[p].corners.len() {
            let q = map.centers[p].corners[i];
            if map.corners[q].border {
                map.centers[p].border = true;
                map.centers[p].ocean = true;
                map.corners[q].water = true;
            }
            if map.corners[q].water {
                num_water += 1;
            }
        }
        let center = &mut map.centers[p];
        center.water = center.ocean
            || num_water as f64 >= center.corners.len() as f64 * LAKE_THRESHOLD;
    }
}

/// Spread `ocean` from every ocean center to connected water centers
///
/// Never clears a flag, so running it again on its own output changes
/// nothing.
pub fn flood_fill_ocean(map: &mut Map) {
    let mut queue: VecDeque<usize> = map
        .centers
        .iter()
        .filter(|p| p.ocean)
        .map(|p| p.id)
        .collect();

    while let Some(p) = queue.pop_front() {
        for i in 0..map.centers[p].neighbours.len() {
            let r = map.centers[p].neighbours[i];
            let neighbour = &mut map.centers[r];
            if neighbour.water && !neighbour.ocean {
                neighbour.ocean = true;
                queue.push_back(r);
            }
        }
    }
}

/// A center is coast when it has both an ocean and a land neighbour
pub fn assign_coast(map: &mut Map) {
    let coast: Vec<bool> = map
        .centers
        .iter()
        .map(|p| {
            let num_ocean = p.neighbours.iter().filter(|&&r| map.centers[r].ocean).count();
            let num_land = p.neighbours.iter().filter(|&&r| !map.centers[r].water).count();
            num_ocean > 0 && num_land > 0
        })
        .collect();

    for (center, coast) in map.centers.iter_mut().zip(coast) {
        center.coast = coast;
    }
}

/// Derive corner flags from the centers they touch
///
/// Ocean if every touching center is ocean, coast if they mix ocean and
/// land, water if border or if some touching center is water and the
/// corner is not coast.
pub fn assign_corner_types(map: &mut Map) {
    for q in 0..map.corners.len() {
        let touches = &map.corners[q].touches;
        let num_ocean = touches.iter().filter(|&&p| map.centers[p].ocean).count();
        let num_land = touches.iter().filter(|&&p| !map.centers[p].water).count();
        let count = touches.len();

        let corner = &mut map.corners[q];
        corner.ocean = num_ocean == count;
        corner.coast = num_ocean > 0 && num_land > 0;
        corner.water = corner.border || (num_land != count && !corner.coast);
    }
}

/// Spread moisture from fresh water through the corner graph
///
/// Rivers seed `min(3, 0.2·river)`, lakes seed 1 and every other corner
/// starts dry. Each hop keeps 90% of the value and a corner is re-queued
/// only when its moisture increases. Ocean and coast corners end at 1.
pub fn assign_corner_moisture(map: &mut Map) {
    let mut queue = VecDeque::new();

    for corner in &mut map.corners {
        if corner.is_fresh_water() {
            corner.moisture = if corner.river > 0 {
                MAX_RIVER_MOISTURE.min(0.2 * corner.river as f64)
            } else {
                1.0
            };
            queue.push_back(corner.id);
        } else {
            corner.moisture = 0.0;
        }
    }

    while let Some(q) = queue.pop_front() {
        let moisture = map.corners[q].moisture * MOISTURE_DECAY;
        for i in 0..map.corners[q].adjacent.len() {
            let r = map.corners[q].adjacent[i];
            if moisture > map.corners[r].moisture {
                map.corners[r].moisture = moisture;
                queue.push_back(r);
            }
        }
    }

    for corner in &mut map.corners {
        if corner.ocean || corner.coast {
            corner.moisture = 1.0;
        }
    }
}

/// Remap the given corners' moisture by rank onto [0, 1] linearly
pub fn redistribute_moisture(map: &mut Map, corners: &[usize]) {
    let mut sorted = corners.to_vec();
    sorted.sort_by(|&a, &b| map.corners[a].moisture.total_cmp(&map.corners[b].moisture));

    let last = sorted.len().saturating_sub(1);
    for (rank, &id) in sorted.iter().enumerate() {
        map.corners[id].moisture = if last == 0 { 0.0 } else { rank as f64 / last as f64 };
    }
}

/// Set each center's moisture to the mean of its corners
///
/// Corner values above 1 are clamped in place first. Centers without
/// corners keep their current value.
pub fn assign_center_moisture(map: &mut Map) {
    for p in 0..map.centers.len() {
        let count = map.centers[p].corners.len();
        if count == 0 {
            continue;
        }
        let mut sum = 0.0;
        for i in 0..count {
            let corner = &mut map.corners[map.centers[p].corners[i]];
            corner.moisture = corner.moisture.min(1.0);
            sum += corner.moisture;
        }
        map.centers[p].moisture = sum / count as f64;
    }
}
