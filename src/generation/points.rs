//! Site point sampling
//!
//! Produces the initial sites inside the map rectangle. All variants draw
//! from the generator passed in, so the same seed yields the same sites.
//!
//! # Variants
//!
//! - Random: uniform over the rectangle
//! - Square: regular grid at cell centers
//! - Hexagon: grid with every odd column shifted by half a cell
//! - PoissonDisc: Bridson's algorithm, no two points closer than `radius`

use glam::DVec2;
use rand::Rng;
use std::f64::consts::TAU;

use crate::config::PointSelector;

/// Candidates tried around each active Poisson-disc sample before retiring it
const POISSON_ATTEMPTS: usize = 30;

/// Generate site points for the given selector
///
/// # Arguments
///
/// * `selector` - Sampling strategy
/// * `width`, `height` - Rectangle dimensions (origin at 0,0)
/// * `count` - Requested sites (grid variants use `floor(sqrt(count))²`)
/// * `radius` - Minimum distance for Poisson-disc sampling
/// * `rng` - Seeded generator
pub fn generate_points<R: Rng>(
    selector: PointSelector,
    width: f64,
    height: f64,
    count: usize,
    radius: f64,
    rng: &mut R,
) -> Vec<DVec2> {
    match selector {
        PointSelector::Random => random_points(width, height, count, rng),
        PointSelector::Square => grid_points(width, height, count, false),
        PointSelector::Hexagon => grid_points(width, height, count, true),
        PointSelector::PoissonDisc => poisson_disc_points(width, height, radius, rng),
    }
}

fn random_points<R: Rng>(width: f64, height: f64, count: usize, rng: &mut R) -> Vec<DVec2> {
    (0..count)
        .map(|_| DVec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height)))
        .collect()
}

fn grid_points(width: f64, height: f64, count: usize, offset_columns: bool) -> Vec<DVec2> {
    let side = (count as f64).sqrt() as usize;
    let n = side as f64;
    let mut points = Vec::with_capacity(side * side);

    for x in 0..side {
        let shift = if offset_columns {
            0.25 + 0.5 * (x % 2) as f64
        } else {
            0.5
        };
        for y in 0..side {
            points.push(DVec2::new(
                (0.5 + x as f64) / n * width,
                (shift + y as f64) / n * height,
            ));
        }
    }

    points
}

fn poisson_disc_points<R: Rng>(width: f64, height: f64, radius: f64, rng: &mut R) -> Vec<DVec2> {
    let cell_size = radius / std::f64::consts::SQRT_2;
    let cols = (width / cell_size).ceil().max(1.0) as usize;
    let rows = (height / cell_size).ceil().max(1.0) as usize;
    let mut grid: Vec<Option<usize>> = vec![None; cols * rows];

    let cell_of = |p: DVec2| -> (usize, usize) {
        (
            ((p.x / cell_size) as usize).min(cols - 1),
            ((p.y / cell_size) as usize).min(rows - 1),
        )
    };

    let mut points: Vec<DVec2> = Vec::new();
    let mut active: Vec<usize> = Vec::new();

    let first = DVec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
    let (cx, cy) = cell_of(first);
    grid[cy * cols + cx] = Some(0);
    points.push(first);
    active.push(0);

    while !active.is_empty() {
        let slot = rng.gen_range(0..active.len());
        let origin = points[active[slot]];
        let mut placed = false;

        for _ in 0..POISSON_ATTEMPTS {
            let angle = rng.gen_range(0.0..TAU);
            let distance = rng.gen_range(radius..2.0 * radius);
            let candidate = origin + DVec2::new(angle.cos(), angle.sin()) * distance;
            if candidate.x < 0.0 || candidate.x >= width || candidate.y < 0.0 || candidate.y >= height {
                continue;
            }

            let (gx, gy) = cell_of(candidate);
            let too_close = (gy.saturating_sub(2)..(gy + 3).min(rows))
                .flat_map(|y| (gx.saturating_sub(2)..(gx + 3).min(cols)).map(move |x| (x, y)))
                .filter_map(|(x, y)| grid[y * cols + x])
                .any(|i| points[i].distance(candidate) < radius);
            if too_close {
                continue;
            }

            grid[gy * cols + gx] = Some(points.len());
            active.push(points.len());
            points.push(candidate);
            placed = true;
            break;
        }

        if !placed {
            active.swap_remove(slot);
        }
    }

    points
}
