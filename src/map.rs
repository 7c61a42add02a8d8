//! Island map aggregate and generation pipeline

use std::collections::HashSet;
use std::time::Instant;

use glam::DVec2;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{MapConfig, PointSelector};
use crate::error::{MapError, Result};
use crate::generation::{
    build_graph, generate_points, improve_corners, lloyd_relaxation_with_options, LloydOptions,
    VoronoiProvider, VoronoiceProvider,
};
use crate::geometry::Rect;
use crate::graph::{Center, Corner, Edge};
use crate::terrain::{
    assign_biomes, assign_center_elevations, assign_center_moisture, assign_corner_elevations,
    assign_corner_moisture, assign_corner_water, assign_ocean_coast_and_land,
    flatten_ocean_elevations, redistribute_elevations, redistribute_moisture, Biome, IslandShape,
};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Random stream reserved for the island shape parameters
const SHAPE_STREAM: u64 = 1;

/// A generated island map
///
/// Owns the three entity arenas; every relation inside them is an index
/// into one of these lists.
///
/// # Examples
///
/// ```
/// use rust_voronoi_island::*;
///
/// let config = MapConfigBuilder::new()
///     .seed(42)
///     .region_count(200)
///     .build()
///     .unwrap();
///
/// let map = Map::generate(config).unwrap().expect("enough sites");
/// println!("Generated {} regions", map.centers.len());
///
/// if let Some(center) = map.center(0) {
///     println!("Region 0 biome: {:?}", center.biome);
/// }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Map {
    /// Regions, indexed by site
    pub centers: Vec<Center>,
    /// Voronoi vertices
    pub corners: Vec<Corner>,
    /// Dual edges, one per half-edge traversal
    pub edges: Vec<Edge>,
    /// Rectangle every corner lies within
    pub bounds: Rect,
    /// Seed the map was generated from
    pub seed: u32,
    /// Distinct biomes in order of first appearance
    pub biomes: Vec<Biome>,

    #[cfg(feature = "spatial-index")]
    #[cfg_attr(feature = "serde", serde(skip))]
    spatial_index: Option<SpatialIndex>,
}

impl Map {
    /// Map with no entities
    pub fn empty(bounds: Rect, seed: u32) -> Self {
        Self {
            centers: Vec::new(),
            corners: Vec::new(),
            edges: Vec::new(),
            bounds,
            seed,
            biomes: Vec::new(),
            #[cfg(feature = "spatial-index")]
            spatial_index: None,
        }
    }

    /// Generate a map with the configured island function and the default
    /// Voronoi provider
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the sampler produced fewer than 3 sites
    ///
    /// # Errors
    ///
    /// Propagates provider failures and half-edge integrity errors.
    pub fn generate(config: MapConfig) -> Result<Option<Self>> {
        let mut shape_rng = ChaCha8Rng::seed_from_u64(config.seed as u64);
        shape_rng.set_stream(SHAPE_STREAM);
        let shape = IslandShape::new(config.island_function, config.width, config.height, &mut shape_rng);
        Self::generate_with(config, &shape, &VoronoiceProvider)
    }

    /// Generate a map with a custom island shape and Voronoi provider
    ///
    /// # Pipeline
    ///
    /// 1. Sample sites and relax them (grid layouts skip relaxation)
    /// 2. Build the graph and smooth corners
    /// 3. Mark water, raise elevation from the border, classify ocean/coast
    /// 4. Redistribute land elevation, flatten the sea, average per center
    /// 5. Spread, redistribute and average moisture
    /// 6. Assign biomes
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_island::*;
    /// use rand::SeedableRng;
    ///
    /// let config = MapConfig::default();
    /// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
    /// let shape = IslandShape::noise(config.width, config.height, &mut rng);
    /// let map = Map::generate_with(config, &shape, &VoronoiceProvider).unwrap();
    /// assert!(map.is_some());
    /// ```
    pub fn generate_with<P: VoronoiProvider + ?Sized>(
        config: MapConfig,
        shape: &IslandShape,
        provider: &P,
    ) -> Result<Option<Self>> {
        if !(config.width > 0.0 && config.height > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "dimensions must be positive (got {} x {})",
                config.width, config.height
            )));
        }
        if config.point_selector == PointSelector::PoissonDisc && !(config.poisson_radius > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "poisson radius must be positive (got {})",
                config.poisson_radius
            )));
        }

        info!("[Map] Generating with seed {}", config.seed);
        let total_start = Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed as u64);
        let bounds = Rect::new(0.0, 0.0, config.width, config.height);

        // Sites
        let stage = Instant::now();
        let points = generate_points(
            config.point_selector,
            config.width,
            config.height,
            config.region_count,
            config.poisson_radius,
            &mut rng,
        );
        if points.len() < 3 {
            debug!("[Map] Only {} sites sampled, nothing to build", points.len());
            return Ok(None);
        }
        let options = LloydOptions {
            max_iterations: config.effective_relaxation_count(),
            convergence_threshold: config.relaxation_convergence,
        };
        let points = lloyd_relaxation_with_options(points, bounds, options, provider)?;
        debug!(
            "[Map] {} {} sites ready in {:?}",
            points.len(),
            config.point_selector.name(),
            stage.elapsed()
        );

        // Graph
        let stage = Instant::now();
        let subdivision = provider.subdivide(&points, bounds)?;
        let mut map = build_graph(&points, &subdivision, bounds, config.seed)?;
        improve_corners(&mut map);
        debug!("[Map] Graph built in {:?}", stage.elapsed());

        // Elevation
        let stage = Instant::now();
        assign_corner_water(&mut map, shape);
        assign_corner_elevations(&mut map, &mut rng, config.point_selector.is_grid());
        assign_ocean_coast_and_land(&mut map);
        let land = map.land_corners();
        redistribute_elevations(&mut map, &land);
        flatten_ocean_elevations(&mut map);
        assign_center_elevations(&mut map);
        debug!("[Map] Elevation assigned in {:?}", stage.elapsed());

        // Moisture and biomes
        let stage = Instant::now();
        assign_corner_moisture(&mut map);
        redistribute_moisture(&mut map, &land);
        assign_center_moisture(&mut map);
        assign_biomes(&mut map);
        debug!("[Map] Moisture and biomes assigned in {:?}", stage.elapsed());

        #[cfg(feature = "spatial-index")]
        map.rebuild_spatial_index();

        let ocean = map.centers.iter().filter(|p| p.ocean).count();
        info!(
            "[Map] Seed {}: {} centers ({} ocean), {} corners, {} edges, {} biomes in {:?}",
            config.seed,
            map.centers.len(),
            ocean,
            map.corners.len(),
            map.edges.len(),
            map.biomes.len(),
            total_start.elapsed()
        );

        Ok(Some(map))
    }

    /// Whether the map has no regions
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    #[inline]
    pub fn center(&self, id: usize) -> Option<&Center> {
        self.centers.get(id)
    }

    #[inline]
    pub fn corner(&self, id: usize) -> Option<&Corner> {
        self.corners.get(id)
    }

    #[inline]
    pub fn edge(&self, id: usize) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Neighbouring center IDs, or an empty slice for an invalid ID
    pub fn neighbours(&self, center_id: usize) -> &[usize] {
        self.centers
            .get(center_id)
            .map(|p| p.neighbours.as_slice())
            .unwrap_or(&[])
    }

    /// Find centers within a given hop count from a center (BFS)
    ///
    /// # Arguments
    ///
    /// * `center_id` - Starting center ID
    /// * `hops` - Maximum number of hops (0 = just the starting center)
    ///
    /// # Returns
    ///
    /// Center IDs in discovery order, starting with `center_id`.
    /// Returns empty vec if `center_id` is invalid.
    pub fn centers_within_hops(&self, center_id: usize, hops: usize) -> Vec<usize> {
        if center_id >= self.centers.len() {
            return vec![];
        }

        let mut visited = HashSet::new();
        let mut found = vec![center_id];
        let mut current = vec![center_id];
        visited.insert(center_id);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &id in &current {
                for &neighbour in self.neighbours(id) {
                    if visited.insert(neighbour) {
                        next.push(neighbour);
                    }
                }
            }
            found.extend_from_slice(&next);
            current = next;
        }

        found
    }

    /// IDs of corners that are neither ocean nor coast
    pub fn land_corners(&self) -> Vec<usize> {
        self.corners
            .iter()
            .filter(|q| q.is_land())
            .map(|q| q.id)
            .collect()
    }

    /// Number of centers per biome, in the order of `biomes`
    pub fn biome_counts(&self) -> Vec<(Biome, usize)> {
        self.biomes
            .iter()
            .map(|&biome| {
                let count = self
                    .centers
                    .iter()
                    .filter(|p| p.biome == Some(biome))
                    .count();
                (biome, count)
            })
            .collect()
    }

    /// Corner IDs of a center sorted counter-clockwise around its site
    ///
    /// # Errors
    ///
    /// Returns `CenterNotFound` for an invalid ID.
    pub fn sorted_corners(&self, center_id: usize) -> Result<Vec<usize>> {
        let center = self
            .centers
            .get(center_id)
            .ok_or(MapError::CenterNotFound(center_id))?;

        let mut corners = center.corners.clone();
        corners.sort_by(|&a, &b| {
            let ta = angle_around(center.pos, self.corners[a].pos);
            let tb = angle_around(center.pos, self.corners[b].pos);
            ta.total_cmp(&tb)
        });
        Ok(corners)
    }

    /// Polygon outline of a center, see [`Map::sorted_corners`]
    pub fn center_polygon(&self, center_id: usize) -> Result<Vec<DVec2>> {
        Ok(self
            .sorted_corners(center_id)?
            .into_iter()
            .map(|q| self.corners[q].pos)
            .collect())
    }

    /// Rebuild the nearest-site index from the current center positions
    #[cfg(feature = "spatial-index")]
    pub fn rebuild_spatial_index(&mut self) {
        let positions: Vec<DVec2> = self.centers.iter().map(|p| p.pos).collect();
        self.spatial_index = Some(SpatialIndex::new(&positions));
    }

    /// Find the center whose region contains a position
    ///
    /// Returns `None` if the index has not been built (hand-assembled or
    /// deserialized maps) or the map is empty.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_island::*;
    /// # let map = Map::generate(MapConfig::default()).unwrap().unwrap();
    /// let site = map.centers[5].pos;
    /// assert_eq!(map.find_center_at(site), Some(5));
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_center_at(&self, position: DVec2) -> Option<usize> {
        self.spatial_index.as_ref()?.find_nearest(position)
    }
}

/// Polar angle of `point` as seen from `origin`
#[inline]
fn angle_around(origin: DVec2, point: DVec2) -> f64 {
    let d = point - origin;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IslandFunction, MapConfigBuilder, PointSelector};
    use crate::generation::Subdivision;

    fn generate(seed: u32, selector: PointSelector, function: IslandFunction) -> Map {
        let config = MapConfigBuilder::new()
            .seed(seed)
            .point_selector(selector)
            .region_count(300)
            .island_function(function)
            .build()
            .unwrap();
        Map::generate(config).unwrap().unwrap()
    }

    fn default_map() -> Map {
        generate(42, PointSelector::Random, IslandFunction::Radial)
    }

    fn assert_no_duplicates(list: &[usize], own: Option<usize>) {
        let unique: HashSet<usize> = list.iter().copied().collect();
        assert_eq!(unique.len(), list.len(), "duplicate in {:?}", list);
        if let Some(own) = own {
            assert!(!list.contains(&own), "self-reference in {:?}", list);
        }
    }

    #[test]
    fn test_map_generation() {
        let map = default_map();
        assert_eq!(map.centers.len(), 300);
        assert!(!map.corners.is_empty());
        assert!(!map.edges.is_empty());
        assert!(!map.is_empty());
        assert_eq!(map.seed, 42);
    }

    #[test]
    fn test_graph_closure() {
        let map = default_map();
        for edge in &map.edges {
            assert!(edge.d0.is_some() || edge.d1.is_some());
            if let Some((a, b)) = edge.centers() {
                if a != b {
                    assert!(map.centers[a].is_neighbour_of(b));
                    assert!(map.centers[b].is_neighbour_of(a));
                }
            }
            if let Some((a, b)) = edge.corners() {
                if a != b {
                    assert!(map.corners[a].adjacent.contains(&b));
                    assert!(map.corners[b].adjacent.contains(&a));
                }
            }
        }
        for p in &map.centers {
            for &q in &p.corners {
                assert!(map.corners[q].touches.contains(&p.id));
            }
        }
    }

    #[test]
    fn test_no_duplicate_adjacency() {
        let map = default_map();
        for p in &map.centers {
            assert_no_duplicates(&p.neighbours, Some(p.id));
            assert_no_duplicates(&p.borders, None);
            assert_no_duplicates(&p.corners, None);
        }
        for q in &map.corners {
            assert_no_duplicates(&q.adjacent, Some(q.id));
            assert_no_duplicates(&q.touches, None);
            assert_no_duplicates(&q.protrudes, None);
        }
    }

    #[test]
    fn test_border_corners_lie_on_perimeter() {
        let map = default_map();
        assert!(map.corners.iter().any(|q| q.border));
        for q in &map.corners {
            assert_eq!(q.border, map.bounds.on_perimeter(q.pos));
            assert!(map.bounds.contains(q.pos));
        }
    }

    #[test]
    fn test_values_in_range() {
        for function in [IslandFunction::Radial, IslandFunction::Noise] {
            let map = generate(7, PointSelector::Random, function);
            for q in &map.corners {
                assert!((0.0..=1.0).contains(&q.elevation), "elevation {}", q.elevation);
                assert!((0.0..=1.0).contains(&q.moisture), "moisture {}", q.moisture);
            }
            for p in &map.centers {
                assert!((0.0..=1.0).contains(&p.elevation));
                assert!((0.0..=1.0).contains(&p.moisture));
                assert!(p.biome.is_some());
            }
        }
    }

    #[test]
    fn test_water_biomes_match_land_flag() {
        let map = default_map();
        for p in &map.centers {
            let biome = p.biome.unwrap();
            assert_eq!(biome.is_water(), !p.is_land(), "center {} is {}", p.id, biome);
        }
    }

    #[test]
    fn test_border_centers_are_ocean() {
        let map = default_map();
        for p in map.centers.iter().filter(|p| p.border) {
            assert!(p.ocean && p.water);
            assert_eq!(p.biome, Some(Biome::Ocean));
        }
        for q in map.corners.iter().filter(|q| q.ocean || q.coast) {
            assert_eq!(q.elevation, 0.0);
            assert_eq!(q.moisture, 1.0);
        }
    }

    #[test]
    fn test_island_has_land_and_sea() {
        let map = default_map();
        assert!(map.centers.iter().any(|p| p.ocean));
        assert!(map.centers.iter().any(|p| !p.water));
        assert!(map.biomes.len() > 2);
        let counted: usize = map.biome_counts().iter().map(|(_, n)| n).sum();
        assert_eq!(counted, map.centers.len());
    }

    #[test]
    fn test_determinism() {
        let a = generate(1234, PointSelector::PoissonDisc, IslandFunction::Noise);
        let b = generate(1234, PointSelector::PoissonDisc, IslandFunction::Noise);

        assert_eq!(a.centers, b.centers);
        assert_eq!(a.corners, b.corners);
        assert_eq!(a.edges, b.edges);
        assert_eq!(a.biomes, b.biomes);
    }

    #[test]
    fn test_grid_selectors() {
        for selector in [PointSelector::Square, PointSelector::Hexagon] {
            let map = generate(3, selector, IslandFunction::Radial);
            // 300 requested -> 17 x 17 grid
            assert_eq!(map.centers.len(), 289);
            assert!(map.biomes.contains(&Biome::Ocean));
        }
    }

    #[test]
    fn test_triangle_scenario() {
        let sites = vec![
            DVec2::new(10.0, 10.0),
            DVec2::new(90.0, 10.0),
            DVec2::new(50.0, 90.0),
        ];
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let sub = VoronoiceProvider.subdivide(&sites, bounds).unwrap();
        let map = build_graph(&sites, &sub, bounds, 0).unwrap();

        assert_eq!(map.centers.len(), 3);
        for p in &map.centers {
            assert_eq!(p.neighbours.len(), 2);
        }
        assert!(map.corners.iter().any(|q| q.border));
    }

    #[test]
    fn test_all_outside_island_is_ocean() {
        let config = MapConfigBuilder::new()
            .seed(11)
            .region_count(150)
            .build()
            .unwrap();
        // A 1 x 1 mask over a 100 x 100 map puts every point far outside
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let shape = IslandShape::radial(1.0, 1.0, &mut rng);
        let map = Map::generate_with(config, &shape, &VoronoiceProvider)
            .unwrap()
            .unwrap();

        for p in &map.centers {
            assert!(p.ocean);
            assert_eq!(p.biome, Some(Biome::Ocean));
        }
        assert_eq!(map.biomes, vec![Biome::Ocean]);
        assert!(map.land_corners().is_empty());
    }

    #[test]
    fn test_too_few_sites_is_absent() {
        let config = MapConfigBuilder::new()
            .seed(1)
            .region_count(2)
            .build()
            .unwrap();
        assert!(Map::generate(config).unwrap().is_none());

        // 3 requested on a square grid -> 1 x 1
        let config = MapConfigBuilder::new()
            .seed(1)
            .point_selector(PointSelector::Square)
            .region_count(3)
            .build()
            .unwrap();
        assert!(Map::generate(config).unwrap().is_none());
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let config = MapConfig {
            width: 0.0,
            ..MapConfig::default()
        };
        let result = Map::generate(config);
        assert!(matches!(result, Err(MapError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_poisson_radius_rejected() {
        for radius in [0.0, -1.0, f64::NAN] {
            let config = MapConfig {
                point_selector: PointSelector::PoissonDisc,
                poisson_radius: radius,
                ..MapConfig::default()
            };
            let result = Map::generate(config);
            assert!(matches!(result, Err(MapError::InvalidConfig(_))), "radius {}", radius);
        }

        // Other selectors ignore the radius
        let config = MapConfig {
            point_selector: PointSelector::Random,
            poisson_radius: 0.0,
            ..MapConfig::default()
        };
        assert!(Map::generate(config).is_ok());
    }

    #[test]
    fn test_unseeded_config_records_seed() {
        let config = MapConfigBuilder::new().region_count(100).build().unwrap();
        let a = Map::generate(config).unwrap().unwrap();
        let b = Map::generate(config).unwrap().unwrap();
        assert_eq!(a.seed, config.seed);
        assert_eq!(a.centers.len(), b.centers.len());
        assert!(a.centers.iter().zip(&b.centers).all(|(p, q)| p.pos == q.pos && p.biome == q.biome));
    }

    #[test]
    fn test_provider_errors_propagate() {
        struct FailingProvider;

        impl VoronoiProvider for FailingProvider {
            fn subdivide(&self, _sites: &[DVec2], _bounds: Rect) -> Result<Subdivision> {
                Err(MapError::GenerationFailed("no triangulation".into()))
            }
        }

        let config = MapConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let shape = IslandShape::radial(config.width, config.height, &mut rng);
        let result = Map::generate_with(config, &shape, &FailingProvider);
        assert!(matches!(result, Err(MapError::GenerationFailed(_))));
    }

    #[test]
    fn test_centers_within_hops() {
        let map = default_map();

        assert_eq!(map.centers_within_hops(0, 0), vec![0]);

        let one = map.centers_within_hops(0, 1);
        assert_eq!(one.len(), 1 + map.neighbours(0).len());

        let two = map.centers_within_hops(0, 2);
        assert!(two.len() > one.len());

        assert!(map.centers_within_hops(999_999, 3).is_empty());
        assert!(map.neighbours(999_999).is_empty());
    }

    #[test]
    fn test_accessors() {
        let map = default_map();
        assert!(map.center(0).is_some());
        assert!(map.center(map.centers.len()).is_none());
        assert!(map.corner(0).is_some());
        assert!(map.edge(map.edges.len()).is_none());
    }

    #[test]
    fn test_center_polygon_is_sorted() {
        let map = default_map();
        let p = &map.centers[10];
        let polygon = map.center_polygon(10).unwrap();
        assert_eq!(polygon.len(), p.corners.len());

        let angles: Vec<f64> = polygon.iter().map(|&v| angle_around(p.pos, v)).collect();
        assert!(angles.windows(2).all(|w| w[0] <= w[1]));

        assert_eq!(
            map.center_polygon(usize::MAX),
            Err(MapError::CenterNotFound(usize::MAX))
        );
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_find_center_at() {
        let map = default_map();
        for id in [0, 17, 150] {
            assert_eq!(map.find_center_at(map.centers[id].pos), Some(id));
        }

        let bare = Map::empty(map.bounds, 0);
        assert_eq!(bare.find_center_at(DVec2::ZERO), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_map_serialization() {
        let map = generate(5, PointSelector::Random, IslandFunction::Radial);
        let json = serde_json::to_string(&map).unwrap();
        let restored: Map = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.centers.len(), map.centers.len());
        assert_eq!(restored.corners.len(), map.corners.len());
        assert_eq!(restored.biomes, map.biomes);
        for (a, b) in restored.centers.iter().zip(&map.centers) {
            assert_eq!(a.biome, b.biome);
            assert_eq!(a.neighbours, b.neighbours);
        }
    }
}
