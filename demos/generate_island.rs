//! Example: Generate a Voronoi island
//!
//! Demonstrates the full generation pipeline and prints map statistics.
//! Run with `RUST_LOG=debug` to see per-stage timings.

use rust_voronoi_island::*;

fn main() {
    env_logger::init();

    println!("Voronoi Island Generation Example");
    println!("=================================\n");

    let config = MapConfigBuilder::new()
        .seed(42)
        .dimensions(200.0, 200.0)
        .unwrap()
        .point_selector(PointSelector::Random)
        .region_count(1000)
        .relaxation_count(2)
        .unwrap()
        .island_function(IslandFunction::Radial)
        .build()
        .unwrap();

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Dimensions: {} x {}", config.width, config.height);
    println!("  Point Selector: {}", config.point_selector.name());
    println!("  Regions: {}", config.region_count);
    println!("  Relaxation Rounds: {}", config.effective_relaxation_count());
    println!("  Island Function: {:?}", config.island_function);
    println!();

    println!("Generating island...");
    let map = match Map::generate(config).expect("Failed to generate island") {
        Some(map) => map,
        None => {
            println!("Too few sites to build a map");
            return;
        }
    };
    println!(
        "Generated {} centers, {} corners, {} edges\n",
        map.centers.len(),
        map.corners.len(),
        map.edges.len()
    );

    let ocean = map.centers.iter().filter(|p| p.ocean).count();
    let lakes = map.centers.iter().filter(|p| p.water && !p.ocean).count();
    let coast = map.centers.iter().filter(|p| p.coast).count();
    let land: Vec<&Center> = map.centers.iter().filter(|p| p.is_land()).collect();
    let avg_elevation = land.iter().map(|p| p.elevation).sum::<f64>() / land.len().max(1) as f64;
    let avg_moisture = land.iter().map(|p| p.moisture).sum::<f64>() / land.len().max(1) as f64;

    println!("Statistics:");
    println!("  Ocean: {}, Lake: {}, Coast: {}, Land: {}", ocean, lakes, coast, land.len());
    println!("  Average land elevation: {:.3}", avg_elevation);
    println!("  Average land moisture: {:.3}", avg_moisture);
    println!();

    println!("Biomes:");
    let mut water_regions = 0;
    for (biome, count) in map.biome_counts() {
        if biome.is_water() {
            water_regions += count;
        }
        println!("  {:<28} {:>5}", biome, count);
    }
    println!("  Water biome regions: {}", water_regions);
    println!();

    if let Some(id) = map.find_center_at(DVec2::new(100.0, 100.0)) {
        let center = &map.centers[id];
        println!(
            "Center at map middle: #{} {} (elevation {:.2}, moisture {:.2})",
            id,
            center.biome.map(|b| b.name()).unwrap_or("-"),
            center.elevation,
            center.moisture
        );
    }

    let mesh = generate_mesh(&map, &BasicColorMapper, 20.0);
    println!(
        "Mesh: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    println!("\nGeneration complete!");
}
