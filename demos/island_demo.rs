//! Complete workflow demonstration for island_mapgen
//!
//! Run with `RUST_LOG=debug` to see per-stage timings.

use island_mapgen::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== island_mapgen Complete Demo ===\n");

    // Step 1: Configure island
    println!("Step 1: Configuring island...");
    let params = IslandParametersBuilder::new()
        .seed(12345)
        .size(1024)?
        .features(Features::VOLCANO | Features::VALLEYS | Features::CANYONS)
        .build()?;

    println!("  Seed: {}", params.seed);
    println!("  Size: {} ({}x{} lattice)", params.size, params.grid_size(), params.grid_size());
    println!("  Features: {:?}", params.features);

    // Step 2: Generate island
    println!("\nStep 2: Generating island...");
    let map = Map::generate(params)?;
    println!("  Generated {} regions, {} corners, {} edges",
        map.region_count(), map.corners().len(), map.edges().len());
    println!("  Rivers: {}  Lakes: {}  Canyons: {}",
        map.rivers().len(), map.lakes().len(), map.canyons().len());

    // Step 3: Analyze biomes
    println!("\nStep 3: Biome distribution:");
    let mut counts = [0usize; Biome::ALL.len()];
    for region in map.regions() {
        counts[usize::from(region.biome.id())] += 1;
    }
    for biome in Biome::ALL {
        let count = counts[usize::from(biome.id())];
        if count > 0 {
            let pct = (count as f32 / map.region_count() as f32) * 100.0;
            println!("  {:?}: {} ({:.1}%)", biome, count, pct);
        }
    }

    // Step 4: Point queries
    println!("\nStep 4: Spatial queries:");
    let center = map.bounds().center();
    let id = map.containing_region(center)?;
    let region = &map.regions()[id];
    println!("  Center {:?} -> Region {} ({:?}, elevation {:.3})",
        center, id, region.biome, region.elevation);
    println!("  Region has {} neighbors, elevation bucket {:?}",
        region.neighbor_count(), map.elevation_bucket(id));
    if let Some(river) = map.rivers().iter().max_by_key(|r| r.len()) {
        let source = &map.regions()[river.source()];
        println!("  Longest river: {} regions from ({:.1}, {:.1})",
            river.len(), source.point.x, source.point.y);
    }

    // Step 5: Generate mesh
    println!("\nStep 5: Generating mesh...");
    let mesh = generate_mesh(&map, &BiomeColorMapper);
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());

    // Step 6: Save and reload
    println!("\nStep 6: Tag round trip...");
    let tag = map.write_to_tag();
    let restored = Map::read_from_tag(&tag)?;
    println!("  Restored {} regions from {} top-level tags",
        restored.region_count(), tag.len());

    println!("\n=== Demo Complete ===");
    Ok(())
}
