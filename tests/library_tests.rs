use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use structurist::terrain::{height_difference_penalty, score_candidate};
use structurist::world::Staging;
use structurist::{
    BlockState, EngineConfig, IntRange, MemoryWorld, RotationChoice, SpawnMetadata,
    StructureError, StructureLib, TerrainConfig, World,
};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("structurist_it_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn meadow() -> MemoryWorld {
    let mut world = MemoryWorld::new("world");
    world.fill((-32, 60, -32), (79, 63, 79), &BlockState::new("minecraft:dirt"));
    world.fill((-32, 64, -32), (79, 64, 79), &BlockState::new("minecraft:grass_block"));
    world
}

#[test]
fn test_metadata_defaults() {
    let metadata = SpawnMetadata::default();
    assert_eq!(metadata.spawn_chance, 0.01);
    assert_eq!(metadata.spawn_height_range, IntRange::new(-64, 320));
    assert!(!metadata.natural_spawning);
    assert!(metadata.allowed_dimensions.is_empty());
    assert!(metadata.forbidden_dimensions.is_empty());
    assert!(metadata.allowed_biomes.is_empty());
    assert!(metadata.forbidden_biomes.is_empty());
}

#[test]
fn test_height_range_is_order_independent() {
    assert_eq!(IntRange::new(120, 50), IntRange::new(50, 120));
    let range = IntRange::new(-10, 10);
    for value in -10..=10 {
        assert_eq!(range.clamp(value), value);
    }
}

#[test]
fn test_scores_fall_with_height_difference() {
    let metadata = SpawnMetadata::default();
    let config = TerrainConfig::default();
    let mut previous = f64::MAX;
    for step in [2, 4, 6, 10, 11] {
        let mut world = meadow();
        world.fill((0, 65, 0), (0, 64 + step, 0), &BlockState::new("minecraft:stone"));
        let view = Staging::new(&world);
        let score = score_candidate(&view, (0, 65, 0), (5, 3, 5), &metadata, &config).score;
        assert!(score <= previous, "step {}", step);
        assert!(height_difference_penalty(step) >= 0.0);
        previous = score;
    }

    let world = meadow();
    let view = Staging::new(&world);
    let mut high_only = SpawnMetadata::default();
    high_only.spawn_height_range = IntRange::new(100, 200);
    assert_eq!(score_candidate(&view, (0, 65, 0), (5, 3, 5), &high_only, &config).score, 0.0);
}

#[test]
fn test_capture_save_load_place() {
    let dir = temp_dir("lib");
    let lib = StructureLib::new(EngineConfig::default(), &dir);

    let mut source = meadow();
    source.fill((0, 65, 0), (3, 67, 3), &BlockState::new("minecraft:bricks"));
    let (structure, report) = lib
        .capture_and_save(&source, (3, 67, 3), (0, 65, 0), "brick_block", "mason")
        .unwrap();
    assert_eq!(report.total_blocks, 48);
    assert_eq!(structure.author, "mason");
    assert_eq!(lib.list().unwrap(), vec!["brick_block"]);

    let loaded = lib.load("brick_block").unwrap();
    assert_eq!(loaded.regions, structure.regions);
    let metadata = loaded.metadata.unwrap();
    assert_eq!(metadata.source_dimension.as_deref(), Some("overworld"));
    assert_eq!(metadata.spawn_height_range, IntRange::new(50, 120));

    let mut target = MemoryWorld::new("target");
    let mut rng = StdRng::seed_from_u64(1);
    let placed = lib
        .place_by_id(
            &mut target,
            "brick_block",
            (0, 100, 0),
            RotationChoice::Random,
            None,
            &mut rng,
        )
        .unwrap();
    assert_eq!(placed.blocks_placed, 48);
    assert_eq!(target.non_air_count(), 48);

    assert!(matches!(
        lib.place_by_id(&mut target, "missing", (0, 0, 0), RotationChoice::Random, None, &mut rng),
        Err(StructureError::NotFound(_))
    ));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_oversized_capture_writes_nothing() {
    let dir = temp_dir("oversized");
    let mut config = EngineConfig::default();
    config.capture.max_volume = 10;
    let lib = StructureLib::new(config, &dir);

    let result = lib.capture_and_save(&meadow(), (0, 60, 0), (9, 64, 9), "too_big", "mason");
    assert!(matches!(result, Err(StructureError::InvalidCapture(_))));
    assert!(lib.list().unwrap().is_empty());
}

#[test]
fn test_natural_spawning_survives_reload() {
    let dir = temp_dir("spawning");
    let mut lib = StructureLib::new(EngineConfig::default(), &dir);
    let mut source = meadow();
    source.fill((0, 65, 0), (2, 66, 2), &BlockState::new("minecraft:mossy_cobblestone"));
    lib.capture_and_save(&source, (0, 65, 0), (2, 66, 2), "shrine", "mason")
        .unwrap();
    lib.enable_natural_spawning("shrine", Some(1.0)).unwrap();
    assert!(lib.spawner().is_active("shrine"));

    let mut reopened = StructureLib::new(EngineConfig::default(), &dir);
    assert_eq!(reopened.load_natural_spawns().unwrap(), 1);

    let mut world = meadow();
    let mut rng = StdRng::seed_from_u64(21);
    let spawned = reopened.on_chunk_load(&mut world, (2, 2), &mut rng);
    assert_eq!(spawned.len(), 1);
    let pos = spawned[0].pos;
    assert!((32..48).contains(&pos.0) && (32..48).contains(&pos.2));
    assert_eq!(world.block(pos).short_name(), "mossy_cobblestone");

    assert!(reopened.disable_natural_spawning("shrine").unwrap());
    assert!(reopened.on_chunk_load(&mut world, (4, 0), &mut rng).is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}
