use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use structurist::transform::rotate_position;
use structurist::{
    BlockState, BoundingBox, MemoryWorld, RegionDescriptor, Rotation, RotationChoice,
    StructureCapture, StructurePlacer, World,
};

fn stone() -> BlockState {
    BlockState::new("minecraft:stone")
}

/// A small house-like volume mixing fills, oriented blocks and loose voxels.
fn mixed_world() -> MemoryWorld {
    let mut world = MemoryWorld::new("world");
    world.fill((0, 64, 0), (5, 64, 5), &BlockState::new("minecraft:cobblestone"));
    world.fill((0, 65, 0), (5, 67, 0), &BlockState::new("minecraft:oak_planks"));
    world.fill(
        (0, 65, 5),
        (5, 65, 5),
        &BlockState::new("minecraft:oak_log").with_property("axis", "x"),
    );
    world.put(
        (2, 65, 2),
        BlockState::new("minecraft:stone_brick_stairs")
            .with_property("facing", "east")
            .with_property("half", "bottom"),
    );
    world.put((4, 65, 3), BlockState::new("minecraft:sand"));
    world.put((1, 66, 3), BlockState::new("minecraft:glowstone"));
    world
}

#[test]
fn test_capture_then_place_reproduces_volume() {
    let source = mixed_world();
    let bounds = BoundingBox::new((0, 64, 0), (5, 67, 5));
    let structure = StructureCapture::default().capture(&source, &bounds, "house").unwrap();

    let mut target = MemoryWorld::new("target");
    let origin = (100, 70, -40);
    let mut rng = StdRng::seed_from_u64(0);
    let report = StructurePlacer::default().place(
        &mut target,
        &structure,
        origin,
        RotationChoice::Fixed(Rotation::None),
        None,
        &mut rng,
    );

    assert_eq!(report.blocks_placed, structure.total_blocks());
    assert!(report.failures.is_empty());
    bounds.for_each_position(|(x, y, z)| {
        let local = (x - bounds.min.0, y - bounds.min.1, z - bounds.min.2);
        let placed = target.block((origin.0 + local.0, origin.1 + local.1, origin.2 + local.2));
        assert_eq!(placed, source.block((x, y, z)), "voxel {:?}", local);
    });
    assert_eq!(target.non_air_count(), source.non_air_count());
}

#[test]
fn test_uniform_cube_is_one_fill_region() {
    let mut world = MemoryWorld::new("world");
    world.fill((10, 64, 10), (12, 66, 12), &stone());
    let bounds = BoundingBox::new((10, 64, 10), (12, 66, 12));
    let structure = StructureCapture::default().capture(&world, &bounds, "cube").unwrap();

    assert_eq!(structure.regions.len(), 1);
    match &structure.regions[0] {
        RegionDescriptor::Fill(span) => {
            assert_eq!(span.start, (0, 0, 0));
            assert_eq!(span.end, (2, 2, 2));
            assert_eq!(span.material, "minecraft:stone");
        }
        other => panic!("expected a fill region, got {:?}", other.kind()),
    }
}

#[test]
fn test_rotated_cube_corners_land_on_rotated_positions() {
    let mut world = MemoryWorld::new("world");
    world.fill((0, 0, 0), (2, 2, 2), &stone());
    let structure = StructureCapture::default()
        .capture(&world, &BoundingBox::new((0, 0, 0), (2, 2, 2)), "cube")
        .unwrap();

    let mut target = MemoryWorld::new("target");
    let origin = (20, 64, 20);
    let mut rng = StdRng::seed_from_u64(0);
    StructurePlacer::default().place(
        &mut target,
        &structure,
        origin,
        RotationChoice::Fixed(Rotation::Clockwise90),
        None,
        &mut rng,
    );

    assert_eq!(target.non_air_count(), 27);
    for &x in &[0, 2] {
        for &y in &[0, 2] {
            for &z in &[0, 2] {
                let (rx, ry, rz) = rotate_position((x, y, z), Rotation::Clockwise90);
                let pos = (origin.0 + rx, origin.1 + ry, origin.2 + rz);
                assert_eq!(target.block(pos), stone(), "corner {:?}", (x, y, z));
            }
        }
    }
}

#[test]
fn test_regions_partition_the_captured_voxels() {
    let mut world = MemoryWorld::new("world");
    let materials = ["minecraft:stone", "minecraft:dirt", "minecraft:glass"];
    let mut counter = 7u32;
    for y in 0..8 {
        for z in 0..8 {
            for x in 0..8 {
                counter = counter.wrapping_mul(1103515245).wrapping_add(12345);
                let roll = (counter >> 16) % 10;
                if roll < 7 {
                    world.put((x, y, z), BlockState::new(materials[(roll % 3) as usize]));
                }
            }
        }
    }
    world.put((3, 3, 3), BlockState::new("minecraft:barrier"));

    let bounds = BoundingBox::new((0, 0, 0), (7, 7, 7));
    let structure = StructureCapture::default().capture(&world, &bounds, "noise").unwrap();

    let mut covered = HashSet::new();
    for region in &structure.regions {
        region.for_each_voxel(|pos, _, _| {
            assert!(covered.insert(pos), "voxel {:?} claimed twice", pos);
        });
    }

    let mut expected = HashSet::new();
    bounds.for_each_position(|pos| {
        let state = world.block(pos);
        if !structurist::materials::is_blacklisted(&state.name) {
            expected.insert(pos);
        }
    });
    assert_eq!(covered, expected);
    assert_eq!(structure.total_blocks(), expected.len() as u64);
}
