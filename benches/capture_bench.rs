use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use structurist::{
    BlockState, BoundingBox, MemoryWorld, Rotation, RotationChoice, StructureCapture,
    StructurePlacer,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn make_world_solid(size: i32) -> MemoryWorld {
    let mut world = MemoryWorld::new("bench");
    world.fill((0, 0, 0), (size - 1, size - 1, size - 1), &BlockState::new("minecraft:stone"));
    world
}

fn make_world_sparse(size: i32, pct: f64) -> MemoryWorld {
    let mut world = MemoryWorld::new("bench");
    let materials = [
        BlockState::new("minecraft:stone"),
        BlockState::new("minecraft:oak_planks"),
        BlockState::new("minecraft:glass"),
    ];
    let threshold = (pct * 100.0) as u32;
    let mut counter = 0i32;
    for y in 0..size {
        for z in 0..size {
            for x in 0..size {
                counter = counter.wrapping_mul(1103515245).wrapping_add(12345);
                let roll = counter.unsigned_abs() % 100;
                if roll < threshold {
                    world.put((x, y, z), materials[(roll % 3) as usize].clone());
                }
            }
        }
    }
    world
}

fn bounds(size: i32) -> BoundingBox {
    BoundingBox::new((0, 0, 0), (size - 1, size - 1, size - 1))
}

// ── Benchmarks ───────────────────────────────────────────────────────────────

fn bench_capture(c: &mut Criterion) {
    let mut group = c.benchmark_group("capture");
    group.measurement_time(Duration::from_secs(3));
    let capture = StructureCapture::default();

    for &size in &[16, 32] {
        let solid = make_world_solid(size);
        group.bench_function(&format!("{}_solid", size), |b| {
            b.iter(|| black_box(capture.capture(&solid, &bounds(size), "bench").unwrap()));
        });

        let sparse = make_world_sparse(size, 0.3);
        group.bench_function(&format!("{}_sparse_30pct", size), |b| {
            b.iter(|| black_box(capture.capture(&sparse, &bounds(size), "bench").unwrap()));
        });
    }
    group.finish();
}

fn bench_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("place");
    group.measurement_time(Duration::from_secs(3));
    let capture = StructureCapture::default();
    let placer = StructurePlacer::default();

    for &size in &[16, 32] {
        let solid = capture.capture(&make_world_solid(size), &bounds(size), "solid").unwrap();
        let sparse = capture
            .capture(&make_world_sparse(size, 0.3), &bounds(size), "sparse")
            .unwrap();

        for (name, structure) in [("solid", &solid), ("sparse_30pct", &sparse)] {
            group.bench_function(&format!("{}_{}_rot90", size, name), |b| {
                let mut rng = StdRng::seed_from_u64(0);
                b.iter(|| {
                    let mut world = MemoryWorld::new("target");
                    let report = placer.place(
                        &mut world,
                        structure,
                        (0, 0, 0),
                        RotationChoice::Fixed(Rotation::Clockwise90),
                        None,
                        &mut rng,
                    );
                    black_box(report);
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_capture, bench_place);
criterion_main!(benches);
