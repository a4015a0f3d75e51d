//! Reshapes the ground under and around a structure before it is placed.
//!
//! Every step reads and writes through one [`Staging`] overlay so later steps
//! see earlier ones; the world is only touched when the finished write list is
//! applied.

use super::surface::{biome_surface, find_surface};
use crate::block_state::{short_name, BlockState};
use crate::config::TerrainConfig;
use crate::materials;
use crate::metadata::SpawnMetadata;
use crate::world::{apply_writes, Staging, World};
use log::{debug, warn};
use rand::Rng;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::f64::consts::PI;

/// Extra layers scanned for trees below the footprint and above its top.
const TREE_SCAN_BELOW: i32 = 5;
const TREE_SCAN_ABOVE: i32 = 15;
/// How far around removed tree blocks stray leaves are looked for.
const LEAF_CLEANUP_RADIUS: i32 = 3;
/// Ring width around the footprint where micro-features may appear.
const MICRO_FEATURE_RING: i32 = 2;
const FLOWERS: [&str; 4] = ["dandelion", "poppy", "blue_orchid", "allium"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerrainReport {
    pub tree_blocks_removed: usize,
    pub leaves_cleared: usize,
    pub columns_raised: usize,
    pub columns_lowered: usize,
    pub blended_columns: usize,
    pub micro_features: usize,
    pub writes: usize,
    pub failed_writes: usize,
}

/// Clears trees around the footprint of a `size` structure at `location` and,
/// when the metadata asks for flat ground, levels and blends the terrain.
pub fn prepare_terrain<R: Rng + ?Sized>(
    world: &mut dyn World,
    location: (i32, i32, i32),
    size: (i32, i32, i32),
    metadata: &SpawnMetadata,
    config: &TerrainConfig,
    rng: &mut R,
) -> TerrainReport {
    let mut report = TerrainReport::default();
    let writes = {
        let mut view = Staging::new(&*world);
        remove_trees(&mut view, location, size, config, &mut report);
        if metadata.spawn_conditions.requires_flat_ground {
            let target = target_height(&view, location, size, config);
            debug!("Levelling terrain at {:?} to surface height {}", location, target);
            terraform(&mut view, location, size, target, config, rng, &mut report);
            blend(&mut view, location, size, target, config, &mut report);
            add_micro_features(&mut view, location, size, config, rng, &mut report);
        }
        view.into_writes()
    };

    report.writes = writes.len();
    let failures = apply_writes(world, &writes);
    for err in &failures {
        warn!("Terrain write failed: {}", err);
    }
    report.failed_writes = failures.len();
    report
}

/// The 26 voxels sharing a face, edge or corner with `pos`.
fn neighbours(pos: (i32, i32, i32)) -> impl Iterator<Item = (i32, i32, i32)> {
    (-1..=1).flat_map(move |dx| {
        (-1..=1).flat_map(move |dy| {
            (-1..=1)
                .filter(move |&dz| dx != 0 || dy != 0 || dz != 0)
                .map(move |dz| (pos.0 + dx, pos.1 + dy, pos.2 + dz))
        })
    })
}

/// A log standing on ground rather than on another part of the tree.
fn is_at_ground_level(view: &Staging, pos: (i32, i32, i32)) -> bool {
    let below = view.block((pos.0, pos.1 - 1, pos.2));
    materials::is_natural_ground(&below.name) || matches!(below.short_name(), "stone" | "deepslate")
}

fn remove_trees(
    view: &mut Staging,
    location: (i32, i32, i32),
    size: (i32, i32, i32),
    config: &TerrainConfig,
    report: &mut TerrainReport,
) {
    let buffer = config.tree_buffer;
    let mut processed = FxHashSet::default();
    let mut removed = Vec::new();

    for dx in -buffer..size.0 + buffer {
        for dz in -buffer..size.2 + buffer {
            for dy in -TREE_SCAN_BELOW..size.1 + TREE_SCAN_ABOVE {
                let pos = (location.0 + dx, location.1 + dy, location.2 + dz);
                if processed.contains(&pos) || !materials::is_tree_block(&view.block(pos).name) {
                    continue;
                }
                removed.extend(remove_tree(view, pos, config.tree_node_cap, &mut processed));
            }
        }
    }

    report.tree_blocks_removed += removed.len();
    if !removed.is_empty() {
        clear_floating_leaves(view, &removed, config.leaf_link_cap, report);
    }
}

/// Flood-fills one tree from `start` and stages its removal. Logs standing on
/// the ground become the biome's surface block so no hole is left behind.
fn remove_tree(
    view: &mut Staging,
    start: (i32, i32, i32),
    cap: usize,
    processed: &mut FxHashSet<(i32, i32, i32)>,
) -> Vec<(i32, i32, i32)> {
    let mut tree = Vec::new();
    let mut members = FxHashSet::default();
    let mut queue = VecDeque::from([start]);

    while members.len() < cap {
        let Some(pos) = queue.pop_front() else { break };
        if members.contains(&pos) {
            continue;
        }
        let block = view.block(pos);
        if !materials::is_tree_block(&block.name) {
            continue;
        }
        members.insert(pos);
        processed.insert(pos);
        tree.push(pos);

        let is_log = materials::is_log(&block.name);
        let is_leaves = materials::is_leaves(&block.name);
        for next in neighbours(pos) {
            if members.contains(&next) {
                continue;
            }
            let neighbour = view.block(next);
            let follow = if is_log {
                materials::is_tree_block(&neighbour.name)
            } else if is_leaves {
                materials::is_log(&neighbour.name) || materials::is_leaves(&neighbour.name)
            } else {
                false
            };
            if follow {
                queue.push_back(next);
            }
        }
    }

    let replacements: Vec<_> = tree
        .iter()
        .map(|&pos| {
            let block = view.block(pos);
            if materials::is_log(&block.name) && is_at_ground_level(view, pos) {
                biome_surface(&view.world().biome(pos))
            } else {
                BlockState::air()
            }
        })
        .collect();
    for (&pos, state) in tree.iter().zip(replacements) {
        view.set(pos, state);
    }
    tree
}

fn clear_floating_leaves(
    view: &mut Staging,
    removed: &[(i32, i32, i32)],
    link_cap: usize,
    report: &mut TerrainReport,
) {
    let r = LEAF_CLEANUP_RADIUS;
    let mut seen = FxHashSet::default();
    for &(x, y, z) in removed {
        for dx in -r..=r {
            for dy in -r..=r {
                for dz in -r..=r {
                    let pos = (x + dx, y + dy, z + dz);
                    if !seen.insert(pos) || !materials::is_leaves(&view.block(pos).name) {
                        continue;
                    }
                    if !is_connected_to_log(view, pos, link_cap) {
                        view.set(pos, BlockState::air());
                        report.leaves_cleared += 1;
                    }
                }
            }
        }
    }
}

/// Whether a chain of leaves links `start` to a log within `cap` visited leaves.
fn is_connected_to_log(view: &Staging, start: (i32, i32, i32), cap: usize) -> bool {
    let mut checked = FxHashSet::default();
    let mut stack = vec![start];
    while let Some(pos) = stack.pop() {
        if checked.len() > cap {
            return false;
        }
        if !checked.insert(pos) {
            continue;
        }
        for next in neighbours(pos) {
            let block = view.block(next);
            if materials::is_log(&block.name) {
                return true;
            }
            if materials::is_leaves(&block.name) && !checked.contains(&next) {
                stack.push(next);
            }
        }
    }
    false
}

/// The nine footprint sample points: corners, edge midpoints and centre.
pub fn sample_points(location: (i32, i32, i32), size: (i32, i32, i32)) -> [(i32, i32); 9] {
    let (x, z) = (location.0, location.2);
    let (last_x, last_z) = (size.0 - 1, size.2 - 1);
    let (mid_x, mid_z) = (size.0 / 2, size.2 / 2);
    [
        (x, z),
        (x + last_x, z),
        (x, z + last_z),
        (x + last_x, z + last_z),
        (x + mid_x, z),
        (x + last_x, z + mid_z),
        (x + mid_x, z + last_z),
        (x, z + mid_z),
        (x + mid_x, z + mid_z),
    ]
}

/// Mean surface height over the sample points, truncated.
pub fn target_height(
    view: &Staging,
    location: (i32, i32, i32),
    size: (i32, i32, i32),
    config: &TerrainConfig,
) -> i32 {
    let points = sample_points(location, size);
    let sum: i64 = points
        .iter()
        .map(|&(x, z)| find_surface(view, x, z, config.default_surface_y) as i64)
        .sum();
    (sum as f64 / points.len() as f64) as i32
}

fn terraform<R: Rng + ?Sized>(
    view: &mut Staging,
    location: (i32, i32, i32),
    size: (i32, i32, i32),
    target: i32,
    config: &TerrainConfig,
    rng: &mut R,
    report: &mut TerrainReport,
) {
    for dx in 0..size.0 {
        for dz in 0..size.2 {
            let (x, z) = (location.0 + dx, location.2 + dz);
            let surface = find_surface(view, x, z, config.default_surface_y);

            let mut variation = 0;
            if (dx + dz) % 3 == 0 && rng.gen_bool(0.5) {
                variation = if rng.gen_bool(0.5) { 1 } else { -1 };
            }
            let difference = target + variation - surface;

            if difference > 0 {
                build_up(view, (x, z), surface, difference.min(config.max_column_adjust));
                report.columns_raised += 1;
            } else if difference < 0 {
                dig_down(view, (x, z), surface, (-difference).min(config.max_column_adjust));
                report.columns_lowered += 1;
            }
        }
    }
}

/// Fills `layers` cells from `surface` upward: the biome's surface block on top,
/// two layers of dirt under it, then whatever the column's ground is made of.
fn build_up(view: &mut Staging, (x, z): (i32, i32), surface: i32, layers: i32) {
    let ground = view.block((x, surface - 1, z));
    let filler = if materials::is_solid(&ground.name) {
        ground
    } else {
        BlockState::new("stone")
    };
    let top = biome_surface(&view.world().biome((x, surface, z)));

    for i in 0..layers {
        let pos = (x, surface + i, z);
        if !materials::is_foliage_or_air(&view.block(pos).name) {
            continue;
        }
        let state = if i == layers - 1 {
            top.clone()
        } else if i >= layers - 3 {
            BlockState::new("dirt")
        } else {
            filler.clone()
        };
        view.set(pos, state);
    }
}

/// Peels up to `depth` blocks of natural ground or tree off the column top.
fn dig_down(view: &mut Staging, (x, z): (i32, i32), surface: i32, depth: i32) {
    let mut peeled = 0;
    while peeled < depth {
        let pos = (x, surface - 1 - peeled, z);
        let name = view.block(pos).name;
        if !materials::is_natural_ground(&name) && !materials::is_tree_block(&name) {
            break;
        }
        view.set(pos, BlockState::air());
        peeled += 1;
    }

    let new_top = (x, surface - 1 - peeled, z);
    if view.block(new_top).short_name() == "dirt" {
        let top = biome_surface(&view.world().biome(new_top));
        view.set(new_top, top);
    }
}

/// Horizontal distance from `(dx, dz)` to the nearest footprint cell.
fn distance_from_footprint(dx: i32, dz: i32, size: (i32, i32, i32)) -> f64 {
    let outside = |d: i32, len: i32| {
        if d < 0 {
            -d
        } else if d >= len {
            d - len + 1
        } else {
            0
        }
    };
    let (ox, oz) = (outside(dx, size.0) as f64, outside(dz, size.2) as f64);
    (ox * ox + oz * oz).sqrt()
}

/// Eases the ring around the footprint towards `target`. Only small steps are
/// taken so no cliff is cut into the surrounding terrain.
fn blend(
    view: &mut Staging,
    location: (i32, i32, i32),
    size: (i32, i32, i32),
    target: i32,
    config: &TerrainConfig,
    report: &mut TerrainReport,
) {
    let radius = config.blend_radius;
    if radius <= 0 {
        return;
    }
    for dx in -radius..size.0 + radius {
        for dz in -radius..size.2 + radius {
            if (0..size.0).contains(&dx) && (0..size.2).contains(&dz) {
                continue;
            }
            let (x, z) = (location.0 + dx, location.2 + dz);
            let surface = find_surface(view, x, z, config.default_surface_y);

            let factor = (distance_from_footprint(dx, dz, size) / radius as f64).clamp(0.0, 1.0);
            let eased = (1.0 - (factor * PI).cos()) / 2.0;
            let blended = (target as f64 * (1.0 - eased) + surface as f64 * eased) as i32;
            let difference = blended - surface;
            if difference == 0 || difference.abs() > config.blend_max_step {
                continue;
            }

            if difference > 0 {
                let pos = (x, surface, z);
                if materials::is_air(&view.block(pos).name) {
                    let top = biome_surface(&view.world().biome(pos));
                    view.set(pos, top);
                    report.blended_columns += 1;
                }
            } else {
                let pos = (x, surface - 1, z);
                if materials::is_natural_ground(&view.block(pos).name) {
                    view.set(pos, BlockState::air());
                    report.blended_columns += 1;
                }
            }
        }
    }
}

fn add_micro_features<R: Rng + ?Sized>(
    view: &mut Staging,
    location: (i32, i32, i32),
    size: (i32, i32, i32),
    config: &TerrainConfig,
    rng: &mut R,
    report: &mut TerrainReport,
) {
    let attempts = size.0 * size.2 / 10;
    let ring = MICRO_FEATURE_RING;
    for _ in 0..attempts {
        let dx = rng.gen_range(-ring..size.0 + ring);
        let dz = rng.gen_range(-ring..size.2 + ring);
        if (0..size.0).contains(&dx) && (0..size.2).contains(&dz) {
            continue;
        }
        let (x, z) = (location.0 + dx, location.2 + dz);
        let surface = find_surface(view, x, z, config.default_surface_y);
        if rng.gen::<f64>() >= config.micro_feature_chance {
            continue;
        }
        if add_micro_feature(view, (x, surface, z), rng) {
            report.micro_features += 1;
        }
    }
}

/// One random decoration at the surface cell `pos`, whose ground is just below.
fn add_micro_feature<R: Rng + ?Sized>(
    view: &mut Staging,
    pos: (i32, i32, i32),
    rng: &mut R,
) -> bool {
    let ground_pos = (pos.0, pos.1 - 1, pos.2);
    let on_grass = short_name(&view.block(ground_pos).name) == "grass_block";
    let open = materials::is_air(&view.block(pos).name);
    let roll = rng.gen::<f32>();

    if roll < 0.1 {
        if open {
            view.set(pos, BlockState::new("cobblestone"));
            return true;
        }
    } else if roll < 0.4 && on_grass {
        if open {
            let upper = (pos.0, pos.1 + 1, pos.2);
            if rng.gen_bool(0.5) && materials::is_air(&view.block(upper).name) {
                view.set(pos, BlockState::new("tall_grass").with_property("half", "lower"));
                view.set(upper, BlockState::new("tall_grass").with_property("half", "upper"));
            } else {
                view.set(pos, BlockState::new("fern"));
            }
            return true;
        }
    } else if roll < 0.6 && on_grass {
        if open {
            let flower = FLOWERS[rng.gen_range(0..FLOWERS.len())];
            view.set(pos, BlockState::new(flower));
            return true;
        }
    } else if roll < 0.8 && on_grass {
        let patch = if rng.gen_bool(0.5) { "coarse_dirt" } else { "gravel" };
        view.set(ground_pos, BlockState::new(patch));
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::MemoryWorld;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grass_world() -> MemoryWorld {
        let mut world = MemoryWorld::new("world");
        world.fill((-10, 58, -10), (30, 60, 30), &BlockState::new("minecraft:stone"));
        world.fill((-10, 61, -10), (30, 63, 30), &BlockState::new("minecraft:dirt"));
        world.fill((-10, 64, -10), (30, 64, 30), &BlockState::new("minecraft:grass_block"));
        world
    }

    fn plant_tree(world: &mut MemoryWorld, x: i32, z: i32) {
        world.fill((x, 65, z), (x, 69, z), &BlockState::new("minecraft:oak_log"));
        let leaves = BlockState::new("minecraft:oak_leaves");
        world.fill((x - 2, 68, z - 2), (x + 2, 70, z + 2), &leaves);
        world.put((x, 68, z), BlockState::new("minecraft:oak_log"));
        world.put((x, 69, z), BlockState::new("minecraft:oak_log"));
    }

    #[test]
    fn test_trees_are_removed_and_stump_covered() {
        let mut world = grass_world();
        plant_tree(&mut world, 3, 3);
        let mut rng = StdRng::seed_from_u64(5);
        let metadata = SpawnMetadata {
            spawn_conditions: crate::metadata::SpawnConditions {
                requires_flat_ground: false,
                ..Default::default()
            },
            ..SpawnMetadata::default()
        };

        let config = TerrainConfig::default();
        let report =
            prepare_terrain(&mut world, (0, 65, 0), (6, 4, 6), &metadata, &config, &mut rng);
        assert!(report.tree_blocks_removed > 0);
        assert_eq!(report.failed_writes, 0);
        assert_eq!(world.block((3, 65, 3)).short_name(), "grass_block");
        assert!(world.block((3, 67, 3)).is_air());
        assert!(world
            .iter_blocks()
            .all(|(_, state)| !materials::is_tree_block(&state.name)));
    }

    #[test]
    fn test_floating_leaves_are_cleared() {
        let mut world = grass_world();
        world.fill((0, 70, 0), (1, 70, 1), &BlockState::new("minecraft:oak_leaves"));
        world.put((2, 70, 0), BlockState::new("minecraft:oak_leaves"));
        let mut view = Staging::new(&world);
        let mut report = TerrainReport::default();
        clear_floating_leaves(&mut view, &[(0, 69, 0)], 50, &mut report);
        assert_eq!(report.leaves_cleared, 5);
    }

    #[test]
    fn test_connected_leaves_survive() {
        let mut world = grass_world();
        world.put((0, 70, 0), BlockState::new("minecraft:oak_leaves"));
        world.put((1, 70, 0), BlockState::new("minecraft:oak_leaves"));
        world.put((2, 70, 0), BlockState::new("minecraft:birch_log"));
        let view = Staging::new(&world);
        assert!(is_connected_to_log(&view, (0, 70, 0), 50));
        assert!(!is_connected_to_log(&view, (0, 70, 0), 0));
    }

    #[test]
    fn test_build_up_layers() {
        let world = grass_world();
        let mut view = Staging::new(&world);
        build_up(&mut view, (0, 0), 65, 5);
        let names: Vec<_> = (65..70)
            .map(|y| view.block((0, y, 0)).short_name().to_string())
            .collect();
        assert_eq!(names, vec!["grass_block", "grass_block", "dirt", "dirt", "grass_block"]);
    }

    #[test]
    fn test_dig_down_stops_at_rock() {
        let world = grass_world();
        let mut view = Staging::new(&world);
        dig_down(&mut view, (0, 0), 65, 6);
        assert!(view.block((0, 64, 0)).is_air());
        assert!(view.block((0, 61, 0)).is_air());
        assert_eq!(view.block((0, 60, 0)).short_name(), "stone");

        let mut view = Staging::new(&world);
        dig_down(&mut view, (0, 0), 65, 2);
        assert!(view.block((0, 63, 0)).is_air());
        assert_eq!(view.block((0, 62, 0)).short_name(), "grass_block");
    }

    #[test]
    fn test_flat_ground_request_levels_footprint() {
        let mut world = grass_world();
        world.fill((0, 65, 0), (2, 66, 7), &BlockState::new("minecraft:dirt"));
        world.fill((0, 67, 0), (2, 67, 7), &BlockState::new("minecraft:grass_block"));
        let config = TerrainConfig {
            micro_feature_chance: 0.0,
            ..TerrainConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let metadata = SpawnMetadata::default();
        let report =
            prepare_terrain(&mut world, (0, 65, 0), (8, 4, 8), &metadata, &config, &mut rng);
        assert!(report.columns_lowered > 0 || report.columns_raised > 0);

        let view = Staging::new(&world);
        let heights: Vec<i32> = (0..8)
            .flat_map(|x| (0..8).map(move |z| (x, z)))
            .map(|(x, z)| find_surface(&view, x, z, 64))
            .collect();
        let spread = heights.iter().max().unwrap() - heights.iter().min().unwrap();
        assert!(spread <= 2, "spread {}", spread);
    }

    #[test]
    fn test_sample_points_cover_corners_and_centre() {
        let points = sample_points((10, 64, 20), (5, 3, 7));
        assert_eq!(points[0], (10, 20));
        assert_eq!(points[3], (14, 26));
        assert_eq!(points[8], (12, 23));
    }
}
