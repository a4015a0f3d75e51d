//! Turns a box of world voxels into a compact [`Structure`].
//!
//! The volume is read once into a palette-indexed grid. Voxels are then visited
//! in Y, Z, X order; each unclaimed, non-blacklisted voxel seeds a greedy cuboid
//! that grows along X, then Y, then Z for as long as every voxel on the new face
//! has the seed's exact state and is still unclaimed. When hollow detection is
//! on, a shell grown from the same seed replaces the cuboid if it is sparse
//! enough and covers more voxels. Cuboids below the optimization threshold
//! fall back to a single-voxel region.

use crate::block_entity::{has_block_entity, BlockEntityRecord};
use crate::block_state::BlockState;
use crate::bounding_box::BoundingBox;
use crate::config::CaptureConfig;
use crate::error::{Result, StructureError};
use crate::materials;
use crate::metadata::{IntRange, SpawnMetadata};
use crate::properties::PropertyBag;
use crate::region::{BlockData, RegionDescriptor, SpanRegion};
use crate::shapes::{Cuboid, Shape, Shell};
use crate::structure::Structure;
use crate::world::World;
use log::{debug, info, warn};
use rustc_hash::FxHashMap;

const VANILLA_WORLD_NAMES: [&str; 3] = ["world", "world_nether", "world_the_end"];

/// Counts gathered during one capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureReport {
    pub fill_regions: usize,
    pub hollow_regions: usize,
    pub individual_blocks: usize,
    pub total_blocks: u64,
    pub block_entities: usize,
    pub entities: usize,
    /// Voxels or entities dropped because their state could not be read.
    pub extraction_failures: usize,
}

impl CaptureReport {
    pub fn region_count(&self) -> usize {
        self.fill_regions + self.hollow_regions + self.individual_blocks
    }
}

/// The captured volume, one palette index per voxel.
struct VolumeGrid {
    bounds: BoundingBox,
    dims: (i32, i32, i32),
    palette: Vec<BlockState>,
    cells: Vec<u32>,
    claimed: Vec<bool>,
}

impl VolumeGrid {
    fn read(world: &dyn World, bounds: BoundingBox) -> Self {
        let dims = bounds.get_dimensions();
        let mut palette = Vec::new();
        let mut palette_index: FxHashMap<BlockState, u32> = FxHashMap::default();
        let mut cells = Vec::with_capacity(bounds.volume() as usize);

        bounds.for_each_position(|pos| {
            let state = world.block(pos);
            let index = match palette_index.get(&state) {
                Some(&index) => index,
                None => {
                    let index = palette.len() as u32;
                    palette.push(state.clone());
                    palette_index.insert(state, index);
                    index
                }
            };
            cells.push(index);
        });

        let len = cells.len();
        VolumeGrid {
            bounds,
            dims,
            palette,
            cells,
            claimed: vec![false; len],
        }
    }

    /// Index in Y, Z, X order, matching [`BoundingBox::for_each_position`].
    fn index(&self, pos: (i32, i32, i32)) -> usize {
        let (x, y, z) = self.bounds.relative(pos);
        ((y * self.dims.2 + z) * self.dims.0 + x) as usize
    }

    fn state(&self, pos: (i32, i32, i32)) -> &BlockState {
        &self.palette[self.cells[self.index(pos)] as usize]
    }

    fn is_claimed(&self, pos: (i32, i32, i32)) -> bool {
        self.claimed[self.index(pos)]
    }

    fn claim(&mut self, pos: (i32, i32, i32)) {
        let index = self.index(pos);
        self.claimed[index] = true;
    }

    fn matches(&self, pos: (i32, i32, i32), seed: u32) -> bool {
        let index = self.index(pos);
        !self.claimed[index] && self.cells[index] == seed
    }

    fn all_match(&self, cuboid: &Cuboid, seed: u32) -> bool {
        let mut ok = true;
        cuboid.for_each_point(|x, y, z| ok = ok && self.matches((x, y, z), seed));
        ok
    }

    /// Largest box from `seed` grown along X, then Y, then Z.
    fn grow_cuboid(&self, seed: (i32, i32, i32)) -> Cuboid {
        let id = self.cells[self.index(seed)];
        let limit = self.bounds.max;
        let mut max = seed;

        while max.0 < limit.0 {
            let face = Cuboid::new((max.0 + 1, seed.1, seed.2), (max.0 + 1, max.1, max.2));
            if !self.all_match(&face, id) {
                break;
            }
            max.0 += 1;
        }
        while max.1 < limit.1 {
            let face = Cuboid::new((seed.0, max.1 + 1, seed.2), (max.0, max.1 + 1, max.2));
            if !self.all_match(&face, id) {
                break;
            }
            max.1 += 1;
        }
        while max.2 < limit.2 {
            let face = Cuboid::new((seed.0, seed.1, max.2 + 1), (max.0, max.1, max.2 + 1));
            if !self.all_match(&face, id) {
                break;
            }
            max.2 += 1;
        }
        Cuboid::new(seed, max)
    }

    /// A box whose every shell voxel matches the seed, grown from the seed's
    /// straight runs along +X, +Y and +Z. Each side must be at least 3.
    fn find_hollow_box(&self, seed: (i32, i32, i32)) -> Option<Shell> {
        let id = self.cells[self.index(seed)];
        let limit = self.bounds.max;
        let run = |step: (i32, i32, i32), bound: i32, coord: fn((i32, i32, i32)) -> i32| {
            let mut end = seed;
            while coord(end) < bound {
                let next = (end.0 + step.0, end.1 + step.1, end.2 + step.2);
                if !self.matches(next, id) {
                    break;
                }
                end = next;
            }
            coord(end)
        };
        let max = (
            run((1, 0, 0), limit.0, |p| p.0),
            run((0, 1, 0), limit.1, |p| p.1),
            run((0, 0, 1), limit.2, |p| p.2),
        );
        if max.0 - seed.0 < 2 || max.1 - seed.1 < 2 || max.2 - seed.2 < 2 {
            return None;
        }

        let shell = Shell::new(seed, max);
        let mut ok = true;
        shell.for_each_point(|x, y, z| ok = ok && self.matches((x, y, z), id));
        ok.then_some(shell)
    }
}

pub struct StructureCapture {
    pub config: CaptureConfig,
}

impl Default for StructureCapture {
    fn default() -> Self {
        StructureCapture::new(CaptureConfig::default())
    }
}

impl StructureCapture {
    pub fn new(config: CaptureConfig) -> Self {
        StructureCapture { config }
    }

    pub fn capture(&self, world: &dyn World, bounds: &BoundingBox, id: &str) -> Result<Structure> {
        self.capture_with_report(world, bounds, id)
            .map(|(structure, _)| structure)
    }

    pub fn capture_with_report(
        &self,
        world: &dyn World,
        bounds: &BoundingBox,
        id: &str,
    ) -> Result<(Structure, CaptureReport)> {
        let id = id.trim();
        if id.is_empty() {
            return Err(StructureError::InvalidCapture(
                "structure id must not be empty".to_string(),
            ));
        }
        let volume = bounds.volume();
        if volume > self.config.max_volume {
            return Err(StructureError::InvalidCapture(format!(
                "region too large: {} blocks (limit {})",
                volume, self.config.max_volume
            )));
        }

        let mut structure = Structure::new(id, bounds.get_dimensions());
        let mut report = CaptureReport::default();
        let mut grid = VolumeGrid::read(world, *bounds);

        self.capture_regions(&mut grid, &mut structure, &mut report);
        self.capture_block_entities(world, &grid, &mut structure, &mut report);
        self.capture_entities(world, bounds, &mut structure, &mut report);

        if self.config.capture_metadata {
            structure.metadata = Some(capture_metadata(world, bounds));
        }

        report.total_blocks = structure.total_blocks();
        info!(
            "Captured '{}': {} regions, {} blocks, {} block entities, {} entities",
            id,
            report.region_count(),
            report.total_blocks,
            report.block_entities,
            report.entities
        );
        if report.extraction_failures > 0 {
            warn!(
                "Capture of '{}' skipped {} unreadable voxels or entities",
                id, report.extraction_failures
            );
        }
        Ok((structure, report))
    }

    fn capture_regions(
        &self,
        grid: &mut VolumeGrid,
        structure: &mut Structure,
        report: &mut CaptureReport,
    ) {
        let bounds = grid.bounds;
        let mut seeds = Vec::new();
        bounds.for_each_position(|pos| seeds.push(pos));

        for pos in seeds {
            if grid.is_claimed(pos) {
                continue;
            }
            let state = grid.state(pos).clone();
            if materials::is_blacklisted(&state.name) {
                continue;
            }

            let properties = match PropertyBag::from_block_state(&state) {
                Ok(properties) => properties,
                Err(reason) => {
                    let err = StructureError::extraction(bounds.relative(pos), reason);
                    warn!("Skipping {}: {}", state, err);
                    report.extraction_failures += 1;
                    grid.claim(pos);
                    continue;
                }
            };
            let material = state.name.to_string();

            let cuboid = grid.grow_cuboid(pos);

            if self.config.detect_hollow_boxes {
                if let Some(shell) = grid.find_hollow_box(pos) {
                    let ratio = shell.volume() as f64 / shell.outer.volume() as f64;
                    if ratio < self.config.hollow_shell_ratio && shell.volume() > cuboid.volume() {
                        shell.for_each_point(|x, y, z| grid.claim((x, y, z)));
                        debug!("Hollow box at {:?} covers {} voxels", pos, shell.volume());
                        structure.regions.push(RegionDescriptor::Hollow(SpanRegion::new(
                            bounds.relative(shell.outer.min),
                            bounds.relative(shell.outer.max),
                            material,
                            properties,
                        )));
                        report.hollow_regions += 1;
                        continue;
                    }
                }
            }

            if cuboid.volume() >= self.config.min_optimization_size {
                cuboid.for_each_point(|x, y, z| grid.claim((x, y, z)));
                structure.regions.push(RegionDescriptor::Fill(SpanRegion::new(
                    bounds.relative(cuboid.min),
                    bounds.relative(cuboid.max),
                    material,
                    properties,
                )));
                report.fill_regions += 1;
                continue;
            }

            grid.claim(pos);
            structure.regions.push(RegionDescriptor::individual(BlockData::new(
                bounds.relative(pos),
                material,
                properties,
            )));
            report.individual_blocks += 1;
        }
    }

    fn capture_block_entities(
        &self,
        world: &dyn World,
        grid: &VolumeGrid,
        structure: &mut Structure,
        report: &mut CaptureReport,
    ) {
        grid.bounds.for_each_position(|pos| {
            let state = grid.state(pos);
            if materials::is_blacklisted(&state.name) || !has_block_entity(&state.name) {
                return;
            }
            match world.block_entity(pos) {
                Ok(data) => {
                    structure.block_entities.push(BlockEntityRecord::new(
                        grid.bounds.relative(pos),
                        state.name.as_str(),
                        data.unwrap_or_default(),
                    ));
                    report.block_entities += 1;
                }
                Err(err) => {
                    warn!("Failed to capture block entity at {:?}: {}", pos, err);
                    report.extraction_failures += 1;
                }
            }
        });
    }

    fn capture_entities(
        &self,
        world: &dyn World,
        bounds: &BoundingBox,
        structure: &mut Structure,
        report: &mut CaptureReport,
    ) {
        for entity in world.entities_in(bounds) {
            if !entity.is_capturable() {
                debug!("Ignoring entity {} at {:?}", entity.entity_type, entity.pos);
                continue;
            }
            structure.entities.push(entity.to_record(bounds.min));
            report.entities += 1;
        }
    }
}

/// Provenance of a capture plus spawn rules seeded from it.
pub fn capture_metadata(world: &dyn World, bounds: &BoundingBox) -> SpawnMetadata {
    let center = bounds.center();
    let dimension = world.dimension_name();
    let biome = world.biome(center);
    let y = center.1;

    let mut metadata = SpawnMetadata {
        source_dimension: Some(dimension.clone()),
        source_biome: Some(biome.clone()),
        source_y: Some(y),
        source_world_type: Some(world_type(world)),
        ..SpawnMetadata::default()
    };
    metadata.allowed_dimensions.insert(dimension.clone());
    metadata.allowed_biomes.insert(biome.clone());
    metadata.spawn_height_range = default_height_range(y);

    let biome = biome.to_lowercase();
    for tag in ["village", "desert", "ocean", "mountain"] {
        if biome.contains(tag) {
            metadata.tags.insert(tag.to_string());
        }
    }
    if y < 0 {
        metadata.tags.insert("underground".to_string());
    }
    if y > 100 {
        metadata.tags.insert("elevated".to_string());
    }
    metadata.tags.insert(dimension.to_lowercase());
    metadata
}

pub fn default_height_range(source_y: i32) -> IntRange {
    if source_y < 0 {
        IntRange::new(-64, 50)
    } else if source_y > 100 {
        IntRange::new(80, 320)
    } else {
        IntRange::new(50, 120)
    }
}

fn world_type(world: &dyn World) -> String {
    if VANILLA_WORLD_NAMES.contains(&world.name()) {
        world.environment().to_string()
    } else {
        "MODDED".to_string()
    }
}
