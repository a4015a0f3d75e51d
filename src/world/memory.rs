use super::{DeferredTask, Environment, World};
use crate::block_entity::{has_block_entity, BlockEntityData};
use crate::block_state::BlockState;
use crate::bounding_box::BoundingBox;
use crate::entity::{EntitySnapshot, EntitySpawn};
use crate::error::{Result, StructureError};
use rustc_hash::{FxHashMap, FxHashSet};

/// An in-memory world. Blocks are stored sparsely against a palette; anything
/// never written reads as air.
pub struct MemoryWorld {
    name: String,
    environment: Environment,
    min_height: i32,
    max_height: i32,
    palette: Vec<BlockState>,
    palette_index: FxHashMap<BlockState, usize>,
    blocks: FxHashMap<(i32, i32, i32), usize>,
    default_biome: String,
    biomes: FxHashMap<(i32, i32), String>,
    block_entities: FxHashMap<(i32, i32, i32), BlockEntityData>,
    entities: Vec<EntitySnapshot>,
    denied: FxHashSet<(i32, i32, i32)>,
    autosave: bool,
    yields: u64,
    writes: u64,
    tick: u64,
    tasks: Vec<(u64, DeferredTask)>,
}

impl MemoryWorld {
    pub fn new(name: impl Into<String>) -> Self {
        let air = BlockState::air();
        let mut palette_index = FxHashMap::default();
        palette_index.insert(air.clone(), 0);
        MemoryWorld {
            name: name.into(),
            environment: Environment::Normal,
            min_height: -64,
            max_height: 319,
            palette: vec![air],
            palette_index,
            blocks: FxHashMap::default(),
            default_biome: "plains".to_string(),
            biomes: FxHashMap::default(),
            block_entities: FxHashMap::default(),
            entities: Vec::new(),
            denied: FxHashSet::default(),
            autosave: true,
            yields: 0,
            writes: 0,
            tick: 0,
            tasks: Vec::new(),
        }
    }

    pub fn with_height_range(mut self, min_height: i32, max_height: i32) -> Self {
        self.min_height = min_height.min(max_height);
        self.max_height = min_height.max(max_height);
        self
    }

    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    pub fn set_default_biome(&mut self, biome: impl Into<String>) {
        self.default_biome = biome.into();
    }

    pub fn set_biome(&mut self, x: i32, z: i32, biome: impl Into<String>) {
        self.biomes.insert((x, z), biome.into());
    }

    fn get_or_insert_in_palette(&mut self, block: &BlockState) -> usize {
        match self.palette_index.get(block) {
            Some(&index) => index,
            None => {
                let index = self.palette.len();
                self.palette.push(block.clone());
                self.palette_index.insert(block.clone(), index);
                index
            }
        }
    }

    /// Writes without bounds checks or write accounting. For building fixtures.
    pub fn put(&mut self, pos: (i32, i32, i32), state: BlockState) {
        if state.is_air() {
            self.blocks.remove(&pos);
        } else {
            let index = self.get_or_insert_in_palette(&state);
            self.blocks.insert(pos, index);
        }
    }

    pub fn fill(&mut self, min: (i32, i32, i32), max: (i32, i32, i32), state: &BlockState) {
        BoundingBox::new(min, max).for_each_position(|pos| self.put(pos, state.clone()));
    }

    pub fn add_entity(&mut self, entity: EntitySnapshot) {
        self.entities.push(entity);
    }

    pub fn entities(&self) -> &[EntitySnapshot] {
        &self.entities
    }

    pub fn put_block_entity(&mut self, pos: (i32, i32, i32), data: BlockEntityData) {
        self.block_entities.insert(pos, data);
    }

    /// Makes every later write at `pos` fail.
    pub fn deny_writes(&mut self, pos: (i32, i32, i32)) {
        self.denied.insert(pos);
    }

    pub fn non_air_count(&self) -> usize {
        self.blocks.len()
    }

    /// Non-air voxels, in no particular order.
    pub fn iter_blocks(&self) -> impl Iterator<Item = ((i32, i32, i32), &BlockState)> {
        self.blocks
            .iter()
            .map(move |(pos, index)| (*pos, &self.palette[*index]))
    }

    pub fn yield_count(&self) -> u64 {
        self.yields
    }

    pub fn write_count(&self) -> u64 {
        self.writes
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Advances one tick and runs every task that has come due.
    pub fn tick(&mut self) {
        self.tick += 1;
        let now = self.tick;
        let (due, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.tasks).into_iter().partition(|(at, _)| *at <= now);
        self.tasks = waiting;
        for (_, task) in due {
            task(self);
        }
    }

    /// Ticks until no task is pending.
    pub fn run_until_idle(&mut self) {
        while !self.tasks.is_empty() {
            self.tick();
        }
    }
}

impl World for MemoryWorld {
    fn name(&self) -> &str {
        &self.name
    }

    fn environment(&self) -> Environment {
        self.environment.clone()
    }

    fn min_height(&self) -> i32 {
        self.min_height
    }

    fn max_height(&self) -> i32 {
        self.max_height
    }

    fn block(&self, pos: (i32, i32, i32)) -> BlockState {
        self.blocks
            .get(&pos)
            .map(|index| self.palette[*index].clone())
            .unwrap_or_else(BlockState::air)
    }

    fn set_block(&mut self, pos: (i32, i32, i32), state: &BlockState) -> Result<()> {
        if !self.is_valid_height(pos.1) {
            return Err(StructureError::placement_io(pos, "outside the world height range"));
        }
        if self.denied.contains(&pos) {
            return Err(StructureError::placement_io(pos, "write denied"));
        }
        if self.block(pos).name != state.name {
            self.block_entities.remove(&pos);
        }
        self.put(pos, state.clone());
        self.writes += 1;
        Ok(())
    }

    fn biome(&self, pos: (i32, i32, i32)) -> String {
        self.biomes
            .get(&(pos.0, pos.2))
            .cloned()
            .unwrap_or_else(|| self.default_biome.clone())
    }

    fn block_entity(&self, pos: (i32, i32, i32)) -> Result<Option<BlockEntityData>> {
        if let Some(data) = self.block_entities.get(&pos) {
            return Ok(Some(data.clone()));
        }
        let state = self.block(pos);
        Ok(has_block_entity(&state.name).then(BlockEntityData::default))
    }

    fn set_block_entity(&mut self, pos: (i32, i32, i32), data: &BlockEntityData) -> Result<()> {
        let state = self.block(pos);
        if !has_block_entity(&state.name) {
            return Err(StructureError::placement_io(
                pos,
                format!("{} has no block entity", state.name),
            ));
        }
        self.block_entities.insert(pos, data.clone());
        Ok(())
    }

    fn entities_in(&self, bounds: &BoundingBox) -> Vec<EntitySnapshot> {
        self.entities
            .iter()
            .filter(|entity| bounds.contains(entity.block_pos()))
            .cloned()
            .collect()
    }

    fn spawn_entity(&mut self, spawn: &EntitySpawn) -> Result<()> {
        let block_y = spawn.pos.1.floor() as i32;
        if !self.is_valid_height(block_y) {
            return Err(StructureError::placement_io(
                (spawn.pos.0.floor() as i32, block_y, spawn.pos.2.floor() as i32),
                "entity outside the world height range",
            ));
        }
        let snapshot =
            EntitySnapshot::new(spawn.entity_type.clone(), spawn.pos).with_data(spawn.data.clone());
        self.entities.push(snapshot);
        Ok(())
    }

    fn autosave(&self) -> bool {
        self.autosave
    }

    fn set_autosave(&mut self, enabled: bool) {
        self.autosave = enabled;
    }

    fn yield_now(&mut self) {
        self.yields += 1;
    }

    fn schedule(&mut self, delay_ticks: u32, task: DeferredTask) {
        self.tasks.push((self.tick + delay_ticks as u64, task));
    }
}
