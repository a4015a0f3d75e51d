//! Writes a [`Structure`] into a world.
//!
//! Placement is computed up front as a [`PlacementPlan`] and then applied in
//! three phases: ordinary blocks, gravity-affected blocks, then doors and other
//! two-voxel blocks. Block entities and free entities follow, then a
//! connectivity pass fixes up panes, fences and similar blocks against their
//! final neighbours. Per-voxel failures never abort a placement; they are
//! logged and collected in the [`PlacementReport`].

pub mod connectivity;
pub mod loot;
pub mod plan;

pub use loot::{ItemLootProcessor, LootProcessor, LootTable};
pub use plan::{PlacementPlan, Phase};

use crate::block_entity::ContainerKind;
use crate::config::PlacementConfig;
use crate::entity::EntitySpawn;
use crate::structure::Structure;
use crate::transform::Rotation;
use crate::world::World;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationChoice {
    Fixed(Rotation),
    Random,
}

impl RotationChoice {
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Rotation {
        match self {
            RotationChoice::Fixed(rotation) => rotation,
            RotationChoice::Random => Rotation::random(rng),
        }
    }
}

impl From<Rotation> for RotationChoice {
    fn from(rotation: Rotation) -> Self {
        RotationChoice::Fixed(rotation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The voxel fell outside the world height range and was not written.
    OutOfBounds,
    WriteRejected,
    BlockEntityRestore,
    EntitySpawn,
    ConnectionUpdate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementFailure {
    pub pos: (i32, i32, i32),
    pub kind: FailureKind,
    pub reason: String,
}

/// Outcome of one placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementReport {
    pub rotation: Rotation,
    pub blocks_placed: u64,
    pub skipped_out_of_bounds: u64,
    pub block_entities_restored: usize,
    pub entities_spawned: usize,
    pub connections_updated: usize,
    pub loot_containers_queued: usize,
    pub failures: Vec<PlacementFailure>,
}

impl PlacementReport {
    fn new(rotation: Rotation) -> Self {
        PlacementReport {
            rotation,
            blocks_placed: 0,
            skipped_out_of_bounds: 0,
            block_entities_restored: 0,
            entities_spawned: 0,
            connections_updated: 0,
            loot_containers_queued: 0,
            failures: Vec::new(),
        }
    }

    pub fn failures_of(&self, kind: FailureKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }

    fn fail(&mut self, pos: (i32, i32, i32), kind: FailureKind, reason: impl ToString) {
        self.failures.push(PlacementFailure {
            pos,
            kind,
            reason: reason.to_string(),
        });
    }
}

/// Suspends world autosave while alive and restores the previous setting on drop.
struct AutosaveGuard<'a> {
    world: &'a mut dyn World,
    previous: Option<bool>,
}

impl<'a> AutosaveGuard<'a> {
    fn new(world: &'a mut dyn World, suspend: bool) -> Self {
        let previous = suspend.then(|| world.autosave());
        if suspend {
            world.set_autosave(false);
        }
        AutosaveGuard { world, previous }
    }
}

impl<'a> Deref for AutosaveGuard<'a> {
    type Target = dyn World + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.world
    }
}

impl<'a> DerefMut for AutosaveGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.world
    }
}

impl Drop for AutosaveGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous {
            self.world.set_autosave(previous);
        }
    }
}

pub struct StructurePlacer {
    pub config: PlacementConfig,
}

impl Default for StructurePlacer {
    fn default() -> Self {
        StructurePlacer::new(PlacementConfig::default())
    }
}

impl StructurePlacer {
    pub fn new(config: PlacementConfig) -> Self {
        StructurePlacer { config }
    }

    pub fn place<R: Rng + ?Sized>(
        &self,
        world: &mut dyn World,
        structure: &Structure,
        origin: (i32, i32, i32),
        rotation: RotationChoice,
        loot: Option<Arc<dyn LootProcessor>>,
        rng: &mut R,
    ) -> PlacementReport {
        let rotation = rotation.resolve(rng);
        let plan = PlacementPlan::build(structure, origin, rotation, &*world);
        let mut report = PlacementReport::new(rotation);

        let suspend = structure.total_blocks() > self.config.autosave_threshold;
        let mut world = AutosaveGuard::new(world, suspend);

        for &pos in &plan.out_of_bounds {
            report.skipped_out_of_bounds += 1;
            report.fail(pos, FailureKind::OutOfBounds, "outside the world height range");
        }

        self.write_blocks(&mut *world, &plan, &mut report);
        let pending_loot = self.restore_block_entities(
            &mut *world,
            structure,
            &plan,
            loot.as_deref(),
            &mut report,
        );
        self.spawn_entities(&mut *world, structure, &plan, &mut report);

        if self.config.update_connections && !plan.connectable.is_empty() {
            let writes = connectivity::plan_updates(&*world, &plan.connectable);
            for write in &writes {
                match world.set_block(write.pos, &write.state) {
                    Ok(()) => report.connections_updated += 1,
                    Err(err) => {
                        warn!("Failed to update connections at {:?}: {}", write.pos, err);
                        report.fail(write.pos, FailureKind::ConnectionUpdate, err);
                    }
                }
            }
        }

        if let (Some(loot), false) = (loot, pending_loot.is_empty()) {
            report.loot_containers_queued = pending_loot.len();
            let seed = rng.gen::<u64>();
            world.schedule(
                self.config.loot_delay_ticks,
                Box::new(move |world: &mut dyn World| {
                    let mut rng = StdRng::seed_from_u64(seed);
                    for (pos, kind) in pending_loot {
                        if let Err(err) = loot.process_container(world, pos, kind, &mut rng) {
                            warn!("Loot processing failed for {} at {:?}: {}", kind, pos, err);
                        }
                    }
                }),
            );
        }

        info!(
            "Placed '{}' at {:?} rotated {}: {} blocks, {} block entities, {} entities, {} failures",
            structure.id,
            origin,
            rotation,
            report.blocks_placed,
            report.block_entities_restored,
            report.entities_spawned,
            report.failures.len()
        );
        report
    }

    fn write_blocks(
        &self,
        world: &mut dyn World,
        plan: &PlacementPlan,
        report: &mut PlacementReport,
    ) {
        let per_yield = self.config.blocks_per_yield.max(1) as u64;
        let mut attempted = 0u64;

        for phase in Phase::ALL {
            let writes = plan.phase(phase);
            debug!("Phase {}: {} voxels", phase.as_str(), writes.len());
            for write in writes {
                match world.set_block(write.pos, &write.state) {
                    Ok(()) => report.blocks_placed += 1,
                    Err(err) => {
                        warn!("Failed to place {} at {:?}: {}", write.state, write.pos, err);
                        report.fail(write.pos, FailureKind::WriteRejected, err);
                    }
                }
                attempted += 1;
                if attempted % per_yield == 0 {
                    world.yield_now();
                }
            }
        }
    }

    /// Restores saved container, furnace and spawner data. Containers the loot
    /// processor handles are returned instead of being filled from saved data.
    fn restore_block_entities(
        &self,
        world: &mut dyn World,
        structure: &Structure,
        plan: &PlacementPlan,
        loot: Option<&dyn LootProcessor>,
        report: &mut PlacementReport,
    ) -> Vec<((i32, i32, i32), ContainerKind)> {
        let mut pending = Vec::new();
        for record in &structure.block_entities {
            let pos = plan.to_world(record.pos);
            if !world.is_valid_height(pos.1) {
                continue;
            }
            let kind = ContainerKind::from_material(&record.block_type);
            if let (Some(loot), Some(kind)) = (loot, kind) {
                if loot.has_loot_for(kind) {
                    pending.push((pos, kind));
                    continue;
                }
            }
            match world.set_block_entity(pos, &record.data) {
                Ok(()) => report.block_entities_restored += 1,
                Err(err) => {
                    warn!("Failed to restore {} at {:?}: {}", record.block_type, pos, err);
                    report.fail(pos, FailureKind::BlockEntityRestore, err);
                }
            }
        }
        pending
    }

    fn spawn_entities(
        &self,
        world: &mut dyn World,
        structure: &Structure,
        plan: &PlacementPlan,
        report: &mut PlacementReport,
    ) {
        for record in &structure.entities {
            let spawn = EntitySpawn::from_record(record, plan.origin, plan.rotation);
            match world.spawn_entity(&spawn) {
                Ok(()) => report.entities_spawned += 1,
                Err(err) => {
                    warn!("Failed to spawn {} at {:?}: {}", spawn.entity_type, spawn.pos, err);
                    let block = (
                        spawn.pos.0.floor() as i32,
                        spawn.pos.1.floor() as i32,
                        spawn.pos.2.floor() as i32,
                    );
                    report.fail(block, FailureKind::EntitySpawn, err);
                }
            }
        }
    }
}
