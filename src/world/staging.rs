use super::World;
use crate::block_state::BlockState;
use crate::error::StructureError;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelWrite {
    pub pos: (i32, i32, i32),
    pub state: BlockState,
}

/// Pending writes layered over a read-only world. Reads see staged values, so a
/// multi-step plan can be computed without touching the world, then applied once.
pub struct Staging<'w> {
    world: &'w dyn World,
    pending: FxHashMap<(i32, i32, i32), BlockState>,
    order: Vec<(i32, i32, i32)>,
}

impl<'w> Staging<'w> {
    pub fn new(world: &'w dyn World) -> Self {
        Staging {
            world,
            pending: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    pub fn world(&self) -> &'w dyn World {
        self.world
    }

    pub fn block(&self, pos: (i32, i32, i32)) -> BlockState {
        match self.pending.get(&pos) {
            Some(state) => state.clone(),
            None => self.world.block(pos),
        }
    }

    pub fn set(&mut self, pos: (i32, i32, i32), state: BlockState) {
        if self.pending.insert(pos, state).is_none() {
            self.order.push(pos);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Final state of every touched voxel, in first-touched order.
    pub fn into_writes(mut self) -> Vec<VoxelWrite> {
        self.order
            .iter()
            .filter_map(|pos| {
                self.pending
                    .remove(pos)
                    .map(|state| VoxelWrite { pos: *pos, state })
            })
            .collect()
    }
}

/// Applies `writes` in order, collecting the ones the world rejected.
pub fn apply_writes(world: &mut dyn World, writes: &[VoxelWrite]) -> Vec<StructureError> {
    writes
        .iter()
        .filter_map(|write| world.set_block(write.pos, &write.state).err())
        .collect()
}
