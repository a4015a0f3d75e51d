//! The ordered voxel writes of a placement, computed without touching the world.

use crate::block_state::BlockState;
use crate::materials;
use crate::properties::{build_state, Half, PropertyBag};
use crate::region::{BlockData, RegionDescriptor};
use crate::structure::Structure;
use crate::transform::{rotate_position, Direction, Rotation};
use crate::world::{VoxelWrite, World};
use std::collections::BTreeMap;

/// Placement order of region groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Everything that is neither gravity-affected nor multi-voxel.
    Ordinary,
    /// Gravity-affected blocks, once their support exists.
    PhysicsSensitive,
    /// Doors and other two-voxel blocks, last.
    Complex,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Ordinary, Phase::PhysicsSensitive, Phase::Complex];

    pub fn of(region: &RegionDescriptor) -> Phase {
        if region.is_complex() {
            Phase::Complex
        } else if region.is_physics_sensitive() {
            Phase::PhysicsSensitive
        } else {
            Phase::Ordinary
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Ordinary => "ordinary",
            Phase::PhysicsSensitive => "physics-sensitive",
            Phase::Complex => "complex",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementPlan {
    pub origin: (i32, i32, i32),
    pub rotation: Rotation,
    phases: [Vec<VoxelWrite>; 3],
    /// Absolute positions dropped because they fall outside the world height.
    pub out_of_bounds: Vec<(i32, i32, i32)>,
    /// Written voxels whose shape depends on their neighbours.
    pub connectable: Vec<(i32, i32, i32)>,
}

impl PlacementPlan {
    pub fn build(
        structure: &Structure,
        origin: (i32, i32, i32),
        rotation: Rotation,
        world: &dyn World,
    ) -> PlacementPlan {
        let mut plan = PlacementPlan {
            origin,
            rotation,
            phases: Default::default(),
            out_of_bounds: Vec::new(),
            connectable: Vec::new(),
        };

        for phase in Phase::ALL {
            for region in structure.regions.iter().filter(|r| Phase::of(r) == phase) {
                match region {
                    RegionDescriptor::Individual { blocks } => {
                        plan.add_individual(phase, blocks, world)
                    }
                    _ => region.for_each_voxel(|pos, material, properties| {
                        let state = build_state(material, properties, rotation);
                        plan.push(phase, plan.to_world(pos), state, world);
                    }),
                }
            }
        }
        plan
    }

    pub fn to_world(&self, local: (i32, i32, i32)) -> (i32, i32, i32) {
        let (x, y, z) = rotate_position(local, self.rotation);
        (x + self.origin.0, y + self.origin.1, z + self.origin.2)
    }

    pub fn phase(&self, phase: Phase) -> &[VoxelWrite] {
        &self.phases[phase.index()]
    }

    /// Every write, phase by phase.
    pub fn writes(&self) -> impl Iterator<Item = (Phase, &VoxelWrite)> {
        Phase::ALL
            .into_iter()
            .flat_map(move |phase| self.phase(phase).iter().map(move |write| (phase, write)))
    }

    pub fn len(&self) -> usize {
        self.phases.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, phase: Phase, pos: (i32, i32, i32), state: BlockState, world: &dyn World) {
        if !world.is_valid_height(pos.1) {
            self.out_of_bounds.push(pos);
            return;
        }
        if materials::is_multi_facing(&state.name) {
            self.connectable.push(pos);
        }
        self.phases[phase.index()].push(VoxelWrite { pos, state });
    }

    fn add_individual(&mut self, phase: Phase, blocks: &[BlockData], world: &dyn World) {
        let (pairs, rest) = pair_doors(blocks, self.rotation);

        for [lower, upper] in pairs {
            let lower_pos = self.to_world(lower.pos);
            let upper_pos = self.to_world(upper.pos);
            if !world.is_valid_height(lower_pos.1) || !world.is_valid_height(upper_pos.1) {
                self.out_of_bounds.push(lower_pos);
                self.out_of_bounds.push(upper_pos);
                continue;
            }
            for (block, pos) in [(lower, lower_pos), (upper, upper_pos)] {
                let state = build_state(&block.material, block.properties.as_ref(), self.rotation);
                self.push(phase, pos, state, world);
            }
        }

        for block in rest {
            let state = if materials::is_log_like(&block.material) {
                let mut state = BlockState::new(&block.material);
                if let Some(properties) = &block.properties {
                    properties.apply_axis(&mut state, self.rotation);
                }
                state
            } else {
                build_state(&block.material, block.properties.as_ref(), self.rotation)
            };
            self.push(phase, self.to_world(block.pos), state, world);
        }
    }
}

/// Splits `blocks` into complete door pairs, lower half first, and everything else.
///
/// Doors group by rotated X/Z plus rotated facing. A group is a pair only when it
/// holds exactly two halves one voxel apart vertically.
pub fn pair_doors(
    blocks: &[BlockData],
    rotation: Rotation,
) -> (Vec<[&BlockData; 2]>, Vec<&BlockData>) {
    let mut groups: BTreeMap<(i32, i32, Direction), Vec<&BlockData>> = BTreeMap::new();
    let mut rest = Vec::new();

    for block in blocks {
        match door_key(block, rotation) {
            Some(key) => groups.entry(key).or_default().push(block),
            None => rest.push(block),
        }
    }

    let mut pairs = Vec::new();
    for (_, mut group) in groups {
        if group.len() == 2 && (group[0].pos.1 - group[1].pos.1).abs() == 1 {
            group.sort_by_key(|block| block.pos.1);
            pairs.push([group[0], group[1]]);
        } else {
            rest.extend(group);
        }
    }
    (pairs, rest)
}

fn door_key(block: &BlockData, rotation: Rotation) -> Option<(i32, i32, Direction)> {
    if !materials::is_door(&block.material) {
        return None;
    }
    let properties: &PropertyBag = block.properties.as_ref()?;
    let facing = properties.facing?;
    properties.half.filter(|h| matches!(h, Half::Upper | Half::Lower))?;
    let (x, _, z) = rotate_position(block.pos, rotation);
    Some((x, z, facing.rotate(rotation)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::SpanRegion;
    use crate::transform::Axis;
    use crate::world::MemoryWorld;

    fn door(pos: (i32, i32, i32), half: Half) -> BlockData {
        let properties = PropertyBag {
            facing: Some(Direction::North),
            half: Some(half),
            ..PropertyBag::default()
        };
        BlockData::new(pos, "minecraft:oak_door", Some(properties))
    }

    #[test]
    fn test_phases_are_disjoint() {
        let sand = RegionDescriptor::Fill(SpanRegion::new(
            (0, 0, 0),
            (1, 1, 1),
            "minecraft:sand",
            None,
        ));
        let stone = RegionDescriptor::Fill(SpanRegion::new(
            (0, 0, 0),
            (1, 1, 1),
            "minecraft:stone",
            None,
        ));
        let bed =
            RegionDescriptor::individual(BlockData::new((0, 0, 0), "minecraft:red_bed", None));
        let door = RegionDescriptor::individual(door((0, 0, 0), Half::Lower));
        assert_eq!(Phase::of(&stone), Phase::Ordinary);
        assert_eq!(Phase::of(&sand), Phase::PhysicsSensitive);
        assert_eq!(Phase::of(&bed), Phase::Complex);
        assert_eq!(Phase::of(&door), Phase::Complex);
    }

    #[test]
    fn test_door_pairs_need_vertical_neighbours() {
        let blocks = vec![
            door((0, 1, 0), Half::Upper),
            door((0, 0, 0), Half::Lower),
            door((3, 0, 0), Half::Lower),
            door((3, 2, 0), Half::Upper),
            BlockData::new((5, 0, 0), "minecraft:torch", None),
        ];
        let (pairs, rest) = pair_doors(&blocks, Rotation::Clockwise90);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0][0].pos, (0, 0, 0));
        assert_eq!(pairs[0][1].pos, (0, 1, 0));
        assert_eq!(rest.len(), 3);
    }

    #[test]
    fn test_plan_orders_phases_and_skips_out_of_bounds() {
        let mut structure = Structure::new("plan", (2, 3, 1));
        structure.regions = vec![
            RegionDescriptor::individual(BlockData::new((0, 2, 0), "minecraft:sand", None)),
            RegionDescriptor::Fill(SpanRegion::new((0, 0, 0), (1, 1, 0), "minecraft:stone", None)),
        ];
        let world = MemoryWorld::new("world").with_height_range(0, 64);

        let plan = PlacementPlan::build(&structure, (10, 0, 10), Rotation::None, &world);
        let order: Vec<_> = plan.writes().map(|(_, w)| w.state.short_name().to_string()).collect();
        assert_eq!(order, vec!["stone", "stone", "stone", "stone", "sand"]);

        let plan = PlacementPlan::build(&structure, (10, 64, 10), Rotation::None, &world);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.out_of_bounds.len(), 3);
    }

    #[test]
    fn test_log_like_individuals_keep_only_axis() {
        let properties = PropertyBag {
            axis: Some(Axis::X),
            ..PropertyBag::default()
        };
        let mut structure = Structure::new("log", (1, 1, 1));
        structure.regions = vec![RegionDescriptor::individual(BlockData::new(
            (0, 0, 0),
            "minecraft:oak_log",
            Some(properties),
        ))];
        let world = MemoryWorld::new("world");

        let plan = PlacementPlan::build(&structure, (0, 64, 0), Rotation::Clockwise90, &world);
        let write = &plan.phase(Phase::Ordinary)[0];
        assert_eq!(write.state.get_property("axis").map(|v| v.as_str()), Some("z"));
    }

    #[test]
    fn test_multi_facing_voxels_are_connectable() {
        let mut structure = Structure::new("fence", (3, 1, 1));
        structure.regions = vec![RegionDescriptor::Line(SpanRegion::new(
            (0, 0, 0),
            (2, 0, 0),
            "minecraft:oak_fence",
            None,
        ))];
        let world = MemoryWorld::new("world");
        let plan = PlacementPlan::build(&structure, (0, 64, 0), Rotation::None, &world);
        assert_eq!(plan.connectable, vec![(0, 64, 0), (1, 64, 0), (2, 64, 0)]);
    }
}
