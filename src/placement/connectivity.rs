//! Recomputes neighbour connections of panes, fences, bars, vines and similar
//! blocks once everything around them has been written.

use crate::block_state::short_name;
use crate::materials;
use crate::properties::bool_str;
use crate::world::{Staging, VoxelWrite, World};

/// Whether a `material` voxel connects towards a `neighbor` voxel.
pub fn should_connect(material: &str, neighbor: &str) -> bool {
    let own = short_name(material);
    let other = short_name(neighbor);

    if is_pane(own) {
        is_pane(other)
            || materials::is_glass(other)
            || other == "iron_bars"
            || materials::is_solid(other)
    } else if own == "iron_bars" {
        other == "iron_bars" || is_pane(other) || materials::is_solid(other)
    } else if is_fence(own) {
        other.contains("_fence") || materials::is_solid(other)
    } else if own == "vine" {
        materials::is_solid(other)
    } else if own == "fire" || own == "soul_fire" {
        materials::is_solid(other) || materials::is_flammable(other)
    } else {
        own == other
    }
}

fn is_pane(short: &str) -> bool {
    short.ends_with("_pane")
}

fn is_fence(short: &str) -> bool {
    short.contains("_fence") && !short.contains("_gate")
}

/// Rewrites the connection faces of every voxel in `positions` from its live
/// neighbours. Only voxels whose state changes are returned.
pub fn plan_updates(world: &dyn World, positions: &[(i32, i32, i32)]) -> Vec<VoxelWrite> {
    let mut staging = Staging::new(world);
    for &pos in positions {
        let current = staging.block(pos);
        if !materials::is_multi_facing(&current.name) {
            continue;
        }
        let mut updated = current.clone();
        for face in materials::allowed_faces(&current.name) {
            let neighbor = staging.block(face.relative(pos));
            let connected = should_connect(&current.name, &neighbor.name);
            updated.set_property(face.as_str(), bool_str(connected));
        }
        if updated != current {
            staging.set(pos, updated);
        }
    }
    staging.into_writes()
}
