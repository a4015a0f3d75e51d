//! Classification of material ids. All functions accept namespaced or bare ids.

use crate::block_state::short_name;
use crate::transform::Direction;

const BLACKLISTED: &[&str] = &["air", "cave_air", "void_air", "structure_void", "barrier"];

const PHYSICS_SENSITIVE: &[&str] = &[
    "sand",
    "red_sand",
    "gravel",
    "suspicious_sand",
    "suspicious_gravel",
    "anvil",
    "chipped_anvil",
    "damaged_anvil",
    "scaffolding",
    "pointed_dripstone",
    "powder_snow",
];

const TALL_PLANTS: &[&str] = &[
    "tall_grass",
    "large_fern",
    "sunflower",
    "lilac",
    "rose_bush",
    "peony",
    "tall_seagrass",
    "pitcher_plant",
];

const NATURAL_GROUND: &[&str] = &[
    "grass_block",
    "dirt",
    "coarse_dirt",
    "podzol",
    "mycelium",
    "dirt_path",
    "rooted_dirt",
];

/// Fragments of ids that never block movement.
const NON_SOLID_FRAGMENTS: &[&str] = &[
    "sapling",
    "torch",
    "button",
    "pressure_plate",
    "sign",
    "rail",
    "carpet",
    "vine",
    "lichen",
    "fire",
    "tripwire",
    "redstone_wire",
    "dead_bush",
    "seagrass",
    "kelp",
    "banner",
    "lever",
    "tulip",
    "flower",
    "sculk_vein",
    "cobweb",
];

const NON_SOLID_EXACT: &[&str] = &[
    "short_grass",
    "grass",
    "tall_grass",
    "fern",
    "large_fern",
    "dandelion",
    "poppy",
    "blue_orchid",
    "allium",
    "azure_bluet",
    "oxeye_daisy",
    "cornflower",
    "lily_of_the_valley",
    "lily_pad",
    "sunflower",
    "lilac",
    "rose_bush",
    "peony",
    "brown_mushroom",
    "red_mushroom",
    "snow",
    "sugar_cane",
    "wheat",
    "carrots",
    "potatoes",
    "beetroots",
];

const WOOD_SPECIES: &[&str] = &[
    "oak_",
    "spruce_",
    "birch_",
    "jungle_",
    "acacia_",
    "dark_oak_",
    "mangrove_",
    "cherry_",
    "bamboo_",
];

const FLAMMABLE_FRAGMENTS: &[&str] = &[
    "planks",
    "_log",
    "_wood",
    "leaves",
    "wool",
    "bookshelf",
    "hay_block",
    "tnt",
    "vine",
    "scaffolding",
    "target",
];

/// Voxels that are never recorded and never written back.
pub fn is_blacklisted(name: &str) -> bool {
    BLACKLISTED.contains(&short_name(name))
}

pub fn is_air(name: &str) -> bool {
    matches!(short_name(name), "air" | "cave_air" | "void_air")
}

/// Subject to gravity or support rules in the host simulation.
pub fn is_physics_sensitive(name: &str) -> bool {
    let short = short_name(name);
    PHYSICS_SENSITIVE.contains(&short) || short.ends_with("_concrete_powder")
}

/// Doors, but not trapdoors.
pub fn is_door(name: &str) -> bool {
    let short = short_name(name);
    short.ends_with("_door") || short == "door"
}

/// Blocks made of two voxels that must be written as a pair.
pub fn is_multi_block(name: &str) -> bool {
    let short = short_name(name);
    short.ends_with("_bed") || is_door(name) || TALL_PLANTS.contains(&short)
}

pub fn is_complex(name: &str) -> bool {
    is_door(name) || is_multi_block(name)
}

/// Blocks whose shape depends on which neighbours they connect to.
pub fn is_multi_facing(name: &str) -> bool {
    let short = short_name(name);
    if short.ends_with("_pane") || short.ends_with("glass_pane") {
        return true;
    }
    if short.contains("_fence") && !short.contains("_gate") {
        return true;
    }
    matches!(
        short,
        "iron_bars"
            | "fire"
            | "soul_fire"
            | "tripwire"
            | "glow_lichen"
            | "sculk_vein"
            | "vine"
            | "chorus_plant"
    )
}

/// The faces a multi-facing block exposes as connection properties.
pub fn allowed_faces(name: &str) -> &'static [Direction] {
    const UP_AND_SIDES: &[Direction] = &[
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::Up,
    ];
    match short_name(name) {
        "vine" | "fire" | "soul_fire" => UP_AND_SIDES,
        "glow_lichen" | "sculk_vein" | "chorus_plant" => &Direction::ALL,
        _ if is_multi_facing(name) => &Direction::HORIZONTAL,
        _ => &[],
    }
}

pub fn is_fence_gate(name: &str) -> bool {
    short_name(name).ends_with("_fence_gate")
}

/// Pillar-like blocks whose only orientation is an axis.
pub fn is_log_like(name: &str) -> bool {
    let short = short_name(name);
    short.contains("log")
        || short.contains("wood")
        || short.contains("pillar")
        || short == "hay_block"
        || short == "bone_block"
}

pub fn is_log(name: &str) -> bool {
    let short = short_name(name);
    short.ends_with("_log") || (short.ends_with("_wood") && !short.starts_with("stripped_"))
}

pub fn is_leaves(name: &str) -> bool {
    short_name(name).ends_with("_leaves")
}

pub fn is_sapling(name: &str) -> bool {
    let short = short_name(name);
    short.ends_with("_sapling") || short == "mangrove_propagule"
}

pub fn is_tree_block(name: &str) -> bool {
    is_log(name) || is_leaves(name) || is_sapling(name)
}

/// Air and leaves, which the surface scan looks through.
pub fn is_foliage_or_air(name: &str) -> bool {
    is_air(name) || is_leaves(name)
}

pub fn is_natural_ground(name: &str) -> bool {
    NATURAL_GROUND.contains(&short_name(name))
}

pub fn is_water(name: &str) -> bool {
    short_name(name).contains("water")
}

pub fn is_lava(name: &str) -> bool {
    short_name(name).contains("lava")
}

pub fn is_bedrock(name: &str) -> bool {
    short_name(name) == "bedrock"
}

pub fn is_glass(name: &str) -> bool {
    short_name(name).contains("glass")
}

pub fn is_solid(name: &str) -> bool {
    let short = short_name(name);
    if is_air(name) || is_water(name) || is_lava(name) || is_blacklisted(name) {
        return false;
    }
    if NON_SOLID_EXACT.contains(&short) {
        return false;
    }
    !NON_SOLID_FRAGMENTS.iter().any(|fragment| short.contains(fragment))
}

pub fn is_flammable(name: &str) -> bool {
    let short = short_name(name);
    if FLAMMABLE_FRAGMENTS.iter().any(|fragment| short.contains(fragment)) {
        return true;
    }
    WOOD_SPECIES.iter().any(|species| short.starts_with(species))
        && (short.ends_with("_fence")
            || short.ends_with("_fence_gate")
            || short.ends_with("_stairs")
            || short.ends_with("_slab")
            || short.ends_with("_door"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blacklist() {
        assert!(is_blacklisted("minecraft:air"));
        assert!(is_blacklisted("structure_void"));
        assert!(is_blacklisted("minecraft:barrier"));
        assert!(!is_blacklisted("minecraft:glass"));
    }

    #[test]
    fn test_doors_and_multi_blocks() {
        assert!(is_door("minecraft:oak_door"));
        assert!(is_door("iron_door"));
        assert!(!is_door("minecraft:oak_trapdoor"));
        assert!(is_multi_block("minecraft:red_bed"));
        assert!(is_multi_block("minecraft:peony"));
        assert!(!is_multi_block("minecraft:bedrock"));
        assert!(is_complex("minecraft:tall_grass"));
    }

    #[test]
    fn test_physics_sensitive() {
        assert!(is_physics_sensitive("minecraft:sand"));
        assert!(is_physics_sensitive("minecraft:lime_concrete_powder"));
        assert!(is_physics_sensitive("minecraft:damaged_anvil"));
        assert!(!is_physics_sensitive("minecraft:sandstone"));
    }

    #[test]
    fn test_multi_facing() {
        assert!(is_multi_facing("minecraft:glass_pane"));
        assert!(is_multi_facing("minecraft:red_stained_glass_pane"));
        assert!(is_multi_facing("minecraft:oak_fence"));
        assert!(is_multi_facing("minecraft:nether_brick_fence"));
        assert!(!is_multi_facing("minecraft:oak_fence_gate"));
        assert!(is_multi_facing("minecraft:vine"));
        assert!(!is_multi_facing("minecraft:stone"));

        assert_eq!(allowed_faces("minecraft:oak_fence").len(), 4);
        assert_eq!(allowed_faces("minecraft:vine").len(), 5);
        assert_eq!(allowed_faces("minecraft:glow_lichen").len(), 6);
        assert!(allowed_faces("minecraft:stone").is_empty());
    }

    #[test]
    fn test_trees() {
        assert!(is_log("minecraft:oak_log"));
        assert!(is_log("minecraft:stripped_birch_log"));
        assert!(is_log("minecraft:jungle_wood"));
        assert!(is_leaves("minecraft:cherry_leaves"));
        assert!(is_sapling("minecraft:mangrove_propagule"));
        assert!(is_tree_block("minecraft:spruce_sapling"));
        assert!(!is_tree_block("minecraft:oak_planks"));
    }

    #[test]
    fn test_log_like() {
        assert!(is_log_like("minecraft:oak_log"));
        assert!(is_log_like("minecraft:quartz_pillar"));
        assert!(is_log_like("minecraft:hay_block"));
        assert!(is_log_like("minecraft:bone_block"));
        assert!(!is_log_like("minecraft:stone_bricks"));
    }

    #[test]
    fn test_solid_and_flammable() {
        assert!(is_solid("minecraft:stone"));
        assert!(is_solid("minecraft:glass"));
        assert!(is_solid("minecraft:grass_block"));
        assert!(!is_solid("minecraft:short_grass"));
        assert!(!is_solid("minecraft:water"));
        assert!(!is_solid("minecraft:torch"));
        assert!(!is_solid("minecraft:air"));

        assert!(is_flammable("minecraft:oak_planks"));
        assert!(is_flammable("minecraft:white_wool"));
        assert!(is_flammable("minecraft:spruce_fence"));
        assert!(!is_flammable("minecraft:stone"));
        assert!(!is_flammable("minecraft:nether_brick_fence"));
    }
}
