use crate::block_state::BlockState;
use crate::materials;
use crate::world::Staging;

/// Scan ceiling and floor, independent of how tall the world is.
const SCAN_TOP: i32 = 320;
const SCAN_BOTTOM: i32 = -64;

/// Y of the first air or leaf cell above the ground in column `(x, z)`.
/// The ground block itself sits one below.
///
/// Scans downward for a non-air, non-leaf block with air or leaves above it.
/// Columns without one fall back to the top solid non-bedrock block, then to
/// `default_y`.
pub fn find_surface(view: &Staging, x: i32, z: i32, default_y: i32) -> i32 {
    let world = view.world();
    let top = world.max_height().min(SCAN_TOP);
    let bottom = world.min_height().max(SCAN_BOTTOM);

    for y in (bottom..=top).rev() {
        let block = view.block((x, y, z));
        if materials::is_foliage_or_air(&block.name) {
            continue;
        }
        let above = view.block((x, y + 1, z));
        if materials::is_foliage_or_air(&above.name) {
            return y + 1;
        }
    }

    for y in (bottom..=top).rev() {
        let block = view.block((x, y, z));
        if materials::is_solid(&block.name) && !materials::is_bedrock(&block.name) {
            return y + 1;
        }
    }

    default_y
}

/// The block a freshly shaped surface in `biome` should be topped with.
pub fn biome_surface(biome: &str) -> BlockState {
    let biome = biome.to_lowercase();
    let material = if biome.contains("desert") || biome.contains("beach") {
        "sand"
    } else if biome.contains("snow") || biome.contains("frozen") {
        "snow_block"
    } else if biome.contains("mesa") || biome.contains("badlands") {
        "red_sand"
    } else if biome.contains("mushroom") {
        "mycelium"
    } else if biome.contains("swamp") {
        "mud"
    } else {
        "grass_block"
    };
    BlockState::new(material)
}
