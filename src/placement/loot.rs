//! Loot filling for containers placed with a structure.

use crate::block_entity::{ContainerKind, ItemStack};
use crate::error::Result;
use crate::world::World;
use log::debug;
use rand::{Rng, RngCore};
use rustc_hash::FxHashMap;
use std::str::FromStr;

/// Fills freshly placed containers. Runs a few ticks after placement so the host
/// has created the container's block entity.
pub trait LootProcessor {
    fn has_loot_for(&self, kind: ContainerKind) -> bool;

    fn process_container(
        &self,
        world: &mut dyn World,
        pos: (i32, i32, i32),
        kind: ContainerKind,
        rng: &mut dyn RngCore,
    ) -> Result<()>;
}

/// Built-in item tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LootTable {
    VillageHouse,
    Dungeon,
    Treasure,
    Default,
}

impl LootTable {
    pub fn as_str(self) -> &'static str {
        match self {
            LootTable::VillageHouse => "village_house",
            LootTable::Dungeon => "dungeon",
            LootTable::Treasure => "treasure",
            LootTable::Default => "default",
        }
    }

    pub fn roll(self, rng: &mut dyn RngCore) -> Vec<ItemStack> {
        let mut items = Vec::new();
        match self {
            LootTable::VillageHouse => {
                items.push(ItemStack::new("minecraft:bread", rng.gen_range(1..=3)));
                if rng.gen_bool(0.5) {
                    items.push(ItemStack::new("minecraft:wheat", rng.gen_range(1..=5)));
                }
            }
            LootTable::Dungeon => {
                items.push(ItemStack::new("minecraft:iron_ingot", rng.gen_range(1..=3)));
                if rng.gen::<f32>() < 0.3 {
                    items.push(ItemStack::new("minecraft:diamond", 1));
                }
            }
            LootTable::Treasure => {
                items.push(ItemStack::new("minecraft:gold_ingot", rng.gen_range(2..=6)));
                items.push(ItemStack::new("minecraft:emerald", rng.gen_range(1..=3)));
            }
            LootTable::Default => {
                items.push(ItemStack::new("minecraft:cobblestone", rng.gen_range(1..=10)));
            }
        }
        items
    }
}

impl FromStr for LootTable {
    type Err = String;

    /// Unknown names fall back to the default table.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "village_house" => LootTable::VillageHouse,
            "dungeon" => LootTable::Dungeon,
            "treasure" => LootTable::Treasure,
            _ => LootTable::Default,
        })
    }
}

/// Item containers that accept loot. Furnaces, hoppers and dispensers do not.
fn accepts_loot(kind: ContainerKind) -> bool {
    matches!(
        kind,
        ContainerKind::Chest | ContainerKind::Barrel | ContainerKind::ShulkerBox
    )
}

/// Per-kind tables and fixed item lists, added to the first free slots.
#[derive(Debug, Clone, Default)]
pub struct ItemLootProcessor {
    tables: FxHashMap<ContainerKind, LootTable>,
    custom: FxHashMap<ContainerKind, Vec<ItemStack>>,
}

impl ItemLootProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_loot_table(&mut self, kind: ContainerKind, table: LootTable) {
        self.tables.insert(kind, table);
    }

    pub fn add_custom_loot(&mut self, kind: ContainerKind, items: Vec<ItemStack>) {
        self.custom.insert(kind, items);
    }

    pub fn add_custom_item(&mut self, kind: ContainerKind, item: ItemStack) {
        self.custom.entry(kind).or_default().push(item);
    }

    pub fn items_for(&self, kind: ContainerKind, rng: &mut dyn RngCore) -> Vec<ItemStack> {
        let mut items = self
            .tables
            .get(&kind)
            .map(|table| table.roll(rng))
            .unwrap_or_default();
        if let Some(custom) = self.custom.get(&kind) {
            items.extend(custom.iter().cloned());
        }
        items
    }
}

impl LootProcessor for ItemLootProcessor {
    fn has_loot_for(&self, kind: ContainerKind) -> bool {
        self.tables.contains_key(&kind) || self.custom.contains_key(&kind)
    }

    fn process_container(
        &self,
        world: &mut dyn World,
        pos: (i32, i32, i32),
        kind: ContainerKind,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        let items = self.items_for(kind, rng);
        if !accepts_loot(kind) {
            return Ok(());
        }
        let mut data = world.block_entity(pos)?.unwrap_or_default();
        let mut added = 0;
        for item in items {
            if data.add_item(item, kind.capacity()).is_none() {
                break;
            }
            added += 1;
        }
        world.set_block_entity(pos, &data)?;
        debug!("Added {} loot items to {} at {:?}", added, kind, pos);
        Ok(())
    }
}
