use crate::block_state::short_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: String,
    pub amount: u32,
}

impl ItemStack {
    pub fn new(material: impl Into<String>, amount: u32) -> Self {
        ItemStack {
            material: material.into(),
            amount,
        }
    }
}

/// Saved state of a container, furnace or spawner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockEntityData {
    /// Slot index to item. Empty slots are absent.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inventory: BTreeMap<u32, ItemStack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn_time: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawned_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<i32>,
}

impl BlockEntityData {
    pub fn is_empty(&self) -> bool {
        self.inventory.is_empty()
            && self.burn_time.is_none()
            && self.cook_time.is_none()
            && self.spawned_type.is_none()
            && self.delay.is_none()
    }

    /// Puts `item` into the lowest free slot below `capacity`. Returns the slot,
    /// or `None` when the container is full.
    pub fn add_item(&mut self, item: ItemStack, capacity: u32) -> Option<u32> {
        let slot = (0..capacity).find(|slot| !self.inventory.contains_key(slot))?;
        self.inventory.insert(slot, item);
        Some(slot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEntityRecord {
    pub pos: (i32, i32, i32),
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub data: BlockEntityData,
}

impl BlockEntityRecord {
    pub fn new(pos: (i32, i32, i32), block_type: impl Into<String>, data: BlockEntityData) -> Self {
        BlockEntityRecord {
            pos,
            block_type: block_type.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Chest,
    Barrel,
    ShulkerBox,
    Dispenser,
    Dropper,
    Hopper,
    Furnace,
    BlastFurnace,
    Smoker,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 9] = [
        ContainerKind::Chest,
        ContainerKind::Barrel,
        ContainerKind::ShulkerBox,
        ContainerKind::Dispenser,
        ContainerKind::Dropper,
        ContainerKind::Hopper,
        ContainerKind::Furnace,
        ContainerKind::BlastFurnace,
        ContainerKind::Smoker,
    ];

    pub fn from_material(name: &str) -> Option<ContainerKind> {
        let short = short_name(name);
        if short == "ender_chest" {
            return None;
        }
        if short.ends_with("chest") {
            Some(ContainerKind::Chest)
        } else if short == "barrel" {
            Some(ContainerKind::Barrel)
        } else if short.ends_with("shulker_box") {
            Some(ContainerKind::ShulkerBox)
        } else if short == "dispenser" {
            Some(ContainerKind::Dispenser)
        } else if short == "dropper" {
            Some(ContainerKind::Dropper)
        } else if short == "hopper" {
            Some(ContainerKind::Hopper)
        } else if short == "blast_furnace" {
            Some(ContainerKind::BlastFurnace)
        } else if short == "furnace" {
            Some(ContainerKind::Furnace)
        } else if short == "smoker" {
            Some(ContainerKind::Smoker)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContainerKind::Chest => "chest",
            ContainerKind::Barrel => "barrel",
            ContainerKind::ShulkerBox => "shulker_box",
            ContainerKind::Dispenser => "dispenser",
            ContainerKind::Dropper => "dropper",
            ContainerKind::Hopper => "hopper",
            ContainerKind::Furnace => "furnace",
            ContainerKind::BlastFurnace => "blast_furnace",
            ContainerKind::Smoker => "smoker",
        }
    }

    pub fn capacity(self) -> u32 {
        match self {
            ContainerKind::Chest | ContainerKind::Barrel | ContainerKind::ShulkerBox => 27,
            ContainerKind::Dispenser | ContainerKind::Dropper => 9,
            ContainerKind::Hopper => 5,
            ContainerKind::Furnace | ContainerKind::BlastFurnace | ContainerKind::Smoker => 3,
        }
    }

    pub fn is_furnace(self) -> bool {
        matches!(
            self,
            ContainerKind::Furnace | ContainerKind::BlastFurnace | ContainerKind::Smoker
        )
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_spawner(name: &str) -> bool {
    matches!(short_name(name), "spawner" | "mob_spawner")
}

/// Materials whose voxels carry a [`BlockEntityRecord`].
pub fn has_block_entity(name: &str) -> bool {
    ContainerKind::from_material(name).is_some() || is_spawner(name)
}
