use crate::block_entity::ItemStack;
use crate::block_state::short_name;
use crate::transform::{rotate_position_f64, rotate_yaw, Rotation};
use serde::{Deserialize, Serialize};

const BLACKLISTED_ENTITIES: &[&str] = &[
    "player",
    "unknown",
    "area_effect_cloud",
    "experience_orb",
    "lightning_bolt",
];

/// Ephemeral or player-bound entities are never captured.
pub fn is_blacklisted_entity(entity_type: &str) -> bool {
    let short = short_name(entity_type);
    BLACKLISTED_ENTITIES.contains(&short)
        || short.contains("spectral")
        || short.contains("firework")
}

pub fn is_item_frame(entity_type: &str) -> bool {
    short_name(entity_type).ends_with("item_frame")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,
    /// Only for living entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<f64>,
    /// Item held by a frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemStack>,
    /// Frame item rotation step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<u8>,
}

impl EntityData {
    pub fn rotated(&self, rotation: Rotation) -> EntityData {
        EntityData {
            yaw: self.yaw.map(|yaw| rotate_yaw(yaw, rotation)),
            ..self.clone()
        }
    }
}

/// A free entity saved with a structure, positioned relative to its origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeEntityRecord {
    pub pos: (f64, f64, f64),
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub data: EntityData,
}

/// A live entity as reported by the host world.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub entity_type: String,
    pub pos: (f64, f64, f64),
    pub data: EntityData,
    pub alive: bool,
    pub valid: bool,
}

impl EntitySnapshot {
    pub fn new(entity_type: impl Into<String>, pos: (f64, f64, f64)) -> Self {
        EntitySnapshot {
            entity_type: entity_type.into(),
            pos,
            data: EntityData::default(),
            alive: true,
            valid: true,
        }
    }

    pub fn with_data(mut self, data: EntityData) -> Self {
        self.data = data;
        self
    }

    pub fn is_capturable(&self) -> bool {
        self.alive && self.valid && !is_blacklisted_entity(&self.entity_type)
    }

    /// The record for this entity relative to `origin`. Frames without an item
    /// drop their rotation.
    pub fn to_record(&self, origin: (i32, i32, i32)) -> FreeEntityRecord {
        let mut data = self.data.clone();
        if is_item_frame(&self.entity_type) {
            if data.item.is_none() {
                data.rotation = None;
            }
        } else {
            data.item = None;
            data.rotation = None;
        }
        FreeEntityRecord {
            pos: (
                self.pos.0 - origin.0 as f64,
                self.pos.1 - origin.1 as f64,
                self.pos.2 - origin.2 as f64,
            ),
            entity_type: self.entity_type.clone(),
            data,
        }
    }

    pub fn block_pos(&self) -> (i32, i32, i32) {
        (
            self.pos.0.floor() as i32,
            self.pos.1.floor() as i32,
            self.pos.2.floor() as i32,
        )
    }
}

/// A request to the host to create an entity at an absolute position.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpawn {
    pub entity_type: String,
    pub pos: (f64, f64, f64),
    pub data: EntityData,
}

impl EntitySpawn {
    /// Position and yaw follow the structure rotation; pitch does not.
    pub fn from_record(
        record: &FreeEntityRecord,
        origin: (i32, i32, i32),
        rotation: Rotation,
    ) -> Self {
        let (x, y, z) = rotate_position_f64(record.pos, rotation);
        EntitySpawn {
            entity_type: record.entity_type.clone(),
            pos: (x + origin.0 as f64, y + origin.1 as f64, z + origin.2 as f64),
            data: record.data.rotated(rotation),
        }
    }
}
