use crate::block_state::BlockState;
use crate::materials;
use crate::transform::{rotate_connections, Axis, Direction, Rotation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Half {
    Upper,
    Lower,
    Top,
    Bottom,
}

impl Half {
    pub fn as_str(self) -> &'static str {
        match self {
            Half::Upper => "upper",
            Half::Lower => "lower",
            Half::Top => "top",
            Half::Bottom => "bottom",
        }
    }
}

impl FromStr for Half {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upper" => Ok(Half::Upper),
            "lower" => Ok(Half::Lower),
            "top" => Ok(Half::Top),
            "bottom" => Ok(Half::Bottom),
            other => Err(format!("Unknown half '{}'", other)),
        }
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orientation and state attributes saved alongside a material.
///
/// The named fields are the keys the transform engine knows how to rotate.
/// Anything else the host reports lands in `other`. On write-back, keys named
/// after a horizontal direction (wall heights, redstone wire sides), the 0-15
/// `rotation` of signs, banners and skulls, and rail `shape` values turn with
/// the structure; everything else is written verbatim.
/// A bag is never stored empty; see [`PropertyBag::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyBag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half: Option<Half>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub powered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waterlogged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faces: Option<BTreeMap<Direction, bool>>,
    #[serde(
        rename = "allowedFaces",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub allowed_faces: Option<BTreeSet<Direction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_wall: Option<bool>,
    #[serde(flatten)]
    pub other: BTreeMap<String, String>,
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(format!("Property '{}' expects a boolean, got '{}'", key, other)),
    }
}

impl PropertyBag {
    pub fn is_empty(&self) -> bool {
        self.facing.is_none()
            && self.half.is_none()
            && self.open.is_none()
            && self.powered.is_none()
            && self.waterlogged.is_none()
            && self.axis.is_none()
            && self.faces.as_ref().map_or(true, |f| f.is_empty())
            && self.in_wall.is_none()
            && self.other.is_empty()
    }

    /// Collapses an empty bag to `None`.
    pub fn normalize(bag: Option<PropertyBag>) -> Option<PropertyBag> {
        bag.filter(|b| !b.is_empty())
    }

    /// Reads the saved attributes of a host block state.
    ///
    /// Fails if a known key carries a value that cannot be interpreted; the
    /// caller decides whether that drops the voxel.
    pub fn from_block_state(state: &BlockState) -> Result<Option<PropertyBag>, String> {
        let legal = materials::allowed_faces(&state.name);
        let mut bag = PropertyBag::default();
        let mut faces = BTreeMap::new();

        for (key, value) in &state.properties {
            let key = key.as_str();
            let value = value.as_str();
            match key {
                "facing" => bag.facing = Some(value.parse()?),
                "half" => bag.half = Some(value.parse()?),
                "open" => bag.open = Some(parse_bool(key, value)?),
                "powered" => bag.powered = Some(parse_bool(key, value)?),
                "waterlogged" => bag.waterlogged = Some(parse_bool(key, value)?),
                "axis" => bag.axis = Some(value.parse()?),
                "in_wall" if materials::is_fence_gate(&state.name) => {
                    bag.in_wall = Some(parse_bool(key, value)?)
                }
                _ => match key.parse::<Direction>() {
                    Ok(face) if legal.contains(&face) => {
                        faces.insert(face, parse_bool(key, value)?);
                    }
                    _ => {
                        bag.other.insert(key.to_string(), value.to_string());
                    }
                },
            }
        }

        if !legal.is_empty() {
            for face in legal {
                faces.entry(*face).or_insert(false);
            }
            bag.faces = Some(faces);
            bag.allowed_faces = Some(legal.iter().copied().collect());
        }

        Ok(PropertyBag::normalize(Some(bag)))
    }

    /// Writes every saved attribute onto `state`, rotating facing, axis and
    /// connection faces by `rotation`. The state must already carry its final
    /// material, which decides the legal connection faces.
    pub fn apply(&self, state: &mut BlockState, rotation: Rotation) {
        for (key, value) in &self.other {
            let (key, value) = rotate_loose_property(key, value, rotation);
            state.set_property(key.as_str(), value.as_str());
        }
        if let Some(facing) = self.facing {
            state.set_property("facing", facing.rotate(rotation).as_str());
        }
        if let Some(half) = self.half {
            state.set_property("half", half.as_str());
        }
        if let Some(open) = self.open {
            state.set_property("open", bool_str(open));
        }
        if let Some(powered) = self.powered {
            state.set_property("powered", bool_str(powered));
        }
        if let Some(waterlogged) = self.waterlogged {
            state.set_property("waterlogged", bool_str(waterlogged));
        }
        self.apply_axis(state, rotation);
        if let Some(faces) = &self.faces {
            let legal = materials::allowed_faces(&state.name);
            for face in legal {
                state.set_property(face.as_str(), "false");
            }
            for (face, connected) in rotate_connections(faces, legal, rotation) {
                state.set_property(face.as_str(), bool_str(connected));
            }
        }
        if let Some(in_wall) = self.in_wall {
            state.set_property("in_wall", bool_str(in_wall));
        }
    }

    /// Only the axis, for pillar-like blocks.
    pub fn apply_axis(&self, state: &mut BlockState, rotation: Rotation) {
        if let Some(axis) = self.axis {
            state.set_property("axis", axis.rotate(rotation).as_str());
        }
    }

    pub fn is_connected(&self, face: Direction) -> bool {
        self.faces
            .as_ref()
            .and_then(|faces| faces.get(&face).copied())
            .unwrap_or(false)
    }
}

/// Rotates a property the bag keeps untyped. Unknown keys and values that do
/// not parse pass through unchanged.
fn rotate_loose_property(key: &str, value: &str, rotation: Rotation) -> (String, String) {
    if rotation == Rotation::None {
        return (key.to_string(), value.to_string());
    }
    if let Ok(face) = key.parse::<Direction>() {
        if face.is_horizontal() {
            return (face.rotate(rotation).as_str().to_string(), value.to_string());
        }
    }
    let value = match key {
        "rotation" => match value.parse::<u8>() {
            Ok(step) if step < 16 => ((step + 4 * rotation.quarter_turns()) % 16).to_string(),
            _ => value.to_string(),
        },
        "shape" => rotate_rail_shape(value, rotation).unwrap_or_else(|| value.to_string()),
        _ => value.to_string(),
    };
    (key.to_string(), value)
}

/// Rail shapes are `ascending_<dir>` or two directions joined by `_`, with
/// north/south first. Stair shapes (`inner_left`, ...) are relative and yield
/// `None`.
fn rotate_rail_shape(shape: &str, rotation: Rotation) -> Option<String> {
    if let Some(rest) = shape.strip_prefix("ascending_") {
        let dir = rest.parse::<Direction>().ok()?;
        return Some(format!("ascending_{}", dir.rotate(rotation).as_str()));
    }
    let (a, b) = shape.split_once('_')?;
    let a = a.parse::<Direction>().ok()?.rotate(rotation);
    let b = b.parse::<Direction>().ok()?.rotate(rotation);
    let north_south = |d: Direction| matches!(d, Direction::North | Direction::South);
    let shape = match (north_south(a), north_south(b)) {
        (true, true) => "north_south".to_string(),
        (false, false) => "east_west".to_string(),
        (true, false) => format!("{}_{}", a.as_str(), b.as_str()),
        (false, true) => format!("{}_{}", b.as_str(), a.as_str()),
    };
    Some(shape)
}

pub(crate) fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Builds the host state for `material`: type first, then the rotated properties.
pub fn build_state(
    material: &str,
    properties: Option<&PropertyBag>,
    rotation: Rotation,
) -> BlockState {
    let mut state = BlockState::new(material);
    if let Some(properties) = properties {
        properties.apply(&mut state, rotation);
    }
    state
}
