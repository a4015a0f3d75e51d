//! Rotation about the vertical axis in quarter turns.
//!
//! Every orientation-bearing value (positions, facings, axes, yaws and
//! connection faces) goes through the same [`Rotation`] so that a rotated
//! structure stays self-consistent: a quarter turn maps `(x, y, z)` to
//! `(-z, y, x)` and north to east.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::None,
        Rotation::Clockwise90,
        Rotation::Clockwise180,
        Rotation::Clockwise270,
    ];

    /// Accepts any multiple of 90, negative values included.
    pub fn from_degrees(degrees: i32) -> Option<Rotation> {
        if degrees % 90 != 0 {
            return None;
        }
        Some(Self::from_quarter_turns(degrees.rem_euclid(360) / 90))
    }

    fn from_quarter_turns(turns: i32) -> Rotation {
        match turns.rem_euclid(4) {
            1 => Rotation::Clockwise90,
            2 => Rotation::Clockwise180,
            3 => Rotation::Clockwise270,
            _ => Rotation::None,
        }
    }

    pub fn degrees(self) -> i32 {
        self.quarter_turns() as i32 * 90
    }

    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 1,
            Rotation::Clockwise180 => 2,
            Rotation::Clockwise270 => 3,
        }
    }

    /// Applies `self` and then `other`.
    pub fn then(self, other: Rotation) -> Rotation {
        Self::from_quarter_turns(self.quarter_turns() as i32 + other.quarter_turns() as i32)
    }

    pub fn inverse(self) -> Rotation {
        Self::from_quarter_turns(4 - self.quarter_turns() as i32)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Rotation {
        Self::ALL[rng.gen_range(0..4)]
    }

    /// True when the X and Z extents swap.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }
}

impl TryFrom<i32> for Rotation {
    type Error = String;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees)
            .ok_or_else(|| format!("Rotation must be a multiple of 90, got {}", degrees))
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> i32 {
        rotation.degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

pub fn rotate_position(pos: (i32, i32, i32), rotation: Rotation) -> (i32, i32, i32) {
    let (x, y, z) = pos;
    match rotation {
        Rotation::None => (x, y, z),
        Rotation::Clockwise90 => (-z, y, x),
        Rotation::Clockwise180 => (-x, y, -z),
        Rotation::Clockwise270 => (z, y, -x),
    }
}

/// Same mapping as [`rotate_position`] for sub-block entity positions.
pub fn rotate_position_f64(pos: (f64, f64, f64), rotation: Rotation) -> (f64, f64, f64) {
    let (x, y, z) = pos;
    match rotation {
        Rotation::None => (x, y, z),
        Rotation::Clockwise90 => (-z, y, x),
        Rotation::Clockwise180 => (-x, y, -z),
        Rotation::Clockwise270 => (z, y, -x),
    }
}

/// Result is always in `[0, 360)`.
pub fn rotate_yaw(yaw: f32, rotation: Rotation) -> f32 {
    (yaw + rotation.degrees() as f32).rem_euclid(360.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::Up,
        Direction::Down,
    ];

    /// Clockwise order seen from above.
    pub const HORIZONTAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    pub fn is_horizontal(self) -> bool {
        !matches!(self, Direction::Up | Direction::Down)
    }

    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            Direction::North => (0, 0, -1),
            Direction::East => (1, 0, 0),
            Direction::South => (0, 0, 1),
            Direction::West => (-1, 0, 0),
            Direction::Up => (0, 1, 0),
            Direction::Down => (0, -1, 0),
        }
    }

    pub fn relative(self, pos: (i32, i32, i32)) -> (i32, i32, i32) {
        let (dx, dy, dz) = self.offset();
        (pos.0 + dx, pos.1 + dy, pos.2 + dz)
    }

    /// Horizontal directions turn with the structure; up and down are fixed.
    pub fn rotate(self, rotation: Rotation) -> Direction {
        if !self.is_horizontal() {
            return self;
        }
        let index = Self::HORIZONTAL
            .iter()
            .position(|d| *d == self)
            .unwrap_or(0);
        Self::HORIZONTAL[(index + rotation.quarter_turns() as usize) % 4]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" => Ok(Direction::North),
            "east" => Ok(Direction::East),
            "south" => Ok(Direction::South),
            "west" => Ok(Direction::West),
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("Unknown direction '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    pub fn rotate(self, rotation: Rotation) -> Axis {
        match (self, rotation.swaps_axes()) {
            (Axis::X, true) => Axis::Z,
            (Axis::Z, true) => Axis::X,
            (axis, _) => axis,
        }
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(format!("Unknown axis '{}'", other)),
        }
    }
}

pub fn rotate_horizontal_facing(facing: Direction, rotation: Rotation) -> Direction {
    facing.rotate(rotation)
}

pub fn rotate_axis(axis: Axis, rotation: Rotation) -> Axis {
    axis.rotate(rotation)
}

pub fn rotate_connection_face(face: Direction, rotation: Rotation) -> Direction {
    face.rotate(rotation)
}

/// Remaps a saved connection set through `rotation`, keeping only the faces the
/// target block actually exposes. Faces missing from the saved set stay unset.
pub fn rotate_connections(
    faces: &BTreeMap<Direction, bool>,
    legal: &[Direction],
    rotation: Rotation,
) -> BTreeMap<Direction, bool> {
    faces
        .iter()
        .map(|(face, connected)| (rotate_connection_face(*face, rotation), *connected))
        .filter(|(face, _)| legal.contains(face))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_degrees() {
        assert_eq!(Rotation::from_degrees(0), Some(Rotation::None));
        assert_eq!(Rotation::from_degrees(90), Some(Rotation::Clockwise90));
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::Clockwise90));
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Clockwise270));
        assert_eq!(Rotation::from_degrees(45), None);
    }

    #[test]
    fn test_quarter_turn_mapping() {
        assert_eq!(rotate_position((1, 2, 3), Rotation::Clockwise90), (-3, 2, 1));
        assert_eq!(rotate_position((1, 2, 3), Rotation::Clockwise180), (-1, 2, -3));
        assert_eq!(rotate_position((1, 2, 3), Rotation::Clockwise270), (3, 2, -1));
        assert_eq!(rotate_position((1, 2, 3), Rotation::None), (1, 2, 3));
    }

    #[test]
    fn test_four_quarter_turns_is_identity() {
        for x in -3..=3 {
            for z in -3..=3 {
                let mut p = (x, 7, z);
                for _ in 0..4 {
                    p = rotate_position(p, Rotation::Clockwise90);
                }
                assert_eq!(p, (x, 7, z));

                let half = rotate_position((x, 7, z), Rotation::Clockwise180);
                let half = rotate_position(half, Rotation::Clockwise180);
                assert_eq!(half, (x, 7, z));

                let turned = rotate_position((x, 7, z), Rotation::Clockwise90);
                let back = rotate_position(turned, Rotation::Clockwise270);
                assert_eq!(back, (x, 7, z));
            }
        }
    }

    #[test]
    fn test_facing_follows_position() {
        for dir in Direction::HORIZONTAL {
            let rotated = dir.rotate(Rotation::Clockwise90);
            assert_eq!(
                rotate_position(dir.offset(), Rotation::Clockwise90),
                rotated.offset(),
                "{} rotated to {}",
                dir,
                rotated
            );
        }
        assert_eq!(Direction::North.rotate(Rotation::Clockwise90), Direction::East);
        assert_eq!(Direction::West.rotate(Rotation::Clockwise270), Direction::South);
        assert_eq!(Direction::Up.rotate(Rotation::Clockwise90), Direction::Up);
        assert_eq!(Direction::Down.rotate(Rotation::Clockwise180), Direction::Down);
    }

    #[test]
    fn test_facing_and_axis_group_properties() {
        for dir in Direction::ALL {
            let mut d = dir;
            for _ in 0..4 {
                d = rotate_horizontal_facing(d, Rotation::Clockwise90);
            }
            assert_eq!(d, dir);
        }
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let turned = rotate_axis(axis, Rotation::Clockwise90);
            assert_eq!(rotate_axis(turned, Rotation::Clockwise90), axis);
            assert_eq!(rotate_axis(axis, Rotation::Clockwise180), axis);
        }
        assert_eq!(rotate_axis(Axis::X, Rotation::Clockwise270), Axis::Z);
        assert_eq!(rotate_axis(Axis::Y, Rotation::Clockwise90), Axis::Y);
    }

    #[test]
    fn test_yaw_wraps() {
        assert_eq!(rotate_yaw(300.0, Rotation::Clockwise90), 30.0);
        assert_eq!(rotate_yaw(-90.0, Rotation::Clockwise90), 0.0);
        assert_eq!(rotate_yaw(45.0, Rotation::None), 45.0);
    }

    #[test]
    fn test_rotate_connections_respects_legal_faces() {
        let mut faces = BTreeMap::new();
        faces.insert(Direction::North, true);
        faces.insert(Direction::East, false);
        faces.insert(Direction::Up, true);

        let rotated = rotate_connections(&faces, &Direction::HORIZONTAL, Rotation::Clockwise90);
        assert_eq!(rotated.get(&Direction::East), Some(&true));
        assert_eq!(rotated.get(&Direction::South), Some(&false));
        assert!(!rotated.contains_key(&Direction::Up));
        assert_eq!(rotated.len(), 2);
    }

    #[test]
    fn test_rotation_composition() {
        assert_eq!(Rotation::Clockwise90.then(Rotation::Clockwise270), Rotation::None);
        assert_eq!(Rotation::Clockwise180.then(Rotation::Clockwise180), Rotation::None);
        assert_eq!(Rotation::Clockwise90.inverse(), Rotation::Clockwise270);
        assert_eq!(serde_json::to_string(&Rotation::Clockwise180).unwrap(), "180");
        assert_eq!(serde_json::from_str::<Rotation>("270").unwrap(), Rotation::Clockwise270);
        assert!(serde_json::from_str::<Rotation>("30").is_err());
    }
}
