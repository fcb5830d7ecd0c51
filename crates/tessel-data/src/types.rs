//! Element types carried by the standard keys.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A 24-bit RGB color. Serialized as its integer value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(u32);

impl Color {
    pub const WHITE: Color = Color(0xFF_FF_FF);
    pub const BLACK: Color = Color(0);

    /// From a packed `0xRRGGBB` value; higher bits are dropped.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0xFF_FF_FF)
    }

    pub const fn of(red: u8, green: u8, blue: u8) -> Self {
        Self(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    pub const fn rgb(&self) -> u32 {
        self.0
    }

    pub const fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(&self) -> u8 {
        self.0 as u8
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// A three-component double vector, serialized as `{X, Y, Z}`.
///
/// Equality and ordering use IEEE total ordering so the vector can sit in
/// ordered collections.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Vector3d {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Z")]
    pub z: f64,
}

impl Vector3d {
    pub const ZERO: Vector3d = Vector3d::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl PartialEq for Vector3d {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Vector3d {}

impl PartialOrd for Vector3d {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vector3d {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then(self.y.total_cmp(&other.y))
            .then(self.z.total_cmp(&other.z))
    }
}

/// Facing of a directional block.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Down,
    Up,
    #[default]
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Self::Down,
        Self::Up,
        Self::North,
        Self::South,
        Self::West,
        Self::East,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
            Self::North => "north",
            Self::South => "south",
            Self::West => "west",
            Self::East => "east",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }

    pub fn is_horizontal(&self) -> bool {
        !matches!(self, Self::Down | Self::Up)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orientation axis of a block such as a log.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Self::X, Self::Y, Self::Z];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity type a spawner may pick, with its relative weight.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeightedEntity {
    #[serde(rename = "Type")]
    pub entity_type: String,
    #[serde(rename = "Weight")]
    pub weight: i32,
}

impl WeightedEntity {
    pub fn new(entity_type: impl Into<String>, weight: i32) -> Self {
        Self {
            entity_type: entity_type.into(),
            weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn color_components() {
        let c = Color::of(0x12, 0x34, 0x56);
        assert_eq!(c.rgb(), 0x123456);
        assert_eq!((c.red(), c.green(), c.blue()), (0x12, 0x34, 0x56));
        assert_eq!(Color::from_rgb(0xFF123456), c);
        assert_eq!(c.to_string(), "#123456");
        assert_eq!(serde_json::to_value(c).unwrap(), json!(0x123456));
    }

    #[test]
    fn vector_serializes_with_upper_case_axes() {
        let v = Vector3d::new(1.0, -2.5, 0.0);
        assert_eq!(serde_json::to_value(v).unwrap(), json!({"X": 1.0, "Y": -2.5, "Z": 0.0}));
    }

    #[test]
    fn vector_total_order() {
        let nan = Vector3d::new(f64::NAN, 0.0, 0.0);
        assert_eq!(nan, nan);
        assert!(Vector3d::new(0.0, 1.0, 0.0) < Vector3d::new(0.0, 2.0, 0.0));
        assert_eq!(Vector3d::new(3.0, 4.0, 0.0).length(), 5.0);
    }

    #[test]
    fn direction_names() {
        assert_eq!(Direction::from_name("west"), Some(Direction::West));
        assert_eq!(serde_json::to_value(Direction::Up).unwrap(), json!("up"));
        assert!(!Direction::Down.is_horizontal());
        assert_eq!(Axis::from_name("none"), None);
    }

    #[test]
    fn weighted_entity_field_names() {
        let e = WeightedEntity::new("minecraft:zombie", 3);
        assert_eq!(
            serde_json::to_value(&e).unwrap(),
            json!({"Type": "minecraft:zombie", "Weight": 3})
        );
    }
}
