use std::fmt;

use serde::{Deserialize, Serialize};

use crate::capability::{Capability, CapabilitySet};
use crate::error::{HolderError, HolderResult};
use crate::holder::{expect_tag, DataHolder};
use crate::tag::Tag;

/// Air supply of a freshly spawned breathing entity.
pub const DEFAULT_MAX_AIR: i16 = 300;

/// Default fleece color (white).
pub const DEFAULT_COLOR: i32 = 0xFF_FF_FF;

/// Native entity types known to the reference model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Zombie,
    Sheep,
    Minecart,
    Boat,
}

impl EntityKind {
    pub fn type_id(&self) -> &'static str {
        match self {
            Self::Player => "minecraft:player",
            Self::Zombie => "minecraft:zombie",
            Self::Sheep => "minecraft:sheep",
            Self::Minecart => "minecraft:minecart",
            Self::Boat => "minecraft:boat",
        }
    }

    pub fn capabilities(&self) -> CapabilitySet {
        let vehicle = CapabilitySet::of([Capability::Nameable, Capability::Moving]);
        let living = vehicle
            .with(Capability::Living)
            .with(Capability::Breathing);
        match self {
            Self::Player | Self::Zombie => living,
            Self::Sheep => living.with(Capability::Colorable),
            Self::Minecart | Self::Boat => vehicle,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_id())
    }
}

/// An entity with native struct fields.
///
/// Field names follow the native persistence layout: `Air`, `MaxAir`,
/// `CustomName`, `CustomNameVisible`, `Motion` (three doubles) and `Color`.
/// Fields outside the kind's capabilities do not exist.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    kind: EntityKind,
    air: i16,
    max_air: i16,
    custom_name: Option<String>,
    custom_name_visible: bool,
    motion: [f64; 3],
    color: i32,
}

impl Entity {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            air: DEFAULT_MAX_AIR,
            max_air: DEFAULT_MAX_AIR,
            custom_name: None,
            custom_name_visible: false,
            motion: [0.0; 3],
            color: DEFAULT_COLOR,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn air(&self) -> i16 {
        self.air
    }

    pub fn custom_name(&self) -> Option<&str> {
        self.custom_name.as_deref()
    }

    pub fn motion(&self) -> [f64; 3] {
        self.motion
    }

    pub fn color(&self) -> i32 {
        self.color
    }

    fn unsupported(&self, field: &str) -> HolderError {
        HolderError::UnsupportedField {
            holder: self.kind.type_id().to_string(),
            field: field.to_string(),
        }
    }

    fn requires(&self, field: &str, cap: Capability) -> HolderResult<()> {
        if self.has(cap) {
            Ok(())
        } else {
            Err(self.unsupported(field))
        }
    }
}

impl DataHolder for Entity {
    fn holder_type(&self) -> &str {
        self.kind.type_id()
    }

    fn capabilities(&self) -> CapabilitySet {
        self.kind.capabilities()
    }

    fn field(&self, name: &str) -> Option<Tag> {
        match name {
            "Air" if self.has(Capability::Breathing) => Some(Tag::Short(self.air)),
            "MaxAir" if self.has(Capability::Breathing) => Some(Tag::Short(self.max_air)),
            "CustomName" => self.custom_name.clone().map(Tag::String),
            "CustomNameVisible" => Some(Tag::from(self.custom_name_visible)),
            "Motion" => Some(Tag::List(self.motion.iter().copied().map(Tag::Double).collect())),
            "Color" if self.has(Capability::Colorable) => Some(Tag::Int(self.color)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Tag) -> HolderResult<()> {
        match name {
            "Air" => {
                self.requires(name, Capability::Breathing)?;
                self.air = expect_tag(name, "short", &value, Tag::as_i16)?;
            }
            "MaxAir" => {
                self.requires(name, Capability::Breathing)?;
                self.max_air = expect_tag(name, "short", &value, Tag::as_i16)?;
            }
            "CustomName" => {
                let text = expect_tag(name, "string", &value, |t| t.as_str().map(str::to_string))?;
                self.custom_name = Some(text);
            }
            "CustomNameVisible" => {
                self.custom_name_visible = expect_tag(name, "byte", &value, Tag::as_bool)?;
            }
            "Motion" => {
                self.motion = expect_tag(name, "list of 3 doubles", &value, |t| {
                    let items = t.as_list()?;
                    match items {
                        [x, y, z] => Some([x.as_f64()?, y.as_f64()?, z.as_f64()?]),
                        _ => None,
                    }
                })?;
            }
            "Color" => {
                self.requires(name, Capability::Colorable)?;
                self.color = expect_tag(name, "int", &value, Tag::as_i32)?;
            }
            _ => return Err(self.unsupported(name)),
        }
        Ok(())
    }

    fn clear_field(&mut self, name: &str) -> HolderResult<bool> {
        match name {
            "CustomName" => Ok(self.custom_name.take().is_some()),
            "Air" | "MaxAir" | "CustomNameVisible" | "Motion" | "Color" => {
                Err(HolderError::RequiredField {
                    field: name.to_string(),
                })
            }
            _ => Err(self.unsupported(name)),
        }
    }
}
