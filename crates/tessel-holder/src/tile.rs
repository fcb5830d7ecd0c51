use serde::{Deserialize, Serialize};
use tessel_types::BlockPos;

use crate::capability::{Capability, CapabilitySet};
use crate::error::{HolderError, HolderResult};
use crate::holder::DataHolder;
use crate::tag::{Tag, TagCompound};

/// Native field names of a sign's four lines.
pub const SIGN_LINE_FIELDS: [&str; 4] = ["Text1", "Text2", "Text3", "Text4"];

/// Native field names of a mob spawner, with their default values.
pub const SPAWNER_DEFAULTS: [(&str, i16); 7] = [
    ("Delay", 20),
    ("MinSpawnDelay", 200),
    ("MaxSpawnDelay", 800),
    ("SpawnCount", 4),
    ("MaxNearbyEntities", 6),
    ("RequiredPlayerRange", 16),
    ("SpawnRange", 4),
];

/// Native field holding a spawner's weighted entity list; each entry is a
/// compound with `Type` and `Weight`.
pub const SPAWN_POTENTIALS: &str = "SpawnPotentials";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Sign,
    MobSpawner,
}

impl TileKind {
    pub fn type_id(&self) -> &'static str {
        match self {
            Self::Sign => "minecraft:sign",
            Self::MobSpawner => "minecraft:mob_spawner",
        }
    }
}

/// A block-attached object persisted entirely as a tag compound.
#[derive(Clone, Debug, PartialEq)]
pub struct TileEntity {
    kind: TileKind,
    pos: BlockPos,
    data: TagCompound,
}

impl TileEntity {
    /// A tile entity populated with the kind's default native fields.
    pub fn new(kind: TileKind, pos: BlockPos) -> Self {
        let mut data = TagCompound::new();
        match kind {
            TileKind::Sign => {
                for field in SIGN_LINE_FIELDS {
                    data.insert(field, "");
                }
            }
            TileKind::MobSpawner => {
                for (field, value) in SPAWNER_DEFAULTS {
                    data.insert(field, value);
                }
                data.insert(SPAWN_POTENTIALS, Tag::List(Vec::new()));
            }
        }
        Self { kind, pos, data }
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn pos(&self) -> BlockPos {
        self.pos
    }

    fn knows(&self, name: &str) -> bool {
        match self.kind {
            TileKind::Sign => SIGN_LINE_FIELDS.contains(&name),
            TileKind::MobSpawner => {
                name == SPAWN_POTENTIALS || SPAWNER_DEFAULTS.iter().any(|(f, _)| *f == name)
            }
        }
    }

    fn unsupported(&self, field: &str) -> HolderError {
        HolderError::UnsupportedField {
            holder: self.kind.type_id().to_string(),
            field: field.to_string(),
        }
    }
}

impl DataHolder for TileEntity {
    fn holder_type(&self) -> &str {
        self.kind.type_id()
    }

    fn capabilities(&self) -> CapabilitySet {
        match self.kind {
            TileKind::Sign => CapabilitySet::of([Capability::Sign]),
            TileKind::MobSpawner => CapabilitySet::of([Capability::MobSpawner]),
        }
    }

    fn field(&self, name: &str) -> Option<Tag> {
        self.data.get(name).cloned()
    }

    /// Writes are checked against the current tag type of the field, so a
    /// sign line stays a string and spawner numbers stay shorts.
    fn set_field(&mut self, name: &str, value: Tag) -> HolderResult<()> {
        if !self.knows(name) {
            return Err(self.unsupported(name));
        }
        let mismatch = |expected: &'static str, found: &Tag| HolderError::TypeMismatch {
            field: name.to_string(),
            expected,
            found: found.type_name(),
        };
        let normalized = match self.data.get(name) {
            Some(Tag::Short(_)) => value
                .as_i16()
                .map(Tag::Short)
                .ok_or_else(|| mismatch("short", &value))?,
            Some(existing) if existing.type_name() != value.type_name() => {
                return Err(mismatch(existing.type_name(), &value));
            }
            _ => value,
        };
        self.data.insert(name, normalized);
        Ok(())
    }

    fn clear_field(&mut self, name: &str) -> HolderResult<bool> {
        if self.knows(name) {
            Err(HolderError::RequiredField {
                field: name.to_string(),
            })
        } else {
            Err(self.unsupported(name))
        }
    }

    fn tag(&self) -> Option<&TagCompound> {
        Some(&self.data)
    }

    fn tag_mut(&mut self) -> Option<&mut TagCompound> {
        Some(&mut self.data)
    }
}
