use std::fmt;

use serde::{Deserialize, Serialize};

/// A native capability a holder may expose.
///
/// Processors declare the capability they need and check it through
/// [`CapabilitySet`], never by inspecting the concrete holder type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Living,
    Breathing,
    Nameable,
    Moving,
    Colorable,
    ItemTag,
    Sign,
    MobSpawner,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Self::Living,
        Self::Breathing,
        Self::Nameable,
        Self::Moving,
        Self::Colorable,
        Self::ItemTag,
        Self::Sign,
        Self::MobSpawner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Living => "living",
            Self::Breathing => "breathing",
            Self::Nameable => "nameable",
            Self::Moving => "moving",
            Self::Colorable => "colorable",
            Self::ItemTag => "item_tag",
            Self::Sign => "sign",
            Self::MobSpawner => "mob_spawner",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A small bitset of [`Capability`] values.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet(u16);

impl CapabilitySet {
    pub const EMPTY: CapabilitySet = CapabilitySet(0);

    pub fn of<I: IntoIterator<Item = Capability>>(caps: I) -> Self {
        let mut set = Self::EMPTY;
        for cap in caps {
            set.insert(cap);
        }
        set
    }

    pub fn contains(&self, cap: Capability) -> bool {
        self.0 & cap.bit() != 0
    }

    pub fn insert(&mut self, cap: Capability) {
        self.0 |= cap.bit();
    }

    pub fn with(mut self, cap: Capability) -> Self {
        self.insert(cap);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
