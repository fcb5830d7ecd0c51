//! Flyweight block states.
//!
//! Every combination of property values of every block type is interned
//! once in a [`StateTable`] and addressed by a [`StateId`]. Changing a
//! property of a block never mutates a state; it looks up the index of the
//! state that differs in that one property.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{HolderError, HolderResult};

/// Index of an interned block state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(u32);

impl StateId {
    pub const fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The value of one block property.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Name(String),
}

impl PropertyValue {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Name(v) => f.write_str(v),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Name(v.to_string())
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// The allowed values of a block property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyRange {
    Bool,
    Int { min: i32, max: i32 },
    Names(Vec<String>),
}

impl PropertyRange {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Names(names.into_iter().map(Into::into).collect())
    }

    pub fn values(&self) -> Vec<PropertyValue> {
        match self {
            Self::Bool => vec![PropertyValue::Bool(false), PropertyValue::Bool(true)],
            Self::Int { min, max } => (*min..=*max).map(PropertyValue::Int).collect(),
            Self::Names(names) => names.iter().map(|n| PropertyValue::Name(n.clone())).collect(),
        }
    }

    pub fn contains(&self, value: &PropertyValue) -> bool {
        match (self, value) {
            (Self::Bool, PropertyValue::Bool(_)) => true,
            (Self::Int { min, max }, PropertyValue::Int(v)) => (*min..=*max).contains(v),
            (Self::Names(names), PropertyValue::Name(v)) => names.contains(v),
            _ => false,
        }
    }
}

/// A block type: an id and its ordered property definitions. The first
/// value of every property forms the default state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockType {
    pub id: String,
    pub properties: Vec<(String, PropertyRange)>,
}

impl BlockType {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: Vec::new(),
        }
    }

    pub fn property(mut self, name: impl Into<String>, range: PropertyRange) -> Self {
        self.properties.push((name.into(), range));
        self
    }

    pub fn range(&self, name: &str) -> Option<&PropertyRange> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }
}

/// One interned state: a block type and a value for each of its properties.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockState {
    pub block: String,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl BlockState {
    pub fn get(&self, property: &str) -> Option<&PropertyValue> {
        self.properties.get(property)
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.block)?;
        if !self.properties.is_empty() {
            let props: Vec<String> = self
                .properties
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            write!(f, "[{}]", props.join(","))?;
        }
        Ok(())
    }
}

pub const STONE: &str = "minecraft:stone";
pub const WHEAT: &str = "minecraft:wheat";
pub const LOG: &str = "minecraft:log";
pub const FURNACE: &str = "minecraft:furnace";
pub const PISTON: &str = "minecraft:piston";

/// Interned arena of every state of every registered block type.
#[derive(Clone, Debug, Default)]
pub struct StateTable {
    blocks: BTreeMap<String, BlockType>,
    states: Vec<BlockState>,
    index: HashMap<BlockState, StateId>,
    defaults: HashMap<String, StateId>,
}

impl StateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference block set: stone, wheat (`age` 0..=7), log (`axis`),
    /// furnace (horizontal `facing`) and piston (`facing`, `extended`).
    pub fn standard() -> Self {
        let horizontal = ["north", "south", "west", "east"];
        let mut table = Self::new();
        let blocks = [
            BlockType::new(STONE),
            BlockType::new(WHEAT).property("age", PropertyRange::Int { min: 0, max: 7 }),
            BlockType::new(LOG).property("axis", PropertyRange::names(["y", "x", "z", "none"])),
            BlockType::new(FURNACE).property("facing", PropertyRange::names(horizontal)),
            BlockType::new(PISTON)
                .property(
                    "facing",
                    PropertyRange::names(["down", "up", "north", "south", "west", "east"]),
                )
                .property("extended", PropertyRange::Bool),
        ];
        for block in blocks {
            table.register(block);
        }
        table
    }

    /// Intern every state of `block`. Registering the same id twice is a
    /// no-op.
    pub fn register(&mut self, block: BlockType) {
        if self.blocks.contains_key(&block.id) {
            return;
        }
        let mut combos: Vec<BTreeMap<String, PropertyValue>> = vec![BTreeMap::new()];
        for (name, range) in &block.properties {
            combos = combos
                .into_iter()
                .flat_map(|base| {
                    range.values().into_iter().map(move |v| {
                        let mut next = base.clone();
                        next.insert(name.clone(), v);
                        next
                    })
                })
                .collect();
        }
        for (i, properties) in combos.into_iter().enumerate() {
            let state = BlockState {
                block: block.id.clone(),
                properties,
            };
            let id = StateId(self.states.len() as u32);
            if i == 0 {
                self.defaults.insert(block.id.clone(), id);
            }
            self.index.insert(state.clone(), id);
            self.states.push(state);
        }
        tracing::debug!(block = %block.id, states = self.states.len(), "registered block type");
        self.blocks.insert(block.id.clone(), block);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn block_type(&self, id: &str) -> Option<&BlockType> {
        self.blocks.get(id)
    }

    pub fn default_state(&self, block: &str) -> HolderResult<StateId> {
        self.defaults
            .get(block)
            .copied()
            .ok_or_else(|| HolderError::UnknownBlock(block.to_string()))
    }

    pub fn state(&self, id: StateId) -> HolderResult<&BlockState> {
        self.states
            .get(id.0 as usize)
            .ok_or(HolderError::UnknownState(id.0))
    }

    pub fn block_of(&self, id: StateId) -> Option<&str> {
        self.states.get(id.0 as usize).map(|s| s.block.as_str())
    }

    pub fn property(&self, id: StateId, property: &str) -> Option<&PropertyValue> {
        self.states.get(id.0 as usize)?.get(property)
    }

    /// Range of `property` for the block of state `id`.
    pub fn range(&self, id: StateId, property: &str) -> Option<&PropertyRange> {
        self.block_type(self.block_of(id)?)?.range(property)
    }

    /// The state identical to `id` except for `property`.
    pub fn with_property(
        &self,
        id: StateId,
        property: &str,
        value: PropertyValue,
    ) -> HolderResult<StateId> {
        let current = self.state(id)?;
        let range = self
            .block_type(&current.block)
            .and_then(|b| b.range(property))
            .ok_or_else(|| HolderError::UnknownProperty {
                block: current.block.clone(),
                property: property.to_string(),
            })?;
        if !range.contains(&value) {
            return Err(HolderError::InvalidPropertyValue {
                block: current.block.clone(),
                property: property.to_string(),
                value: value.to_string(),
            });
        }
        let mut next = current.clone();
        next.properties.insert(property.to_string(), value);
        self.index
            .get(&next)
            .copied()
            .ok_or(HolderError::UnknownState(id.0))
    }
}
