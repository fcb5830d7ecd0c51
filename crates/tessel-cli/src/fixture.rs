//! TOML fixtures describing a small scene of holders and blocks.
//!
//! ```toml
//! [[holder]]
//! name = "grumbles"
//! entity = "zombie"
//! [holder.data]
//! "tessel:display_name" = "Grumbles"
//!
//! [[holder]]
//! name = "boots"
//! item = "minecraft:leather_boots"
//!
//! [[block]]
//! name = "crop"
//! block = "minecraft:wheat"
//! pos = { x = 0, y = 64, z = 0 }
//! ```
//!
//! `data` entries are offered through the facade when the scene is built,
//! so a fixture can only describe states the processors accept.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tessel_holder::{
    DataHolder, Entity, EntityKind, InMemoryBlockStore, ItemStack, StateTable, TileEntity, TileKind,
};
use tessel_registry::DataFacade;
use tessel_types::{BlockPos, WorldId};

/// World every fixture block is placed in.
pub const FIXTURE_WORLD: WorldId = WorldId::from_u128(1);

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default, rename = "holder")]
    pub holders: Vec<HolderEntry>,
    #[serde(default, rename = "block")]
    pub blocks: Vec<BlockEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HolderEntry {
    pub name: String,
    #[serde(flatten)]
    pub kind: HolderKind,
    /// Values offered after creation, keyed by key id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, Json>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolderKind {
    Entity(EntityKind),
    Item(String),
    Tile {
        kind: TileKind,
        #[serde(default)]
        pos: BlockPos,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockEntry {
    pub name: String,
    pub block: String,
    pub pos: BlockPos,
}

impl Fixture {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture '{}'", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid fixture '{}'", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let fixture: Fixture = toml::from_str(content)?;
        let mut seen = HashSet::new();
        let names = fixture.holders.iter().map(|h| &h.name);
        for name in names.chain(fixture.blocks.iter().map(|b| &b.name)) {
            if !seen.insert(name) {
                bail!("duplicate name '{name}'");
            }
        }
        Ok(fixture)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write fixture '{}'", path.display()))
    }

    pub fn holder_mut(&mut self, name: &str) -> Option<&mut HolderEntry> {
        self.holders.iter_mut().find(|h| h.name == name)
    }

    /// Create every holder and block, applying `data` through `facade`.
    pub fn build(&self, facade: &DataFacade) -> anyhow::Result<Scene> {
        let mut holders = Vec::with_capacity(self.holders.len());
        for entry in &self.holders {
            let mut holder = entry.kind.create();
            for (id, value) in &entry.data {
                let key = facade
                    .registry()
                    .find_key(id)
                    .with_context(|| format!("{}: unknown key '{id}'", entry.name))?;
                let result = facade.offer_json(holder.as_mut(), key, value.clone());
                if !result.is_successful() {
                    let reason = result
                        .rejected()
                        .first()
                        .map(|r| r.reason.clone())
                        .or_else(|| result.error().map(str::to_string))
                        .unwrap_or_else(|| result.kind().to_string());
                    bail!("{}: {id} not accepted: {reason}", entry.name);
                }
            }
            holders.push((entry.name.clone(), holder));
        }

        let store = InMemoryBlockStore::new(StateTable::standard());
        let mut blocks = Vec::with_capacity(self.blocks.len());
        for entry in &self.blocks {
            store
                .place(FIXTURE_WORLD, entry.pos, &entry.block)
                .with_context(|| format!("{}: cannot place '{}'", entry.name, entry.block))?;
            blocks.push((entry.name.clone(), entry.pos));
        }
        tracing::debug!(holders = holders.len(), blocks = blocks.len(), "fixture built");
        Ok(Scene {
            holders,
            store,
            blocks,
        })
    }
}

impl HolderKind {
    fn create(&self) -> Box<dyn DataHolder> {
        match self {
            Self::Entity(kind) => Box::new(Entity::new(*kind)),
            Self::Item(item_type) => Box::new(ItemStack::new(item_type.as_str())),
            Self::Tile { kind, pos } => Box::new(TileEntity::new(*kind, *pos)),
        }
    }
}

/// Live holders and blocks created from a [`Fixture`].
pub struct Scene {
    pub holders: Vec<(String, Box<dyn DataHolder>)>,
    pub store: InMemoryBlockStore,
    pub blocks: Vec<(String, BlockPos)>,
}

impl Scene {
    pub fn holder_mut(&mut self, name: &str) -> Option<&mut dyn DataHolder> {
        self.holders
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, holder)| holder.as_mut() as &mut dyn DataHolder)
    }
}
