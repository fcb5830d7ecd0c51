use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tessel_data::{DataManipulator, TraitType};
use tessel_holder::{DataHolder, StateId, StateTable};
use tessel_processor::{
    BlockHandle, BlockTraitProcessor, ErasedBlockProcessor, ErasedTraitProcessor,
    ErasedValueProcessor, TraitHandle, TraitProcessor, ValueHandle, ValueProcessor,
};
use tessel_types::{Key, KeyDescriptor, KeyId, ValueType};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::hooks::OfferHook;

/// Ordered processors for one key or trait type.
struct Chain<P: ?Sized> {
    processors: Vec<Arc<P>>,
}

impl<P: ?Sized> Default for Chain<P> {
    fn default() -> Self {
        Self {
            processors: Vec::new(),
        }
    }
}

/// Key → value processors, trait type → trait processors, and trait type
/// → block processors, each an ordered chain.
///
/// Registration happens once during setup. [`seal`](Self::seal) freezes
/// the chains; after that the registry is read-only and can be shared
/// across threads.
pub struct ProcessorRegistry {
    config: RegistryConfig,
    keys: BTreeMap<KeyId, KeyDescriptor>,
    values: BTreeMap<KeyId, Chain<dyn ErasedValueProcessor>>,
    traits: BTreeMap<TraitType, Chain<dyn ErasedTraitProcessor>>,
    blocks: BTreeMap<TraitType, Chain<dyn ErasedBlockProcessor>>,
    hooks: Vec<Arc<dyn OfferHook>>,
    sealed: bool,
}

impl ProcessorRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            keys: BTreeMap::new(),
            values: BTreeMap::new(),
            traits: BTreeMap::new(),
            blocks: BTreeMap::new(),
            hooks: Vec::new(),
            sealed: false,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Freeze every chain. Idempotent.
    pub fn seal(&mut self) {
        if !self.sealed {
            self.sealed = true;
            tracing::info!(
                keys = self.values.len(),
                traits = self.traits.len(),
                block_traits = self.blocks.len(),
                hooks = self.hooks.len(),
                "processor registry sealed"
            );
        }
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Append a value processor to the chain of its key.
    pub fn register_value<P: ValueProcessor>(&mut self, processor: P) -> RegistryResult<()> {
        let handle: Arc<dyn ErasedValueProcessor> = Arc::new(ValueHandle::new(processor));
        let key = handle.key();
        let target = key.id.to_string();
        self.check_open(handle.name())?;
        let limit = self.config.max_chain_length;
        check_room(self.values.get(&key.id), handle.name(), &target, limit, |p| p.name())?;
        append(self.values.entry(key.id).or_default(), handle, &target, |p| p.name());
        self.keys.insert(key.id, key);
        Ok(())
    }

    /// Append a trait processor to the chain of its trait type.
    pub fn register_trait<P: TraitProcessor>(&mut self, processor: P) -> RegistryResult<()> {
        let handle: Arc<dyn ErasedTraitProcessor> = Arc::new(TraitHandle::new(processor));
        let trait_type = handle.trait_type();
        self.check_open(handle.name())?;
        let limit = self.config.max_chain_length;
        let chain = self.traits.get(&trait_type);
        check_room(chain, handle.name(), trait_type.id(), limit, |p| p.name())?;
        append(self.traits.entry(trait_type).or_default(), handle, trait_type.id(), |p| p.name());
        Ok(())
    }

    /// Append a block trait processor to the chain of its trait type.
    pub fn register_block<P: BlockTraitProcessor>(&mut self, processor: P) -> RegistryResult<()> {
        let handle: Arc<dyn ErasedBlockProcessor> = Arc::new(BlockHandle::new(processor));
        let trait_type = handle.trait_type();
        self.check_open(handle.name())?;
        let limit = self.config.max_chain_length;
        let chain = self.blocks.get(&trait_type);
        check_room(chain, handle.name(), trait_type.id(), limit, |p| p.name())?;
        append(self.blocks.entry(trait_type).or_default(), handle, trait_type.id(), |p| p.name());
        Ok(())
    }

    pub fn add_hook<H: OfferHook + 'static>(&mut self, hook: H) -> RegistryResult<()> {
        self.check_open(hook.name())?;
        self.hooks.push(Arc::new(hook));
        Ok(())
    }

    fn check_open(&self, name: &str) -> RegistryResult<()> {
        if self.sealed {
            tracing::warn!(processor = name, "registration after seal refused");
            return Err(RegistryError::Sealed {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Every key with at least one value processor, ordered by id.
    pub fn keys(&self) -> Vec<KeyDescriptor> {
        self.keys.values().copied().collect()
    }

    pub fn key(&self, id: KeyId) -> Option<KeyDescriptor> {
        self.keys.get(&id).copied()
    }

    /// Look a registered key up by its id string.
    pub fn find_key(&self, id: &str) -> Option<KeyDescriptor> {
        self.keys.values().find(|k| k.id.as_str() == id).copied()
    }

    pub fn trait_types(&self) -> Vec<TraitType> {
        self.traits.keys().copied().collect()
    }

    pub fn block_trait_types(&self) -> Vec<TraitType> {
        self.blocks.keys().copied().collect()
    }

    pub fn value_chain(&self, key: KeyId) -> Vec<&dyn ErasedValueProcessor> {
        chain_of(&self.values, &key)
    }

    pub fn trait_chain(&self, trait_type: TraitType) -> Vec<&dyn ErasedTraitProcessor> {
        chain_of(&self.traits, &trait_type)
    }

    pub fn block_chain(&self, trait_type: TraitType) -> Vec<&dyn ErasedBlockProcessor> {
        chain_of(&self.blocks, &trait_type)
    }

    pub(crate) fn hooks(&self) -> &[Arc<dyn OfferHook>] {
        &self.hooks
    }

    /// First value processor for `key` that supports `holder`.
    pub fn value_processor(
        &self,
        key: KeyId,
        holder: &dyn DataHolder,
    ) -> Option<&dyn ErasedValueProcessor> {
        let found = self
            .value_chain(key)
            .into_iter()
            .find(|p| p.supports(holder));
        if found.is_none() {
            tracing::debug!(key = %key, holder = holder.holder_type(), "no value processor supports holder");
        }
        found
    }

    /// First trait processor for `trait_type` that supports `holder`.
    pub fn trait_processor(
        &self,
        trait_type: TraitType,
        holder: &dyn DataHolder,
    ) -> Option<&dyn ErasedTraitProcessor> {
        let found = self
            .trait_chain(trait_type)
            .into_iter()
            .find(|p| p.supports(holder));
        if found.is_none() {
            tracing::debug!(trait_type = %trait_type, holder = holder.holder_type(), "no trait processor supports holder");
        }
        found
    }

    /// First block processor for `trait_type` that supports `state`.
    pub fn block_processor(
        &self,
        trait_type: TraitType,
        table: &StateTable,
        state: StateId,
    ) -> Option<&dyn ErasedBlockProcessor> {
        self.block_chain(trait_type)
            .into_iter()
            .find(|p| p.supports_state(table, state))
    }

    /// Typed form of [`value_processor`](Self::value_processor).
    pub fn value_handle<E: ValueType>(
        &self,
        key: &Key<E>,
        holder: &dyn DataHolder,
    ) -> Option<&ValueHandle<E>> {
        self.value_processor(key.id(), holder)?
            .as_any()
            .downcast_ref::<ValueHandle<E>>()
    }

    pub fn trait_handle<M: DataManipulator>(
        &self,
        holder: &dyn DataHolder,
    ) -> Option<&TraitHandle<M>> {
        self.trait_processor(M::TRAIT, holder)?
            .as_any()
            .downcast_ref::<TraitHandle<M>>()
    }

    /// The first registered trait processor for `M`, regardless of holder.
    pub fn any_trait_handle<M: DataManipulator>(&self) -> Option<&TraitHandle<M>> {
        self.trait_chain(M::TRAIT)
            .into_iter()
            .find_map(|p| p.as_any().downcast_ref::<TraitHandle<M>>())
    }

    pub fn block_handle<M: DataManipulator>(
        &self,
        table: &StateTable,
        state: StateId,
    ) -> Option<&BlockHandle<M>> {
        self.block_processor(M::TRAIT, table, state)?
            .as_any()
            .downcast_ref::<BlockHandle<M>>()
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("keys", &self.values.len())
            .field("traits", &self.traits.len())
            .field("block_traits", &self.blocks.len())
            .field("hooks", &self.hooks.len())
            .field("sealed", &self.sealed)
            .finish()
    }
}

/// Whether `chain` (absent until its first registration) can take a
/// processor named `new_name`. Checked before the chain is created, so a
/// refused registration leaves no empty chain behind.
fn check_room<P: ?Sized>(
    chain: Option<&Chain<P>>,
    new_name: &str,
    target: &str,
    limit: usize,
    name: impl Fn(&P) -> &str,
) -> RegistryResult<()> {
    let processors = chain.map(|c| c.processors.as_slice()).unwrap_or_default();
    if processors.iter().any(|p| name(&**p) == new_name) {
        return Err(RegistryError::DuplicateRegistration {
            name: new_name.to_string(),
            target: target.to_string(),
        });
    }
    if processors.len() >= limit {
        return Err(RegistryError::Config(format!(
            "chain for {target} is full ({limit} processors)"
        )));
    }
    Ok(())
}

fn append<P: ?Sized>(chain: &mut Chain<P>, processor: Arc<P>, target: &str, name: impl Fn(&P) -> &str) {
    tracing::debug!(
        processor = name(&*processor),
        chain = target,
        position = chain.processors.len(),
        "processor registered"
    );
    chain.processors.push(processor);
}

fn chain_of<'a, K: Ord, P: ?Sized>(map: &'a BTreeMap<K, Chain<P>>, key: &K) -> Vec<&'a P> {
    map.get(key)
        .map(|c| c.processors.iter().map(Arc::as_ref).collect())
        .unwrap_or_default()
}
