use std::fmt;

use tessel_holder::DataHolder;
use tessel_types::{BlockPos, KeyId, WorldId};
use tessel_value::AnyValue;

/// Where an offer is about to be written.
#[derive(Clone, Copy)]
pub enum OfferTarget<'a> {
    Holder(&'a dyn DataHolder),
    Block { world: WorldId, pos: BlockPos },
}

impl fmt::Debug for OfferTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Holder(holder) => write!(f, "Holder({})", holder.holder_type()),
            Self::Block { world, pos } => write!(f, "Block({world} @ {pos})"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookDecision {
    Allow,
    Veto { reason: String },
}

/// External veto consulted before every write. A veto cancels the whole
/// offer before any processor runs.
pub trait OfferHook: Send + Sync {
    fn name(&self) -> &str;

    fn before_offer(&self, target: OfferTarget<'_>, values: &[AnyValue]) -> HookDecision;
}

pub struct NoOpHook;

impl OfferHook for NoOpHook {
    fn name(&self) -> &str {
        "noop"
    }

    fn before_offer(&self, _target: OfferTarget<'_>, _values: &[AnyValue]) -> HookDecision {
        HookDecision::Allow
    }
}

/// Vetoes any offer touching one of a fixed set of keys.
pub struct KeyVetoHook {
    keys: Vec<KeyId>,
}

impl KeyVetoHook {
    pub fn new<I: IntoIterator<Item = KeyId>>(keys: I) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

impl OfferHook for KeyVetoHook {
    fn name(&self) -> &str {
        "key-veto"
    }

    fn before_offer(&self, _target: OfferTarget<'_>, values: &[AnyValue]) -> HookDecision {
        match values.iter().find(|v| self.keys.contains(&v.id())) {
            Some(value) => HookDecision::Veto {
                reason: format!("{} is locked", value.id()),
            },
            None => HookDecision::Allow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_types::Key;

    const LOCKED: Key<i32> = Key::single("test:locked", "Locked");
    const OPEN: Key<i32> = Key::single("test:open", "Open");

    fn block() -> OfferTarget<'static> {
        OfferTarget::Block {
            world: WorldId::from_u128(1),
            pos: BlockPos::ORIGIN,
        }
    }

    #[test]
    fn noop_hook_allows() {
        let values = [AnyValue::of(&OPEN, &0, Some(&1))];
        assert_eq!(NoOpHook.before_offer(block(), &values), HookDecision::Allow);
    }

    #[test]
    fn key_veto_names_the_key() {
        let hook = KeyVetoHook::new([LOCKED.id()]);
        let allowed = [AnyValue::of(&OPEN, &0, Some(&1))];
        assert_eq!(hook.before_offer(block(), &allowed), HookDecision::Allow);
        let vetoed = [AnyValue::of(&OPEN, &0, Some(&1)), AnyValue::of(&LOCKED, &0, Some(&2))];
        assert_eq!(
            hook.before_offer(block(), &vetoed),
            HookDecision::Veto {
                reason: "test:locked is locked".into()
            }
        );
    }
}
