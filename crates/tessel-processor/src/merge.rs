//! The priority merge.
//!
//! Reconciles an incoming trait with the state a holder already carries.
//! The policy works per declared key on the erased (JSON) form of each
//! value, so every trait processor shares one definition of it.
//!
//! | priority | scalar | collection |
//! |---|---|---|
//! | `DATA_HOLDER` | holder if present | holder if present |
//! | `PRE_MERGE` | incoming if set, else holder | incoming if set, else holder ++ incoming |
//! | `DATA_MANIPULATOR` | incoming | incoming |
//! | `POST_MERGE` | holder if present | holder ++ incoming |

use serde_json::Value as Json;
use tessel_data::{DataManipulator, ValueContainer};
use tessel_transaction::{DataTransactionResult, ResultBuilder};
use tessel_types::{DataPriority, KeyDescriptor, ValueShape};
use tessel_value::AnyValue;

/// Outcome of merging one key.
#[derive(Clone, Debug, PartialEq)]
enum Resolution {
    /// The incoming value stands.
    Incoming,
    /// The holder's value replaces the incoming one outright.
    Holder(Json),
    /// Holder and incoming collection elements combined.
    Combined(Json),
}

/// What the merge wants one key to end up as.
#[derive(Clone, Debug)]
struct KeyPlan {
    key: KeyDescriptor,
    previous: AnyValue,
    offered: AnyValue,
    /// `None` leaves the incoming (unset) value alone.
    target: Option<Json>,
    combined: bool,
}

#[derive(Clone, Debug)]
struct KeyOutcome {
    key: KeyDescriptor,
    previous: AnyValue,
    incoming: AnyValue,
    accepted: bool,
}

/// A merged trait together with the per-key bookkeeping needed to report
/// what was replaced and what was rejected.
#[derive(Clone, Debug)]
pub struct Merged<M> {
    data: M,
    priority: DataPriority,
    outcomes: Vec<KeyOutcome>,
}

impl<M: DataManipulator> Merged<M> {
    pub fn data(&self) -> &M {
        &self.data
    }

    pub fn into_data(self) -> M {
        self.data
    }

    /// Keys whose incoming (actual) value lost to the holder's.
    pub fn rejected_keys(&self) -> Vec<KeyDescriptor> {
        self.outcomes
            .iter()
            .filter(|o| !o.accepted)
            .map(|o| o.key)
            .collect()
    }

    /// Transaction result for writing the merged trait. Every declared key
    /// yields exactly one replaced or rejected entry.
    pub fn into_result(self) -> DataTransactionResult {
        self.report(DataTransactionResult::builder()).build()
    }

    fn report(&self, mut builder: ResultBuilder) -> ResultBuilder {
        for outcome in &self.outcomes {
            if outcome.accepted {
                if let Some(applied) = self.data.value_of(outcome.key.id) {
                    builder = builder.success(applied);
                }
                builder = builder.replace(outcome.previous.clone());
            } else {
                builder = builder.reject(
                    outcome.incoming.clone(),
                    format!("holder value kept under {}", self.priority),
                );
            }
        }
        builder
    }
}

/// Merge `incoming` with the holder's `current` state under `priority`.
///
/// `current` is `None` when the holder carries none of the trait; the
/// incoming trait then stands unchanged. The result is a pure function of
/// its inputs.
///
/// Every key is resolved before anything is applied, since some traits
/// constrain one key by another (air by max air, a spawner delay by its
/// bounds). Whether a key was accepted is read back from the merged trait,
/// so a rejected incoming value is never part of what gets written.
pub fn merge<M: DataManipulator>(
    current: Option<&M>,
    incoming: &M,
    priority: DataPriority,
) -> Merged<M> {
    let blank = M::default();
    let mut plans = Vec::with_capacity(M::declared_keys().len());

    for key in M::declared_keys() {
        let Some(offered) = incoming.value_of(key.id) else {
            continue;
        };
        let held = current.and_then(|c| c.value_of(key.id));
        let previous = held
            .clone()
            .or_else(|| blank.value_of(key.id))
            .unwrap_or_else(|| offered.clone());
        let holder_json = held.as_ref().and_then(AnyValue::get_direct);

        let resolution = resolve(key.shape, holder_json, &offered, priority);
        let combined = matches!(resolution, Resolution::Combined(_));
        let target = match resolution {
            Resolution::Incoming => offered.get_direct().cloned(),
            Resolution::Holder(json) | Resolution::Combined(json) => Some(json),
        };
        plans.push(KeyPlan {
            key: *key,
            previous,
            offered,
            target,
            combined,
        });
    }

    let data = settle(current, incoming, &plans);
    let outcomes = plans
        .into_iter()
        .map(|plan| {
            let applied = data.value_of(plan.key.id);
            let accepted = !plan.offered.exists()
                || applied.as_ref().is_some_and(|v| {
                    v.get() == plan.offered.get()
                        || (plan.combined && plan.target.as_ref() == Some(v.get()))
                });
            KeyOutcome {
                key: plan.key,
                previous: plan.previous,
                incoming: plan.offered,
                accepted,
            }
        })
        .collect();

    Merged {
        data,
        priority,
        outcomes,
    }
}

/// Apply every planned value to a copy of `incoming`.
///
/// Setting one key can clamp or refuse another, so passes repeat until
/// every target holds. A trait that does not settle falls back to the
/// holder's own state.
fn settle<M: DataManipulator>(current: Option<&M>, incoming: &M, plans: &[KeyPlan]) -> M {
    let mut data = incoming.copy();
    for _ in 0..=plans.len() {
        let pending = unsettled(&data, plans);
        if pending.is_empty() {
            return data;
        }
        for plan in pending {
            if let Some(target) = &plan.target {
                if let Err(e) = data.set_raw(plan.key.id, target.clone()) {
                    tracing::trace!(key = %plan.key.id, error = %e, "merged value refused for now");
                }
            }
        }
    }
    if unsettled(&data, plans).is_empty() {
        return data;
    }
    match current {
        Some(current) => {
            tracing::debug!(trait_type = %M::TRAIT, "merged values conflict, keeping holder state");
            current.copy()
        }
        None => data,
    }
}

fn unsettled<'a, M: DataManipulator>(data: &M, plans: &'a [KeyPlan]) -> Vec<&'a KeyPlan> {
    plans
        .iter()
        .filter(|plan| match &plan.target {
            Some(target) => data.value_of(plan.key.id).map_or(true, |v| v.get() != target),
            None => false,
        })
        .collect()
}

fn resolve(
    shape: ValueShape,
    holder: Option<&Json>,
    incoming: &AnyValue,
    priority: DataPriority,
) -> Resolution {
    let Some(holder) = holder else {
        return Resolution::Incoming;
    };
    let held_first = |holder: &Json| {
        if shape.is_collection() {
            Resolution::Combined(combine(shape, holder, incoming.get()))
        } else {
            Resolution::Holder(holder.clone())
        }
    };
    match priority {
        DataPriority::DataManipulator => Resolution::Incoming,
        DataPriority::DataHolder => Resolution::Holder(holder.clone()),
        DataPriority::PreMerge if incoming.exists() => Resolution::Incoming,
        DataPriority::PreMerge | DataPriority::PostMerge => held_first(holder),
    }
}

/// Holder elements followed by incoming elements. Sets skip incoming
/// elements already held; maps keep the holder's entry on conflict.
fn combine(shape: ValueShape, holder: &Json, incoming: &Json) -> Json {
    match (shape, holder, incoming) {
        (ValueShape::List, Json::Array(held), Json::Array(offered)) => {
            Json::Array(held.iter().chain(offered).cloned().collect())
        }
        (ValueShape::Set, Json::Array(held), Json::Array(offered)) => {
            let mut out = held.clone();
            for element in offered {
                if !out.contains(element) {
                    out.push(element.clone());
                }
            }
            Json::Array(out)
        }
        (ValueShape::Map, Json::Object(held), Json::Object(offered)) => {
            let mut out = held.clone();
            for (name, value) in offered {
                out.entry(name.clone()).or_insert_with(|| value.clone());
            }
            Json::Object(out)
        }
        _ => holder.clone(),
    }
}
