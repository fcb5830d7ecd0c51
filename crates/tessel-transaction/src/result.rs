use std::fmt;

use serde::Serialize;
use tessel_types::KeyId;
use tessel_value::AnyValue;

use crate::kind::TransactionKind;

/// A value that was not applied, and why.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RejectedValue {
    pub value: AnyValue,
    pub reason: String,
}

impl RejectedValue {
    pub fn new(value: AnyValue, reason: impl Into<String>) -> Self {
        Self {
            value,
            reason: reason.into(),
        }
    }
}

/// Outcome of a write through the framework.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DataTransactionResult {
    kind: TransactionKind,
    replaced: Vec<AnyValue>,
    successful: Vec<AnyValue>,
    rejected: Vec<RejectedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DataTransactionResult {
    pub fn builder() -> ResultBuilder {
        ResultBuilder::default()
    }

    /// SUCCESS with nothing written.
    pub fn success_no_data() -> Self {
        Self::default()
    }

    /// SUCCESS writing `value` where nothing was replaced.
    pub fn success_result(value: AnyValue) -> Self {
        Self::builder().success(value).build()
    }

    /// SUCCESS writing `successful`, recording `replaced` as the previous state.
    pub fn success_replace_result(successful: AnyValue, replaced: AnyValue) -> Self {
        Self::builder().success(successful).replace(replaced).build()
    }

    /// FAILURE rejecting a single value.
    pub fn fail_result(value: AnyValue, reason: impl Into<String>) -> Self {
        Self::builder().reject(value, reason).build()
    }

    /// FAILURE with nothing attempted.
    pub fn fail_no_data() -> Self {
        Self {
            kind: TransactionKind::Failure,
            ..Self::default()
        }
    }

    /// ERROR with nothing recorded.
    pub fn error_result(reason: impl Into<String>) -> Self {
        Self::builder().error(reason).build()
    }

    /// CANCELLED, listing every vetoed value as rejected.
    pub fn cancelled<I>(vetoed: I, reason: &str) -> Self
    where
        I: IntoIterator<Item = AnyValue>,
    {
        let mut builder = Self::builder().cancel();
        for value in vetoed {
            builder = builder.reject(value, reason);
        }
        builder.build()
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn is_successful(&self) -> bool {
        self.kind.is_success()
    }

    pub fn replaced(&self) -> &[AnyValue] {
        &self.replaced
    }

    pub fn successful(&self) -> &[AnyValue] {
        &self.successful
    }

    pub fn rejected(&self) -> &[RejectedValue] {
        &self.rejected
    }

    /// Description of the internal fault for ERROR results.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether `key` appears among the rejected values.
    pub fn is_rejected(&self, key: KeyId) -> bool {
        self.rejected.iter().any(|r| r.value.id() == key)
    }

    /// Combine two results: lists are concatenated in order and the kind is
    /// the worse of the two.
    pub fn combine(mut self, other: DataTransactionResult) -> Self {
        self.absorb(other);
        self
    }

    pub fn absorb(&mut self, other: DataTransactionResult) {
        self.kind = self.kind.worst(other.kind);
        self.replaced.extend(other.replaced);
        self.successful.extend(other.successful);
        self.rejected.extend(other.rejected);
        self.error = match (self.error.take(), other.error) {
            (Some(a), Some(b)) => Some(format!("{a}; {b}")),
            (a, b) => a.or(b),
        };
    }
}

impl fmt::Display for DataTransactionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (successful: {}, replaced: {}, rejected: {})",
            self.kind,
            self.successful.len(),
            self.replaced.len(),
            self.rejected.len()
        )?;
        if let Some(error) = &self.error {
            write!(f, ": {error}")?;
        }
        Ok(())
    }
}

/// Accumulates the data of a transaction and infers its kind on
/// [`build`](Self::build).
///
/// Inference, in order: an internal fault gives ERROR (partial data is
/// kept); a veto gives CANCELLED; rejections with no successful write give
/// FAILURE; anything else is SUCCESS.
#[derive(Clone, Debug, Default)]
pub struct ResultBuilder {
    replaced: Vec<AnyValue>,
    successful: Vec<AnyValue>,
    rejected: Vec<RejectedValue>,
    cancelled: bool,
    error: Option<String>,
}

impl ResultBuilder {
    pub fn replace(mut self, value: AnyValue) -> Self {
        self.replaced.push(value);
        self
    }

    pub fn replace_all<I: IntoIterator<Item = AnyValue>>(mut self, values: I) -> Self {
        self.replaced.extend(values);
        self
    }

    pub fn success(mut self, value: AnyValue) -> Self {
        self.successful.push(value);
        self
    }

    pub fn success_all<I: IntoIterator<Item = AnyValue>>(mut self, values: I) -> Self {
        self.successful.extend(values);
        self
    }

    pub fn reject(mut self, value: AnyValue, reason: impl Into<String>) -> Self {
        self.rejected.push(RejectedValue::new(value, reason));
        self
    }

    pub fn reject_all<I: IntoIterator<Item = RejectedValue>>(mut self, values: I) -> Self {
        self.rejected.extend(values);
        self
    }

    pub fn cancel(mut self) -> Self {
        self.cancelled = true;
        self
    }

    pub fn error(mut self, reason: impl Into<String>) -> Self {
        self.error = Some(reason.into());
        self
    }

    pub fn build(self) -> DataTransactionResult {
        let kind = if self.error.is_some() {
            TransactionKind::Error
        } else if self.cancelled {
            TransactionKind::Cancelled
        } else if !self.rejected.is_empty() && self.successful.is_empty() {
            TransactionKind::Failure
        } else {
            TransactionKind::Success
        };
        DataTransactionResult {
            kind,
            replaced: self.replaced,
            successful: self.successful,
            rejected: self.rejected,
            error: self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use tessel_types::Key;
    use tessel_value::ImmutableValue;

    const COLOR: Key<i32> = Key::single("test:color", "Color");
    const NAME: Key<String> = Key::single("test:name", "Name");

    fn color(rgb: i32) -> AnyValue {
        ImmutableValue::with_actual(COLOR, 0xffffff, rgb).to_any()
    }

    fn name(s: &str) -> AnyValue {
        ImmutableValue::with_actual(NAME, String::new(), s.to_string()).to_any()
    }

    fn result_of_kind(kind: TransactionKind, tag: i32) -> DataTransactionResult {
        let builder = DataTransactionResult::builder();
        match kind {
            TransactionKind::Success => builder.success(color(tag)).replace(color(0)),
            TransactionKind::Cancelled => builder.cancel().reject(color(tag), "veto"),
            TransactionKind::Failure => builder.reject(color(tag), "bad"),
            TransactionKind::Error => builder.replace(color(tag)).error("boom"),
        }
        .build()
    }

    // -----------------------------------------------------------------------
    // Kind inference
    // -----------------------------------------------------------------------

    #[test]
    fn empty_builder_is_success() {
        let r = DataTransactionResult::builder().build();
        assert!(r.is_successful());
        assert!(r.replaced().is_empty());
    }

    #[test]
    fn rejection_without_success_is_failure() {
        let r = DataTransactionResult::fail_result(color(1), "unsupported");
        assert_eq!(r.kind(), TransactionKind::Failure);
        assert!(r.is_rejected(COLOR.id()));
        assert_eq!(r.rejected()[0].reason, "unsupported");
    }

    #[test]
    fn partial_rejection_is_success() {
        let r = DataTransactionResult::builder()
            .success(color(1))
            .replace(color(0))
            .reject(name("x"), "out of bounds")
            .build();
        assert_eq!(r.kind(), TransactionKind::Success);
        assert_eq!(r.replaced().len() + r.rejected().len(), 2);
    }

    #[test]
    fn error_keeps_partial_data() {
        let r = DataTransactionResult::builder()
            .replace(color(0))
            .success(color(1))
            .error("holder exploded")
            .build();
        assert_eq!(r.kind(), TransactionKind::Error);
        assert_eq!(r.successful().len(), 1);
        assert_eq!(r.error(), Some("holder exploded"));
    }

    #[test]
    fn cancelled_lists_vetoed_values() {
        let r = DataTransactionResult::cancelled([color(1), name("n")], "vetoed");
        assert_eq!(r.kind(), TransactionKind::Cancelled);
        assert_eq!(r.rejected().len(), 2);
        assert!(r.successful().is_empty());
    }

    // -----------------------------------------------------------------------
    // Combination
    // -----------------------------------------------------------------------

    #[test]
    fn combine_takes_worst_kind_and_concatenates() {
        let a = DataTransactionResult::success_replace_result(color(1), color(0));
        let b = DataTransactionResult::fail_result(name("x"), "nope");
        let c = a.combine(b);
        assert_eq!(c.kind(), TransactionKind::Failure);
        assert_eq!(c.successful().len(), 1);
        assert_eq!(c.rejected().len(), 1);
    }

    #[test]
    fn combine_joins_error_messages() {
        let c = DataTransactionResult::error_result("a").combine(DataTransactionResult::error_result("b"));
        assert_eq!(c.error(), Some("a; b"));
    }

    #[test]
    fn serializes_kind_and_values() {
        let r = DataTransactionResult::success_result(color(7));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["kind"], json!("SUCCESS"));
        assert_eq!(json["successful"][0]["actual"], json!(7));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn display_summary() {
        let r = DataTransactionResult::fail_result(color(1), "x");
        assert_eq!(
            r.to_string(),
            "FAILURE (successful: 0, replaced: 0, rejected: 1)"
        );
    }

    fn kind_strategy() -> impl Strategy<Value = TransactionKind> {
        prop_oneof![
            Just(TransactionKind::Success),
            Just(TransactionKind::Cancelled),
            Just(TransactionKind::Failure),
            Just(TransactionKind::Error),
        ]
    }

    proptest! {
        #[test]
        fn combine_is_associative(a in kind_strategy(), b in kind_strategy(), c in kind_strategy()) {
            let (ra, rb, rc) = (result_of_kind(a, 1), result_of_kind(b, 2), result_of_kind(c, 3));
            let left = ra.clone().combine(rb.clone()).combine(rc.clone());
            let right = ra.combine(rb.combine(rc));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn combined_kind_is_worst(a in kind_strategy(), b in kind_strategy()) {
            let combined = result_of_kind(a, 1).combine(result_of_kind(b, 2));
            prop_assert_eq!(combined.kind(), a.max(b));
        }
    }
}
