//! Transaction results for tessel.
//!
//! Every write through the framework reports a [`DataTransactionResult`]:
//! the outcome [`TransactionKind`], the values that were replaced, the
//! values that were successfully written, and the values that were
//! rejected together with a reason.
//!
//! # Design Rules
//!
//! 1. No attempted mutation is silently dropped: each attempted key ends up
//!    in either the replaced or the rejected list.
//! 2. Results combine associatively; the combined kind is the worst kind.
//! 3. An ERROR result keeps all partial data collected before the fault.

pub mod kind;
pub mod result;

pub use kind::TransactionKind;
pub use result::{DataTransactionResult, RejectedValue, ResultBuilder};
