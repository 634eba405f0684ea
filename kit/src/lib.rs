//! flowctl facade crate.
//!
//! Build a flow of `if` / `else_if` / `else`, `while` and `chain` clauses
//! whose steps may be synchronous, callback-based or future-based, then run
//! it once with uniform error propagation and result collection.
//!
//! ```rust,ignore
//! use flowctl::prelude::*;
//!
//! let results = flowctl::chain(Values::from(vec![json!(5), json!(6)]))
//!     .then_sync(|args| Ok(args.i64(0)? + args.i64(1)?))
//!     .then_sync(|args| Ok(args.i64(0)? + 3))
//!     .then_sync(|args| Ok(args.i64(0)? / 2))
//!     .exec()
//!     .await?;
//! assert_eq!(results, vec![json!(7)]);
//! ```
//!
//! The free functions below each start a fresh [`FlowControl`]; nothing is
//! shared between them.

pub mod observe;

pub use flowctl_core as core;
pub use flowctl_flow as flow;
pub use flowctl_runtime as runtime;

pub use flowctl_core::{
    AsyncFunction, Continuation, FlowConfig, FlowError, IntoValues, ResultSet, Step, Values,
    asyncify, callback, from_step, future, promise,
};
pub use flowctl_flow::{FlowSequence, Outline};
pub use flowctl_runtime::{Completion, FlowControl};
pub use serde_json::{Value, json};

/// A fresh, empty flow.
pub fn new() -> FlowControl {
    FlowControl::new()
}

/// Start a flow with a chain item yielding `initial`.
pub fn chain(initial: impl IntoValues) -> FlowControl {
    FlowControl::new().chain(initial)
}

/// Start a flow with a condition item.
pub fn if_(predicate: AsyncFunction) -> FlowControl {
    FlowControl::new().if_(predicate)
}

pub fn if_sync<F, T>(predicate: F) -> FlowControl
where
    F: Fn(Values) -> anyhow::Result<T> + Send + Sync + 'static,
    T: IntoValues,
{
    FlowControl::new().if_sync(predicate)
}

/// Start a flow with a loop item.
pub fn while_(predicate: AsyncFunction) -> FlowControl {
    FlowControl::new().while_(predicate)
}

pub fn while_sync<F, T>(predicate: F) -> FlowControl
where
    F: Fn(Values) -> anyhow::Result<T> + Send + Sync + 'static,
    T: IntoValues,
{
    FlowControl::new().while_sync(predicate)
}

pub mod prelude {
    pub use crate::{
        AsyncFunction, Completion, Continuation, FlowConfig, FlowControl, FlowError, IntoValues,
        ResultSet, Step, Value, Values, asyncify, callback, from_step, future, json, promise,
    };
}
