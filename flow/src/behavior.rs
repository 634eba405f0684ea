//! Behavior - Predicate/Action Slot
//!
//! A behavior is one branch of a clause: a predicate deciding whether the
//! branch runs, and the ordered actions it runs when it does.
//!
//! # Composition
//! Actions run left to right. The first receives the slot's initial input,
//! each later one receives the previous one's output, and the first error
//! stops the slot. An empty action list is the default action: it succeeds
//! with no value.

use flowctl_core::AsyncFunction;

#[derive(Debug, Clone)]
pub struct Behavior {
    predicate: AsyncFunction,
    actions: Vec<AsyncFunction>,
}

impl Behavior {
    /// A slot guarded by `predicate`, with the default action.
    pub fn new(predicate: AsyncFunction) -> Self {
        Behavior {
            predicate,
            actions: Vec::new(),
        }
    }

    /// An unconditional slot running `action` (the `else` branch).
    pub fn otherwise(action: AsyncFunction) -> Self {
        Behavior::new(AsyncFunction::always_true()).with_action(action)
    }

    pub fn with_action(mut self, action: AsyncFunction) -> Self {
        self.compose(action);
        self
    }

    /// Append a follow-up action fed by the current last action's output.
    pub fn compose(&mut self, action: AsyncFunction) {
        self.actions.push(action);
    }

    pub fn predicate(&self) -> &AsyncFunction {
        &self.predicate
    }

    pub fn actions(&self) -> &[AsyncFunction] {
        &self.actions
    }

    /// Whether this slot still runs the default action.
    pub fn has_default_action(&self) -> bool {
        self.actions.is_empty()
    }
}
