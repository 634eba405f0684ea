//! FlowSequence - The Declared Program
//!
//! An ordered list of clauses. Built by appending, then handed to the
//! runtime as `&FlowSequence`, so it cannot change while it runs.

use crate::behavior::Behavior;
use crate::outline::{BranchOutline, ItemOutline, Outline, StepOutline};
use flowctl_core::{AsyncFunction, BuildError, Values};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// One unconditional slot seeded with caller values.
    Chain,
    /// `if` / `else if` / `else` slots, first match wins.
    Condition,
    /// A single `while` slot.
    Loop,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Chain => "chain",
            ItemKind::Condition => "condition",
            ItemKind::Loop => "loop",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SequenceItem {
    kind: ItemKind,
    behaviors: Vec<Behavior>,
    /// Set once an `else` slot is added; no further slots may follow.
    closed: bool,
}

impl SequenceItem {
    pub fn chain(initial: Values) -> Self {
        let slot = Behavior::new(AsyncFunction::always_true())
            .with_action(AsyncFunction::constant(initial));
        SequenceItem {
            kind: ItemKind::Chain,
            behaviors: vec![slot],
            closed: true,
        }
    }

    pub fn condition(predicate: AsyncFunction) -> Self {
        SequenceItem {
            kind: ItemKind::Condition,
            behaviors: vec![Behavior::new(predicate)],
            closed: false,
        }
    }

    pub fn repeat(predicate: AsyncFunction) -> Self {
        SequenceItem {
            kind: ItemKind::Loop,
            behaviors: vec![Behavior::new(predicate)],
            closed: true,
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    fn open_branch(&mut self, clause: &'static str, behavior: Behavior) -> Result<(), BuildError> {
        if self.kind != ItemKind::Condition {
            return Err(BuildError::NotACondition {
                clause,
                kind: self.kind.as_str(),
            });
        }
        if self.closed {
            return Err(BuildError::AfterElse(clause));
        }
        self.behaviors.push(behavior);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlowSequence {
    items: Vec<SequenceItem>,
}

impl FlowSequence {
    pub fn new() -> Self {
        FlowSequence { items: Vec::new() }
    }

    pub fn items(&self) -> &[SequenceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: SequenceItem) {
        self.items.push(item);
    }

    /// `if`: open a new condition item.
    pub fn open_condition(&mut self, predicate: AsyncFunction) {
        self.push(SequenceItem::condition(predicate));
    }

    /// `chain`: open a new chain item seeded with `initial`.
    pub fn open_chain(&mut self, initial: Values) {
        self.push(SequenceItem::chain(initial));
    }

    /// `while`: open a new loop item.
    pub fn open_loop(&mut self, predicate: AsyncFunction) {
        self.push(SequenceItem::repeat(predicate));
    }

    /// `else if`: add a guarded slot to the current condition.
    pub fn add_branch(&mut self, predicate: AsyncFunction) -> Result<(), BuildError> {
        self.current_mut("else_if")?
            .open_branch("else_if", Behavior::new(predicate))
    }

    /// `else`: add the final unconditional slot to the current condition.
    pub fn add_fallback(&mut self, action: AsyncFunction) -> Result<(), BuildError> {
        let item = self.current_mut("else")?;
        item.open_branch("else", Behavior::otherwise(action))?;
        item.closed = true;
        Ok(())
    }

    /// `then`: compose `action` onto the current slot.
    pub fn compose_action(&mut self, action: AsyncFunction) -> Result<(), BuildError> {
        let item = self.current_mut("then")?;
        match item.behaviors.last_mut() {
            Some(slot) => {
                slot.compose(action);
                Ok(())
            }
            None => Err(BuildError::NoOpenItem("then")),
        }
    }

    /// Structural description of the declared flow.
    pub fn outline(&self) -> Outline {
        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| ItemOutline {
                index,
                kind: item.kind,
                branches: item
                    .behaviors
                    .iter()
                    .map(|b| BranchOutline {
                        predicate: StepOutline::of(b.predicate()),
                        actions: b.actions().iter().map(StepOutline::of).collect(),
                    })
                    .collect(),
            })
            .collect();
        Outline { items }
    }

    fn current_mut(&mut self, clause: &'static str) -> Result<&mut SequenceItem, BuildError> {
        self.items.last_mut().ok_or(BuildError::NoOpenItem(clause))
    }
}
