//! flowctl Flow - Behavior Sequence Layer
//!
//! This crate defines the **structural** side of a flow:
//! - `Behavior`: a predicate/action slot
//! - `SequenceItem`: one chain, if or while clause
//! - `FlowSequence`: the ordered clauses of a whole flow
//!
//! **IMPORTANT**: This layer is Pure Rust - no IO, no Async.

pub mod behavior;
pub mod outline;
pub mod sequence;

pub use behavior::Behavior;
pub use outline::{BranchOutline, ItemOutline, Outline, StepOutline};
pub use sequence::{FlowSequence, ItemKind, SequenceItem};
