//! Loop Interpreter
//!
//! Re-evaluates a loop item's predicate after every successful pass of its
//! actions. Termination is up to the predicate.

use crate::actions::run_actions;
use flowctl_core::{FlowConfig, FlowResult, Values};
use flowctl_flow::SequenceItem;

/// Returns the last pass's output when `config.record_loop_results` is set,
/// `None` otherwise or when the body never ran.
pub async fn repeat(item: &SequenceItem, config: &FlowConfig) -> FlowResult<Option<Values>> {
    let Some(behavior) = item.behaviors().first() else {
        return Ok(None);
    };

    let mut passes: u64 = 0;
    let mut last = None;
    loop {
        let verdict = behavior.predicate().invoke(Values::new(), config).await?;
        if !verdict.is_truthy() {
            break;
        }
        last = Some(run_actions(behavior.actions(), Values::new(), config).await?);
        passes += 1;
    }

    tracing::debug!(passes, "Loop finished");
    Ok(if config.record_loop_results { last } else { None })
}
