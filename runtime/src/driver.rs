//! Sequence Driver
//!
//! Walks the items of a sequence strictly in declaration order. Each item
//! finishes, including any deferred work, before the next one starts.

use crate::{conditional, looping};
use flowctl_core::{FlowConfig, FlowResult, ResultSet};
use flowctl_flow::{FlowSequence, ItemKind};
use tracing::Instrument;

/// Run every item of `sequence`, appending defined results to `results`.
///
/// Stops at the first error and returns it unchanged; `results` then holds
/// what earlier items produced.
pub async fn run_sequence(
    sequence: &FlowSequence,
    config: &FlowConfig,
    results: &mut ResultSet,
) -> FlowResult<()> {
    for (index, item) in sequence.items().iter().enumerate() {
        let span = tracing::debug_span!("Item", flowctl.item = index, flowctl.kind = %item.kind());
        let outcome = async {
            match item.kind() {
                ItemKind::Chain | ItemKind::Condition => conditional::evaluate(item, config).await,
                ItemKind::Loop => looping::repeat(item, config).await,
            }
        }
        .instrument(span)
        .await;

        match outcome {
            Ok(Some(output)) => {
                if let Some(value) = output.into_first() {
                    results.push(value);
                }
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(item = index, kind = %item.kind(), %error, "Item failed, stopping flow");
                return Err(error);
            }
        }
    }
    Ok(())
}
