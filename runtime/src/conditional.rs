//! Conditional Interpreter
//!
//! Evaluates the slots of a condition (or chain) item in order and runs the
//! first one whose predicate holds. Later predicates are never evaluated
//! once a slot matches.

use crate::actions::run_actions;
use flowctl_core::{FlowConfig, FlowResult, Values};
use flowctl_flow::SequenceItem;

/// Returns `Some(output)` of the matched slot, or `None` when nothing matched.
pub async fn evaluate(item: &SequenceItem, config: &FlowConfig) -> FlowResult<Option<Values>> {
    for (branch, behavior) in item.behaviors().iter().enumerate() {
        let verdict = behavior.predicate().invoke(Values::new(), config).await?;
        if verdict.is_truthy() {
            tracing::debug!(branch, "Branch matched");
            return run_actions(behavior.actions(), Values::new(), config)
                .await
                .map(Some);
        }
        tracing::trace!(branch, "Predicate did not hold");
    }
    tracing::debug!("No branch matched");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowctl_core::{AsyncFunction, FlowError, asyncify, callback, future};
    use flowctl_flow::FlowSequence;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>, value: i64) -> AsyncFunction {
        let counter = counter.clone();
        asyncify(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        })
    }

    fn predicate(verdict: bool, counter: &Arc<AtomicUsize>) -> AsyncFunction {
        let counter = counter.clone();
        asyncify(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(verdict)
        })
    }

    #[tokio::test]
    async fn test_first_true_branch_wins() {
        let checks = Arc::new(AtomicUsize::new(0));
        let ran = Arc::new(AtomicUsize::new(0));

        let mut seq = FlowSequence::new();
        seq.open_condition(predicate(false, &checks));
        seq.compose_action(counting(&ran, 1)).unwrap();
        seq.add_branch(predicate(true, &checks)).unwrap();
        seq.compose_action(counting(&ran, 2)).unwrap();
        seq.add_branch(predicate(true, &checks)).unwrap();
        seq.compose_action(counting(&ran, 3)).unwrap();

        let out = evaluate(&seq.items()[0], &FlowConfig::default())
            .await
            .unwrap();
        assert_eq!(out, Some(Values::single(2)));
        assert_eq!(checks.load(Ordering::SeqCst), 2);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_falls_through_when_nothing_matches() {
        let ran = Arc::new(AtomicUsize::new(0));
        let mut seq = FlowSequence::new();
        seq.open_condition(asyncify(|_| Ok(false)));
        seq.compose_action(counting(&ran, 1)).unwrap();
        seq.add_branch(future(|_| async { Ok(0) })).unwrap();
        seq.compose_action(counting(&ran, 2)).unwrap();

        let out = evaluate(&seq.items()[0], &FlowConfig::default())
            .await
            .unwrap();
        assert_eq!(out, None);
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_else_runs_when_others_fail() {
        let mut seq = FlowSequence::new();
        seq.open_condition(asyncify(|_| Ok(false)));
        seq.add_fallback(asyncify(|_| Ok("fallback"))).unwrap();

        let out = evaluate(&seq.items()[0], &FlowConfig::default())
            .await
            .unwrap();
        assert_eq!(out.unwrap().str(0).unwrap(), "fallback");
    }

    #[tokio::test]
    async fn test_predicate_error_aborts_before_actions() {
        let ran = Arc::new(AtomicUsize::new(0));
        let checks = Arc::new(AtomicUsize::new(0));
        let mut seq = FlowSequence::new();
        seq.open_condition(callback(|_, done| done.reject(anyhow::anyhow!("A test error"))));
        seq.compose_action(counting(&ran, 1)).unwrap();
        seq.add_branch(predicate(true, &checks)).unwrap();

        let err = evaluate(&seq.items()[0], &FlowConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Failed(_)));
        assert_eq!(err.to_string(), "A test error");
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(checks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_matched_branch_without_then_yields_nothing() {
        let mut seq = FlowSequence::new();
        seq.open_condition(asyncify(|_| Ok(true)));

        let out = evaluate(&seq.items()[0], &FlowConfig::default())
            .await
            .unwrap();
        assert_eq!(out, Some(Values::new()));
    }
}
