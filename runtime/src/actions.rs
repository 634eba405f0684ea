use flowctl_core::{AsyncFunction, FlowConfig, Settlement, Values};

/// Run a slot's composed actions left to right.
///
/// Each action receives the previous one's output; the first error stops the
/// run. No actions means the default action: success with no value.
pub async fn run_actions(actions: &[AsyncFunction], input: Values, config: &FlowConfig) -> Settlement {
    let mut carried = input;
    for (position, action) in actions.iter().enumerate() {
        tracing::trace!(
            action = position,
            label = action.label().unwrap_or("anonymous"),
            shape = %action.shape(),
            "Running action"
        );
        carried = action.invoke(carried, config).await?;
    }
    if actions.is_empty() {
        return Ok(Values::new());
    }
    Ok(carried)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowctl_core::{asyncify, callback, future};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_results_flow_left_to_right() {
        let actions = vec![
            asyncify(|args: Values| Ok(args.i64(0)? + args.i64(1)?)),
            callback(|args, done| done.complete(args.i64(0).map(|v| v + 3))),
            future(|args: Values| async move { Ok::<_, anyhow::Error>(args.i64(0)? / 2) }),
        ];

        let out = run_actions(&actions, vec![json!(5), json!(6)].into(), &FlowConfig::default())
            .await
            .unwrap();
        assert_eq!(out, Values::single(7));
    }

    #[tokio::test]
    async fn test_error_stops_the_chain() {
        let later = Arc::new(AtomicUsize::new(0));
        let counter = later.clone();
        let actions = vec![
            callback(|_, done| done.reject(anyhow::anyhow!("Another test error"))),
            asyncify(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        ];

        let err = run_actions(&actions, Values::new(), &FlowConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Another test error");
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_actions_yield_nothing() {
        let out = run_actions(&[], Values::single(1), &FlowConfig::default())
            .await
            .unwrap();
        assert!(out.is_empty());
    }
}
