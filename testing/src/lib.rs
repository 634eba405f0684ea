//! Test utilities for flowctl flows.
//!
//! - [`CallCounter`]: a stub step that records how often it ran, available in
//!   every calling convention
//! - [`deferred`]: a future-shaped step that settles on a later turn
//! - [`failing`]: a step that always fails with a given message
//! - [`assert_results!`]: compare a finished run against expected JSON values

use flowctl_core::{AsyncFunction, IntoValues, Values, asyncify, callback, future};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub use serde_json;

/// Counts invocations of the steps it hands out.
///
/// Clones share the same count.
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    calls: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn was_called(&self) -> bool {
        self.count() > 0
    }

    /// Synchronous step producing no value.
    pub fn sync_step(&self) -> AsyncFunction {
        let calls = self.calls.clone();
        asyncify(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .with_label("counter")
    }

    /// Callback step completing immediately with no value.
    pub fn callback_step(&self) -> AsyncFunction {
        let calls = self.calls.clone();
        callback(move |_, done| {
            calls.fetch_add(1, Ordering::SeqCst);
            done.resolve(());
        })
        .with_label("counter")
    }

    /// Future step that yields once before completing with no value.
    pub fn future_step(&self) -> AsyncFunction {
        let calls = self.calls.clone();
        future(move |_| {
            let calls = calls.clone();
            async move {
                tokio::task::yield_now().await;
                calls.fetch_add(1, Ordering::SeqCst);
                anyhow::Ok(())
            }
        })
        .with_label("counter")
    }

    /// Synchronous step producing `output` every time.
    pub fn returning<T>(&self, output: T) -> AsyncFunction
    where
        T: IntoValues + Clone + Send + Sync + 'static,
    {
        let calls = self.calls.clone();
        asyncify(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(output.clone())
        })
        .with_label("counter")
    }
}

/// Future-shaped step that settles with `output` after yielding to the
/// scheduler.
pub fn deferred<T>(output: T) -> AsyncFunction
where
    T: IntoValues + Clone + Send + Sync + 'static,
{
    future(move |_| {
        let output = output.clone();
        async move {
            tokio::task::yield_now().await;
            anyhow::Ok(output)
        }
    })
    .with_label("deferred")
}

/// Callback step that always rejects with `message`.
pub fn failing(message: &'static str) -> AsyncFunction {
    callback(move |_: Values, done| done.reject(anyhow::anyhow!(message))).with_label("failing")
}

/// Assert that a run succeeded with exactly the given results.
///
/// ```rust,ignore
/// assert_results!(flow.exec().await, [7, "done"]);
/// ```
#[macro_export]
macro_rules! assert_results {
    ($completion:expr, [$($value:expr),* $(,)?]) => {{
        match $completion {
            Ok(results) => {
                let expected: Vec<$crate::serde_json::Value> =
                    vec![$($crate::serde_json::json!($value)),*];
                assert_eq!(results.as_slice(), expected.as_slice(), "unexpected flow results");
            }
            Err(error) => panic!("flow failed: {error}"),
        }
    }};
}
