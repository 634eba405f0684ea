//! # FlowControl: Builder and Completion Bridge
//!
//! `FlowControl` owns a [`FlowSequence`] under construction, the resolvers
//! registered against it, and the results of its latest run.
//!
//! ## Design Philosophy
//!
//! * **Builder pattern**: `FlowControl::new().if_(p).then(a).else_(b)`
//! * **Two completion styles**: `exec().await` for a `Result`, or
//!   `exec_with(resolver)` for a callback
//! * **One run at a time**: `exec` takes `&mut self`
//!
//! ## Example
//!
//! ```rust,ignore
//! let results = FlowControl::new()
//!     .chain(vec![json!(5), json!(6)])
//!     .then_sync(|args| Ok(args.i64(0)? + args.i64(1)?))
//!     .exec()
//!     .await?;
//! ```

use crate::driver;
use flowctl_core::{
    AsyncFunction, BuildError, FlowConfig, FlowError, IntoValues, ResultSet, Values, asyncify,
};
use flowctl_flow::{FlowSequence, Outline};
use std::fmt;
use tracing::Instrument;
use uuid::Uuid;

/// Terminal outcome of a run, as seen by resolvers.
pub type Completion = Result<ResultSet, FlowError>;

type Resolver = Box<dyn FnMut(&Completion) + Send>;

pub struct FlowControl {
    id: Uuid,
    config: FlowConfig,
    sequence: FlowSequence,
    resolvers: Vec<Resolver>,
    results: ResultSet,
    build_error: Option<BuildError>,
}

impl Default for FlowControl {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowControl {
    /// An empty flow.
    pub fn new() -> Self {
        FlowControl {
            id: Uuid::new_v4(),
            config: FlowConfig::default(),
            sequence: FlowSequence::new(),
            resolvers: Vec::new(),
            results: ResultSet::new(),
            build_error: None,
        }
    }

    pub fn with_config(mut self, config: FlowConfig) -> Self {
        self.config = config;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn sequence(&self) -> &FlowSequence {
        &self.sequence
    }

    pub fn outline(&self) -> Outline {
        self.sequence.outline()
    }

    /// Results of the latest run. After a failed run this holds what the
    /// items before the failure produced.
    pub fn result_set(&self) -> &ResultSet {
        &self.results
    }

    /// Open a chain item yielding `initial` to its first `then`.
    pub fn chain(mut self, initial: impl IntoValues) -> Self {
        self.sequence.open_chain(initial.into_values());
        self
    }

    /// Open a condition item.
    pub fn if_(mut self, predicate: AsyncFunction) -> Self {
        self.sequence.open_condition(predicate);
        self
    }

    pub fn if_sync<F, T>(self, predicate: F) -> Self
    where
        F: Fn(Values) -> anyhow::Result<T> + Send + Sync + 'static,
        T: IntoValues,
    {
        self.if_(asyncify(predicate))
    }

    /// Open a loop item.
    pub fn while_(mut self, predicate: AsyncFunction) -> Self {
        self.sequence.open_loop(predicate);
        self
    }

    pub fn while_sync<F, T>(self, predicate: F) -> Self
    where
        F: Fn(Values) -> anyhow::Result<T> + Send + Sync + 'static,
        T: IntoValues,
    {
        self.while_(asyncify(predicate))
    }

    /// Add a guarded branch to the current condition.
    pub fn else_if(mut self, predicate: AsyncFunction) -> Self {
        let declared = self.sequence.add_branch(predicate);
        self.record(declared)
    }

    pub fn else_if_sync<F, T>(self, predicate: F) -> Self
    where
        F: Fn(Values) -> anyhow::Result<T> + Send + Sync + 'static,
        T: IntoValues,
    {
        self.else_if(asyncify(predicate))
    }

    /// Add the unconditional last branch to the current condition.
    pub fn else_(mut self, action: AsyncFunction) -> Self {
        let declared = self.sequence.add_fallback(action);
        self.record(declared)
    }

    pub fn else_sync<F, T>(self, action: F) -> Self
    where
        F: Fn(Values) -> anyhow::Result<T> + Send + Sync + 'static,
        T: IntoValues,
    {
        self.else_(asyncify(action))
    }

    /// Compose an action onto the current branch.
    pub fn then(mut self, action: AsyncFunction) -> Self {
        let declared = self.sequence.compose_action(action);
        self.record(declared)
    }

    pub fn then_sync<F, T>(self, action: F) -> Self
    where
        F: Fn(Values) -> anyhow::Result<T> + Send + Sync + 'static,
        T: IntoValues,
    {
        self.then(asyncify(action))
    }

    /// Register a resolver fired at the end of every subsequent run.
    pub fn on_complete<F>(&mut self, resolver: F) -> &mut Self
    where
        F: FnMut(&Completion) + Send + 'static,
    {
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// Register `resolver`, then run the flow.
    pub async fn exec_with<F>(&mut self, resolver: F)
    where
        F: FnMut(&Completion) + Send + 'static,
    {
        self.on_complete(resolver);
        self.run().await;
    }

    /// Run the flow and return its outcome.
    ///
    /// Registered resolvers fire before this returns.
    pub async fn exec(&mut self) -> Completion {
        self.run().await
    }

    async fn run(&mut self) -> Completion {
        let label = self.config.label.clone().unwrap_or_else(|| "flow".to_string());
        let span = tracing::info_span!("Flow", flowctl.flow = %label, flowctl.id = %self.id);
        let completion = self.drive().instrument(span).await;

        for resolver in self.resolvers.iter_mut() {
            resolver(&completion);
        }
        completion
    }

    async fn drive(&mut self) -> Completion {
        self.results = ResultSet::new();
        if let Some(error) = &self.build_error {
            tracing::error!(%error, "Refusing to run a malformed flow");
            return Err(FlowError::Build(error.clone()));
        }

        tracing::debug!(items = self.sequence.len(), "Flow started");
        match driver::run_sequence(&self.sequence, &self.config, &mut self.results).await {
            Ok(()) => {
                tracing::info!(results = self.results.len(), "Flow completed");
                Ok(self.results.clone())
            }
            Err(error) => {
                tracing::warn!(%error, "Flow failed");
                Err(error)
            }
        }
    }

    fn record(mut self, declared: Result<(), BuildError>) -> Self {
        if let Err(error) = declared {
            tracing::warn!(%error, "Invalid flow declaration");
            self.build_error.get_or_insert(error);
        }
        self
    }
}

impl fmt::Debug for FlowControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowControl")
            .field("id", &self.id)
            .field("items", &self.sequence.len())
            .field("resolvers", &self.resolvers.len())
            .field("build_error", &self.build_error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowctl_core::{callback, future};
    use flowctl_flow::ItemKind;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_exec_returns_results() {
        let results = FlowControl::new()
            .chain(vec![json!(5), json!(6)].into_iter().collect::<Values>())
            .then_sync(|args| Ok(args.i64(0)? + args.i64(1)?))
            .then(callback(|args, done| done.complete(args.i64(0).map(|v| v + 3))))
            .then(future(|args: Values| async move {
                Ok::<_, anyhow::Error>(args.i64(0)? / 2)
            }))
            .exec()
            .await
            .unwrap();
        assert_eq!(results, vec![json!(7)]);
    }

    #[tokio::test]
    async fn test_all_resolvers_fire_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let first = seen.clone();
        let second = seen.clone();

        let mut flow = FlowControl::new().chain("x");
        flow.on_complete(move |c| first.lock().unwrap().push(("first", c.is_ok())));
        flow.exec_with(move |c| second.lock().unwrap().push(("second", c.is_ok())))
            .await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![("first", true), ("second", true)]
        );
    }

    #[tokio::test]
    async fn test_resolvers_receive_the_same_error() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let a = errors.clone();
        let b = errors.clone();

        let mut flow = FlowControl::new().if_sync(|_| -> anyhow::Result<bool> {
            anyhow::bail!("A test error")
        });
        flow.on_complete(move |c| a.lock().unwrap().push(c.clone().unwrap_err()));
        flow.on_complete(move |c| b.lock().unwrap().push(c.clone().unwrap_err()));
        let outcome = flow.exec().await;

        assert_eq!(outcome.unwrap_err().to_string(), "A test error");
        let errors = errors.lock().unwrap();
        assert_eq!(errors.len(), 2);
        let (Some(x), Some(y)) = (errors[0].source_error(), errors[1].source_error()) else {
            panic!("expected step errors");
        };
        assert!(Arc::ptr_eq(x, y));
    }

    #[tokio::test]
    async fn test_rerun_starts_fresh_and_refires_resolvers() {
        let fired = Arc::new(Mutex::new(0));
        let counter = fired.clone();

        let mut flow = FlowControl::new().chain(1).chain(2);
        flow.on_complete(move |_| *counter.lock().unwrap() += 1);

        let first = flow.exec().await.unwrap();
        let second = flow.exec().await.unwrap();
        assert_eq!(first, vec![json!(1), json!(2)]);
        assert_eq!(second, vec![json!(1), json!(2)]);
        assert_eq!(*fired.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_repeated_exec_registers_no_resolvers() {
        let mut flow = FlowControl::new().chain(1);
        flow.on_complete(|_| {});

        for _ in 0..50 {
            assert_eq!(flow.exec().await.unwrap(), vec![json!(1)]);
        }
        assert_eq!(flow.resolvers.len(), 1);
    }

    #[tokio::test]
    async fn test_build_error_clears_previous_results() {
        let mut flow = FlowControl::new().chain("old");
        assert_eq!(flow.exec().await.unwrap(), vec![json!("old")]);

        let mut flow = flow.while_sync(|_| Ok(false)).else_sync(|_| Ok(()));
        assert!(flow.exec().await.unwrap_err().is_build());
        assert!(flow.result_set().is_empty());
    }

    #[tokio::test]
    async fn test_failed_run_keeps_partial_results() {
        let mut flow = FlowControl::new()
            .chain("before")
            .if_(callback(|_, done| done.reject(anyhow::anyhow!("boom"))));

        assert!(flow.exec().await.is_err());
        assert_eq!(flow.result_set(), &vec![json!("before")]);
    }

    #[tokio::test]
    async fn test_build_error_reported_without_running() {
        let ran = Arc::new(Mutex::new(false));
        let flag = ran.clone();

        let err = FlowControl::new()
            .then_sync(|_| Ok(()))
            .chain(1)
            .then_sync(move |_| {
                *flag.lock().unwrap() = true;
                Ok(())
            })
            .exec()
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::Build(BuildError::NoOpenItem("then"))));
        assert!(!*ran.lock().unwrap());
    }

    #[tokio::test]
    async fn test_else_on_loop_is_rejected() {
        let err = FlowControl::new()
            .while_sync(|_| Ok(false))
            .else_sync(|_| Ok(()))
            .exec()
            .await
            .unwrap_err();
        assert!(err.is_build());
    }

    #[test]
    fn test_outline_reflects_builder() {
        let flow = FlowControl::new()
            .if_sync(|_| Ok(true))
            .then_sync(|_| Ok(1))
            .else_if_sync(|_| Ok(false))
            .else_sync(|_| Ok(2))
            .while_sync(|_| Ok(false));

        let outline = flow.outline();
        assert_eq!(outline.items.len(), 2);
        assert_eq!(outline.items[0].kind, ItemKind::Condition);
        assert_eq!(outline.items[0].branches.len(), 3);
        assert_eq!(outline.items[1].kind, ItemKind::Loop);
    }
}
