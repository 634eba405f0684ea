//! # AsyncFunction: the Continuation Normalizer
//!
//! A flow step may be written in one of three shapes:
//!
//! * **Sync**: `Fn(Values) -> anyhow::Result<T>`, see [`asyncify`]
//! * **Callback**: `Fn(Values, Continuation)`, see [`callback`]
//! * **Future**: `Fn(Values) -> impl Future<Output = anyhow::Result<T>>`, see [`future`]
//!
//! The shape is fixed once, when the step is wrapped. Every call site then
//! goes through the canonical [`AsyncFunction::call`] (arguments plus a
//! trailing continuation, optionally returning a thenable) or through
//! [`AsyncFunction::invoke`], which also applies the thenable bridge.

use crate::config::FlowConfig;
use crate::continuation::{Continuation, Settlement};
use crate::error::FlowError;
use crate::step::Step;
use crate::value::{IntoValues, Values};
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// A deferred settlement returned by future-shaped steps.
pub type Thenable = futures_util::future::BoxFuture<'static, Settlement>;

type SyncFn = dyn Fn(Values) -> anyhow::Result<Values> + Send + Sync;
type CallbackFn = dyn Fn(Values, Continuation) + Send + Sync;
type FutureFn = dyn Fn(Values) -> Thenable + Send + Sync;

#[derive(Clone)]
enum Invoker {
    Sync(Arc<SyncFn>),
    Callback(Arc<CallbackFn>),
    Future(Arc<FutureFn>),
}

/// The calling convention a step was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepShape {
    Sync,
    Callback,
    Future,
}

impl StepShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepShape::Sync => "sync",
            StepShape::Callback => "callback",
            StepShape::Future => "future",
        }
    }
}

impl fmt::Display for StepShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flow step with its calling convention erased.
#[derive(Clone)]
pub struct AsyncFunction {
    invoker: Invoker,
    label: Option<Arc<str>>,
}

impl AsyncFunction {
    /// Predicate that always holds. Used by `else` and chain items.
    pub fn always_true() -> Self {
        asyncify(|_| Ok(true)).with_label("always")
    }

    /// Step that ignores its input and yields a copy of `values`.
    pub fn constant(values: Values) -> Self {
        asyncify(move |_| Ok(values.clone())).with_label("initial values")
    }

    /// Attach a human-readable label used in logs and outlines.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(Arc::from(label.into()));
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn shape(&self) -> StepShape {
        match self.invoker {
            Invoker::Sync(_) => StepShape::Sync,
            Invoker::Callback(_) => StepShape::Callback,
            Invoker::Future(_) => StepShape::Future,
        }
    }

    /// Canonical call: run the step with `args` and a trailing continuation.
    ///
    /// Returns a thenable when the step's outcome is deferred to a future, in
    /// which case that thenable is authoritative and `done` is dropped unused.
    /// A panic raised while making the call is caught when
    /// `config.catch_panics` is set and surfaces as an already-settled
    /// thenable.
    pub fn call(&self, args: Values, done: Continuation, config: &FlowConfig) -> Option<Thenable> {
        match &self.invoker {
            Invoker::Sync(f) => {
                let settlement = guard(config, || f(args).map_err(FlowError::from));
                done.settle(settlement);
                None
            }
            Invoker::Callback(f) => {
                if !config.catch_panics {
                    f(args, done);
                    return None;
                }
                match panic::catch_unwind(AssertUnwindSafe(|| f(args, done))) {
                    Ok(()) => None,
                    Err(payload) => Some(settled(Err(FlowError::Panicked(panic_message(payload))))),
                }
            }
            Invoker::Future(f) => {
                drop(done);
                match guard(config, || Ok(f(args))) {
                    Ok(thenable) => Some(thenable),
                    Err(error) => Some(settled(Err(error))),
                }
            }
        }
    }

    /// Run the step to completion, whatever its shape.
    ///
    /// This is the thenable bridge: after the raw call, a returned thenable
    /// decides the outcome; otherwise the continuation does.
    pub async fn invoke(&self, args: Values, config: &FlowConfig) -> Settlement {
        let (done, pending) = Continuation::channel();
        match self.call(args, done, config) {
            Some(thenable) if config.catch_panics => AssertUnwindSafe(thenable)
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(FlowError::Panicked(panic_message(payload)))),
            Some(thenable) => thenable.await,
            None => pending.settled().await,
        }
    }
}

impl fmt::Debug for AsyncFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncFunction")
            .field("shape", &self.shape())
            .field("label", &self.label)
            .finish()
    }
}

/// Wrap a synchronous function. Its `Err` becomes the step's error.
pub fn asyncify<F, T>(f: F) -> AsyncFunction
where
    F: Fn(Values) -> anyhow::Result<T> + Send + Sync + 'static,
    T: IntoValues,
{
    AsyncFunction {
        invoker: Invoker::Sync(Arc::new(move |args: Values| {
            f(args).map(IntoValues::into_values)
        })),
        label: None,
    }
}

/// Wrap a function that reports through a trailing [`Continuation`].
pub fn callback<F>(f: F) -> AsyncFunction
where
    F: Fn(Values, Continuation) + Send + Sync + 'static,
{
    AsyncFunction {
        invoker: Invoker::Callback(Arc::new(f)),
        label: None,
    }
}

/// Wrap a function returning a future.
pub fn future<F, Fut, T>(f: F) -> AsyncFunction
where
    F: Fn(Values) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    T: IntoValues,
{
    AsyncFunction {
        invoker: Invoker::Future(Arc::new(move |args: Values| -> Thenable {
            let pending = f(args);
            Box::pin(async move {
                pending
                    .await
                    .map(IntoValues::into_values)
                    .map_err(FlowError::from)
            })
        })),
        label: None,
    }
}

/// Alias of [`future`].
pub fn promise<F, Fut, T>(f: F) -> AsyncFunction
where
    F: Fn(Values) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    T: IntoValues,
{
    future(f)
}

/// Wrap a [`Step`] implementation, labelled with its type name.
pub fn from_step<S: Step>(step: S) -> AsyncFunction {
    let label = step.label();
    let step = Arc::new(step);
    AsyncFunction {
        invoker: Invoker::Future(Arc::new(move |args: Values| -> Thenable {
            let step = step.clone();
            Box::pin(async move { step.run(args).await.map_err(FlowError::from) })
        })),
        label: Some(Arc::from(label)),
    }
}

fn settled(settlement: Settlement) -> Thenable {
    Box::pin(std::future::ready(settlement))
}

fn guard<T>(config: &FlowConfig, f: impl FnOnce() -> Result<T, FlowError>) -> Result<T, FlowError> {
    if !config.catch_panics {
        return f();
    }
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(FlowError::Panicked(panic_message(payload))),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unexpected panic without message".to_string()
    }
}
