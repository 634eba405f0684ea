//! Continuation - Single-Use Completion Handle
//!
//! A callback-style step receives a [`Continuation`] as its last argument and
//! reports its outcome through it. The handle is consumed on completion, so
//! it can fire at most once. Dropping it without firing is reported to the
//! waiting side as [`FlowError::Abandoned`].

use crate::error::FlowError;
use crate::value::{IntoValues, Values};
use tokio::sync::oneshot;

/// Outcome reported by a step: its output values or the error it failed with.
pub type Settlement = Result<Values, FlowError>;

/// Completion handle handed to callback-style steps.
#[must_use = "a continuation must be completed, otherwise the step is abandoned"]
#[derive(Debug)]
pub struct Continuation {
    tx: oneshot::Sender<Settlement>,
}

/// Waiting side of a [`Continuation`].
#[derive(Debug)]
pub struct Pending {
    rx: oneshot::Receiver<Settlement>,
}

impl Continuation {
    /// Create a connected handle pair.
    pub fn channel() -> (Continuation, Pending) {
        let (tx, rx) = oneshot::channel();
        (Continuation { tx }, Pending { rx })
    }

    /// Complete successfully with the given output.
    pub fn resolve(self, output: impl IntoValues) {
        self.settle(Ok(output.into_values()));
    }

    /// Complete with an error.
    pub fn reject(self, error: impl Into<anyhow::Error>) {
        self.settle(Err(FlowError::from(error.into())));
    }

    /// Complete from a `Result`, the Rust form of `(error, result)`.
    pub fn complete<T: IntoValues>(self, result: anyhow::Result<T>) {
        match result {
            Ok(output) => self.resolve(output),
            Err(error) => self.reject(error),
        }
    }

    /// Whether the waiting side still listens.
    pub fn is_waiting(&self) -> bool {
        !self.tx.is_closed()
    }

    pub(crate) fn settle(self, settlement: Settlement) {
        if self.tx.send(settlement).is_err() {
            tracing::trace!("Continuation completed after its waiter went away");
        }
    }
}

impl Pending {
    /// Wait for the step to complete.
    pub async fn settled(self) -> Settlement {
        self.rx.await.unwrap_or(Err(FlowError::Abandoned))
    }
}
