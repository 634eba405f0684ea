use std::sync::Arc;
use thiserror::Error;

pub type FlowResult<T> = Result<T, FlowError>;

/// Terminal error of a flow run.
///
/// Cloneable so every registered resolver receives the same error. A step's
/// own error is kept as-is inside [`FlowError::Failed`]; its `Display` is
/// the original message and [`FlowError::downcast_ref`] recovers the
/// original type.
#[derive(Debug, Clone, Error)]
pub enum FlowError {
    #[error("{0}")]
    Failed(Arc<anyhow::Error>),

    #[error("step panicked: {0}")]
    Panicked(String),

    #[error("step dropped its continuation without completing")]
    Abandoned,

    #[error("invalid flow: {0}")]
    Build(#[from] BuildError),
}

impl FlowError {
    /// Downcast the step's original error.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        match self {
            FlowError::Failed(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// The shared source error, if this came from a step returning `Err`.
    pub fn source_error(&self) -> Option<&Arc<anyhow::Error>> {
        match self {
            FlowError::Failed(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn is_build(&self) -> bool {
        matches!(self, FlowError::Build(_))
    }
}

impl From<anyhow::Error> for FlowError {
    fn from(error: anyhow::Error) -> Self {
        FlowError::Failed(Arc::new(error))
    }
}

/// Mistakes made while declaring a flow.
///
/// Recorded by the builder and reported when the flow is executed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("`{0}` declared before any chain, if or while clause")]
    NoOpenItem(&'static str),

    #[error("`{clause}` can only follow an if clause, found a {kind} clause")]
    NotACondition {
        clause: &'static str,
        kind: &'static str,
    },

    #[error("`{0}` declared after else")]
    AfterElse(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse flow configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
