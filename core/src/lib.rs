//! flowctl core: the value and error model, and the continuation normalizer
//! that lets sync, callback and future steps be called the same way.

pub mod config;
pub mod continuation;
pub mod error;
pub mod function;
pub mod result_set;
pub mod step;
pub mod value;

pub use config::FlowConfig;
pub use continuation::{Continuation, Pending, Settlement};
pub use error::{BuildError, ConfigError, FlowError, FlowResult};
pub use function::{
    AsyncFunction, StepShape, Thenable, asyncify, callback, from_step, future, promise,
};
pub use result_set::ResultSet;
pub use step::Step;
pub use value::{IntoValues, Values, is_truthy};

pub mod prelude {
    pub use crate::{
        AsyncFunction, Continuation, FlowConfig, FlowError, IntoValues, ResultSet, Step, Values,
        asyncify, callback, from_step, future,
    };
}
