pub mod actions;
pub mod conditional;
pub mod control;
pub mod driver;
pub mod looping;

pub mod prelude {
    pub use crate::control::{Completion, FlowControl};
}

pub use control::{Completion, FlowControl};
pub use driver::run_sequence;
