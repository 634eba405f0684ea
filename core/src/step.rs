use crate::value::Values;
use async_trait::async_trait;
use std::any::type_name;

/// A reusable, struct-based flow step.
///
/// Implement this when a step carries its own configuration or resources,
/// then wrap it with [`from_step`](crate::function::from_step).
///
/// ```rust,ignore
/// struct Double;
///
/// #[async_trait]
/// impl Step for Double {
///     async fn run(&self, args: Values) -> anyhow::Result<Values> {
///         Ok(Values::single(args.i64(0)? * 2))
///     }
/// }
///
/// flowctl::chain(21).then(from_step(Double));
/// ```
#[async_trait]
pub trait Step: Send + Sync + 'static {
    async fn run(&self, args: Values) -> anyhow::Result<Values>;

    /// Label used in logs and outlines. Defaults to the type name.
    fn label(&self) -> String {
        let full = type_name::<Self>();
        full.split("::").last().unwrap_or(full).to_string()
    }
}
