//! Values - Dynamic Data Between Steps
//!
//! Every step receives an ordered argument list and produces an ordered
//! output list. Both are [`Values`]. A step that produces nothing yields an
//! empty list; the *result* of a step is its first output value.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::{Deref, DerefMut};

/// Ordered list of dynamic values passed into or out of a step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Values(Vec<Value>);

impl Values {
    /// An empty list ("no value").
    pub fn new() -> Self {
        Values(Vec::new())
    }

    /// A list holding exactly one value.
    pub fn single(value: impl Into<Value>) -> Self {
        Values(vec![value.into()])
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }

    /// Consume the list, keeping only the result slot.
    pub fn into_first(self) -> Option<Value> {
        self.0.into_iter().next()
    }

    /// Verdict of a predicate: the truthiness of the first value.
    ///
    /// An empty list is false.
    pub fn is_truthy(&self) -> bool {
        self.0.first().is_some_and(is_truthy)
    }

    /// Argument at `index`, or an error naming the missing position.
    pub fn arg(&self, index: usize) -> anyhow::Result<&Value> {
        self.0
            .get(index)
            .ok_or_else(|| anyhow!("missing argument at position {index}"))
    }

    pub fn i64(&self, index: usize) -> anyhow::Result<i64> {
        let value = self.arg(index)?;
        value
            .as_i64()
            .ok_or_else(|| anyhow!("argument {index} is not an integer: {value}"))
    }

    pub fn f64(&self, index: usize) -> anyhow::Result<f64> {
        let value = self.arg(index)?;
        value
            .as_f64()
            .ok_or_else(|| anyhow!("argument {index} is not a number: {value}"))
    }

    pub fn bool(&self, index: usize) -> anyhow::Result<bool> {
        let value = self.arg(index)?;
        value
            .as_bool()
            .ok_or_else(|| anyhow!("argument {index} is not a boolean: {value}"))
    }

    pub fn str(&self, index: usize) -> anyhow::Result<&str> {
        let value = self.arg(index)?;
        value
            .as_str()
            .ok_or_else(|| anyhow!("argument {index} is not a string: {value}"))
    }
}

impl Deref for Values {
    type Target = Vec<Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Values {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Value>> for Values {
    fn from(values: Vec<Value>) -> Self {
        Values(values)
    }
}

impl FromIterator<Value> for Values {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Values(iter.into_iter().collect())
    }
}

impl IntoIterator for Values {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Loose truthiness over JSON values.
///
/// `null`, `false`, `0`, and `""` are false. Arrays and objects are always
/// true, even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Conversion of a step's return value into its output list.
///
/// `()` and `None` produce no value. Scalars and [`Value`] produce one.
/// Return [`Values`] directly to produce several.
pub trait IntoValues {
    fn into_values(self) -> Values;
}

impl IntoValues for () {
    fn into_values(self) -> Values {
        Values::new()
    }
}

impl IntoValues for Values {
    fn into_values(self) -> Values {
        self
    }
}

impl<T: Into<Value>> IntoValues for Option<T> {
    fn into_values(self) -> Values {
        match self {
            Some(value) => Values::single(value),
            None => Values::new(),
        }
    }
}

macro_rules! single_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntoValues for $t {
                fn into_values(self) -> Values {
                    Values::single(self)
                }
            }
        )*
    };
}

single_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    String,
    &str,
    Value,
    Map<String, Value>,
);
