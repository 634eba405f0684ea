use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered results of one flow run, one slot per item that produced a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    values: Vec<Value>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn first(&self) -> Option<&Value> {
        self.values.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.values
    }
}

impl PartialEq<Vec<Value>> for ResultSet {
    fn eq(&self, other: &Vec<Value>) -> bool {
        &self.values == other
    }
}

impl IntoIterator for ResultSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
