//! Outline - Structural View of a Flow
//!
//! A serializable description of what a flow declares, without running it.

use crate::sequence::ItemKind;
use flowctl_core::{AsyncFunction, StepShape};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub items: Vec<ItemOutline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOutline {
    pub index: usize,
    pub kind: ItemKind,
    pub branches: Vec<BranchOutline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchOutline {
    pub predicate: StepOutline,
    /// Empty when the branch runs the default action.
    pub actions: Vec<StepOutline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutline {
    pub shape: StepShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl StepOutline {
    pub fn of(step: &AsyncFunction) -> Self {
        StepOutline {
            shape: step.shape(),
            label: step.label().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::sequence::{FlowSequence, ItemKind};
    use flowctl_core::{Values, asyncify, callback, future};
    use serde_json::json;

    #[test]
    fn test_outline_describes_items_in_order() {
        let mut seq = FlowSequence::new();
        seq.open_chain(Values::single(1));
        seq.open_condition(callback(|_, done| done.resolve(true)).with_label("ready?"));
        seq.compose_action(future(|_| async { anyhow::Ok(()) }))
            .unwrap();
        seq.open_loop(asyncify(|_| Ok(false)));

        let outline = seq.outline();
        let kinds: Vec<_> = outline.items.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![ItemKind::Chain, ItemKind::Condition, ItemKind::Loop]);

        let json = serde_json::to_value(&outline.items[1]).unwrap();
        assert_eq!(
            json,
            json!({
                "index": 1,
                "kind": "condition",
                "branches": [{
                    "predicate": { "shape": "callback", "label": "ready?" },
                    "actions": [{ "shape": "future" }]
                }]
            })
        );
    }
}
