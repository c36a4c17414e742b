use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Local state of the item list: whatever the props supplied, plus one
/// number per click.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemsState {
    items: Vec<Value>,
}

impl ItemsState {
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }

    /// Initial state from render props. A missing or non-array `items`
    /// starts the list empty.
    pub fn from_props(props: &Value) -> Self {
        match props.get("items") {
            Some(Value::Array(items)) => Self::new(items.clone()),
            _ => Self::default(),
        }
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push_count(&mut self) {
        let n = self.items.len();
        self.items.push(Value::from(n));
    }
}
