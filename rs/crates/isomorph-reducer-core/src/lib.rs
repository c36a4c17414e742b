//! isomorph-reducer-core: the item list component, server side.
//!
//! State is plain data, updates go through a pure reducer, and the view is a
//! `DomNode` tree. The browser module `app.js` implements the same three
//! pieces, so a page rendered here hydrates without DOM changes.

mod dom;
mod state;

pub use dom::{item_label, items_text};
pub use state::ItemsState;

use isomorph_dom::DomNode;

/// Supported actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The heading was clicked: append the current item count.
    Click,
    Unknown,
}

impl Action {
    /// Map an action name from a node's `events` table.
    pub fn from_name(name: &str) -> Self {
        match name {
            "click" => Action::Click,
            _ => Action::Unknown,
        }
    }
}

/// Pure reducer: mutate state based on action.
pub fn reduce(state: &mut ItemsState, action: Action) {
    match action {
        Action::Click => state.push_count(),
        Action::Unknown => {}
    }
}

/// Render the current state to its view tree.
pub fn render(state: &ItemsState) -> DomNode {
    dom::render_view(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_click_grows_list() {
        let mut state = ItemsState::from_props(&json!({ "items": [0, 1] }));
        let view = render(&state);
        let action = Action::from_name(view.event("click").unwrap());
        assert_eq!(action, Action::Click);

        reduce(&mut state, action);
        reduce(&mut state, action);
        assert_eq!(state.items(), &[json!(0), json!(1), json!(2), json!(3)]);
        assert_eq!(render(&state).text.as_deref(), Some("Items: 0, 1, 2, 3"));
    }

    #[test]
    fn test_unknown_action_is_noop() {
        let mut state = ItemsState::from_props(&json!({ "items": ["a"] }));
        reduce(&mut state, Action::from_name("explode"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_click_counts_adversarial_items() {
        let mut state =
            ItemsState::from_props(&json!({ "items": [0, 1, "</script>", "<!--inject!-->"] }));
        reduce(&mut state, Action::Click);
        assert_eq!(
            render(&state).text.as_deref(),
            Some("Items: 0, 1, </script>, <!--inject!-->, 4")
        );
    }
}
