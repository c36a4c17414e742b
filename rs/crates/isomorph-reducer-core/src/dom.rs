use crate::state::ItemsState;
use isomorph_dom::DomNode;
use serde_json::Value;

/// Build the view: a heading listing every item, clickable.
pub fn render_view(state: &ItemsState) -> DomNode {
    DomNode::text("h1", &items_text(state.items())).with_event("click", "click")
}

/// `"Items: "` followed by the items joined with `", "`.
pub fn items_text(items: &[Value]) -> String {
    let labels: Vec<String> = items.iter().map(item_label).collect();
    format!("Items: {}", labels.join(", "))
}

/// Stringify one item the way the browser's `Array.prototype.join` does,
/// so the client render produces the same text.
pub fn item_label(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_label(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(item_label).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// JS `Number#toString`: shortest round-trip digits, exponent form below
/// 1e-6 and from 1e21 up. Integers go through `f64` too, since the browser
/// parses them as doubles.
fn number_label(n: &serde_json::Number) -> String {
    match n.as_f64() {
        // -0 prints as "0"
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) => ryu_js::Buffer::new().format(f).to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_labels() {
        assert_eq!(item_label(&json!(null)), "");
        assert_eq!(item_label(&json!(true)), "true");
        assert_eq!(item_label(&json!(7)), "7");
        assert_eq!(item_label(&json!(2.0)), "2");
        assert_eq!(item_label(&json!(-0.0)), "0");
        assert_eq!(item_label(&json!(1.5)), "1.5");
        assert_eq!(item_label(&json!([1, null, [2, 3]])), "1,,2,3");
        assert_eq!(item_label(&json!([1.5, -2])), "1.5,-2");
        assert_eq!(item_label(&json!({ "a": 1 })), "[object Object]");
    }

    #[test]
    fn test_number_labels_match_browser() {
        assert_eq!(item_label(&json!(123.456)), "123.456");
        assert_eq!(item_label(&json!(0.000001)), "0.000001");
        assert_eq!(item_label(&json!(1e-7)), "1e-7");
        assert_eq!(item_label(&json!(-2.5e-8)), "-2.5e-8");
        assert_eq!(item_label(&json!(1e20)), "100000000000000000000");
        assert_eq!(item_label(&json!(1e21)), "1e+21");
        assert_eq!(item_label(&json!(1.5e300)), "1.5e+300");
        assert_eq!(item_label(&json!(0.1 + 0.2)), "0.30000000000000004");
        // past 2^53 the browser only sees the nearest double
        assert_eq!(item_label(&json!(9007199254740993u64)), "9007199254740992");
        assert_eq!(item_label(&json!(u64::MAX)), "18446744073709552000");
    }

    #[test]
    fn test_view_shape() {
        let view = render_view(&ItemsState::new(vec![json!(0), json!("a")]));
        assert_eq!(view.tag, "h1");
        assert_eq!(view.text.as_deref(), Some("Items: 0, a"));
        assert_eq!(view.event("click"), Some("click"));
        assert!(view.children_iter().is_empty());
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(items_text(&[]), "Items: ");
    }
}
