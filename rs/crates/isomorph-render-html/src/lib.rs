//! isomorph-render-html: Render DomNode trees to HTML strings
//!
//! Produces SSR markup with data-a_ event attributes, plus the full page that
//! hands the embedded props to the client runtime for hydration.

use isomorph_dom::DomNode;
use isomorph_embed::{embed_json, EmbedMode, EmbeddedPayload};

/// Void elements that must not have closing tags
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Render a DomNode tree to an HTML string.
pub fn render_to_html(node: &DomNode) -> String {
    let mut buf = String::with_capacity(256);
    write_node(node, &mut buf);
    buf
}

/// Options for rendering a full HTML page.
pub struct PageOptions {
    pub root: DomNode,
    /// `#id` of the container the component is rendered into.
    pub mount_selector: Option<String>,
    pub title: Option<String>,
    /// External scripts, loaded in order before the bootstrap.
    pub scripts: Vec<String>,
    pub hydrate: Option<Hydration>,
}

/// What the bootstrap script needs to re-render the component client side.
pub struct Hydration {
    /// Module id the bundle exposes through `require`, e.g. `./app.js`.
    pub component: String,
    pub props: EmbeddedPayload,
    pub mode: EmbedMode,
}

/// Render a full HTML page with SSR content, scripts and the hydration
/// bootstrap.
pub fn render_page(opts: &PageOptions) -> String {
    let body_html = render_to_html(&opts.root);

    let mut html = String::with_capacity(body_html.len() + 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\" />\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    if let Some(title) = &opts.title {
        html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    }
    html.push_str("</head>\n<body>\n");

    // Mount point with SSR content. No whitespace inside: the client compares
    // innerHTML against its own render.
    let mount = opts.mount_selector.as_deref().unwrap_or("#content");
    let id = mount.trim_start_matches('#');
    html.push_str(&format!("<div id=\"{}\">{}</div>\n", escape_attr(id), body_html));

    for src in &opts.scripts {
        html.push_str(&format!("<script src=\"{}\"></script>\n", escape_attr(src)));
    }

    if let Some(hydrate) = &opts.hydrate {
        write_bootstrap(&mut html, hydrate, id);
    }

    html.push_str("</body>\n</html>");
    html
}

fn write_bootstrap(html: &mut String, hydrate: &Hydration, mount_id: &str) {
    let props_expr = match hydrate.mode {
        EmbedMode::JsLiteral => hydrate.props.to_string(),
        EmbedMode::JsonParse => {
            let props_id = format!("{}-props", mount_id);
            html.push_str(&format!(
                "<script id=\"{}\" type=\"application/json\">{}</script>\n",
                escape_attr(&props_id),
                hydrate.props
            ));
            format!("Isomorph.readProps({})", js_string(&props_id))
        }
    };

    html.push_str("<script>\n");
    html.push_str(&format!(
        "var App = Isomorph.createFactory(require({}));\n",
        js_string(&hydrate.component)
    ));
    html.push_str(&format!(
        "Isomorph.render(App({}), document.getElementById({}));\n",
        props_expr,
        js_string(mount_id)
    ));
    html.push_str("</script>\n");
}

/// Quote `s` as a JS string literal that is safe inside an inline script.
fn js_string(s: &str) -> EmbeddedPayload {
    let quoted = serde_json::Value::String(s.to_string()).to_string();
    embed_json(&quoted, EmbedMode::JsLiteral)
}

fn write_node(node: &DomNode, buf: &mut String) {
    let is_void = VOID_ELEMENTS.contains(&node.tag.as_str());

    buf.push('<');
    buf.push_str(&node.tag);

    // data-key attribute
    if let Some(key) = &node.key {
        buf.push_str(" data-key=\"");
        buf.push_str(&escape_attr(key));
        buf.push('"');
    }

    // HTML attributes
    if let Some(attrs) = &node.attrs {
        // Sort for deterministic output
        let mut keys: Vec<&String> = attrs.keys().collect();
        keys.sort();
        for k in keys {
            buf.push(' ');
            buf.push_str(k);
            buf.push_str("=\"");
            buf.push_str(&escape_attr(&attrs[k]));
            buf.push('"');
        }
    }

    // Event attributes → data-a_ prefix
    if let Some(events) = &node.events {
        let mut keys: Vec<&String> = events.keys().collect();
        keys.sort();
        for k in keys {
            buf.push_str(" data-a_");
            buf.push_str(k);
            buf.push_str("=\"");
            buf.push_str(&escape_attr(&events[k]));
            buf.push('"');
        }
    }

    buf.push('>');

    if let Some(text) = &node.text {
        buf.push_str(&escape_html(text));
    }

    for child in node.children_iter() {
        write_node(child, buf);
    }

    if !is_void {
        buf.push_str("</");
        buf.push_str(&node.tag);
        buf.push('>');
    }
}

// Same set the browser uses when it serializes innerHTML, so the client can
// compare its render with the server markup byte for byte.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
