//! isomorph-embed: Serialize render props for inline `<script>` embedding
//!
//! An HTML parser ends a `<script>` element at the first `</script`, no
//! matter whether it sits inside a JS string literal. Props handed from the
//! server to the client therefore have to be escaped lexically, on the
//! serialized text, before they are written into the page:
//!
//! 1. `</script` (any ASCII case) becomes `<\/script`
//! 2. `<!--` becomes `<\!--`
//! 3. in [`EmbedMode::JsLiteral`], U+2028 / U+2029 become `\u2028` / `\u2029`
//!
//! None of the replacements contain `<`, so a later rule can never rebuild a
//! sequence an earlier rule removed.

use regex::{Captures, Regex};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

// ASCII-only case folding: the HTML tokenizer never matches `ſ` or `İ`.
static SCRIPT_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i-u)<(/script)").expect("valid script-close pattern"));

#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// The props value could not be serialized to JSON.
    #[error("props are not JSON-serializable: {0}")]
    Serialization(#[source] serde_json::Error),
    /// The payload did not decode back into the requested type.
    #[error("embedded payload is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

/// How the browser will turn the payload back into a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmbedMode {
    /// Read as text (e.g. from a `type="application/json"` script) and passed
    /// to `JSON.parse` after the inserted escapes are reversed.
    JsonParse,
    /// Evaluated directly as a JS expression inside an inline script.
    #[default]
    JsLiteral,
}

impl EmbedMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedMode::JsonParse => "json-parse",
            EmbedMode::JsLiteral => "js-literal",
        }
    }
}

impl fmt::Display for EmbedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown embed mode `{0}` (expected `json-parse` or `js-literal`)")]
pub struct ParseModeError(String);

impl FromStr for EmbedMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json-parse" | "json" => Ok(EmbedMode::JsonParse),
            "js-literal" | "js" => Ok(EmbedMode::JsLiteral),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Escaped JSON text, safe to write verbatim between `<script>` and
/// `</script>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPayload(String);

impl EmbeddedPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for EmbeddedPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmbeddedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize `value` and escape the result for an inline script.
///
/// A failed serialization is returned as [`EmbedError::Serialization`];
/// nothing is escaped in that case.
pub fn embed<T: Serialize + ?Sized>(value: &T, mode: EmbedMode) -> Result<EmbeddedPayload, EmbedError> {
    let json = serde_json::to_string(value).map_err(EmbedError::Serialization)?;
    Ok(embed_json(&json, mode))
}

/// Escape text that is already serialized JSON.
pub fn embed_json(json: &str, mode: EmbedMode) -> EmbeddedPayload {
    let escaped = SCRIPT_CLOSE.replace_all(json, |caps: &Captures| format!("<\\{}", &caps[1]));
    let mut escaped = escaped.replace("<!--", "<\\!--");
    if mode == EmbedMode::JsLiteral {
        escaped = escaped
            .replace('\u{2028}', "\\u2028")
            .replace('\u{2029}', "\\u2029");
    }
    EmbeddedPayload(escaped)
}

/// Reverse the escapes inserted by [`embed_json`], and nothing else.
///
/// For output of [`embed`] this returns exactly the `serde_json` text the
/// payload was built from. JSON's own escapes (`\\`, `\"`, `\n`, ...) are
/// copied through untouched.
pub fn unescape(payload: &str) -> String {
    let mut out = String::with_capacity(payload.len());
    let mut rest = payload;

    while let Some(pos) = rest.find(['<', '\\']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix('<') {
            out.push('<');
            rest = match after.strip_prefix('\\') {
                Some(escaped) if starts_with_script_close(escaped) || escaped.starts_with("!--") => {
                    escaped
                }
                _ => after,
            };
        } else if let Some(sep) = separator_escape(tail) {
            out.push(sep);
            rest = &tail[6..];
        } else {
            // A JSON escape pair: keep both characters so `\\u2028` stays put.
            let width = tail[1..].chars().next().map_or(0, char::len_utf8);
            out.push_str(&tail[..1 + width]);
            rest = &tail[1 + width..];
        }
    }

    out.push_str(rest);
    out
}

/// Unescape and deserialize a payload.
pub fn decode<T: DeserializeOwned>(payload: &str) -> Result<T, EmbedError> {
    serde_json::from_str(&unescape(payload)).map_err(EmbedError::Decode)
}

fn starts_with_script_close(s: &str) -> bool {
    s.as_bytes()
        .get(..7)
        .is_some_and(|head| head.eq_ignore_ascii_case(b"/script"))
}

fn separator_escape(s: &str) -> Option<char> {
    if s.starts_with("\\u2028") {
        Some('\u{2028}')
    } else if s.starts_with("\\u2029") {
        Some('\u{2029}')
    } else {
        None
    }
}
