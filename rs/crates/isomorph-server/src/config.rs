use anyhow::Context;
use clap::Parser;
use isomorph_embed::EmbedMode;
use serde_json::{json, Value};
use std::path::PathBuf;

/// Serve a server-rendered component that the browser hydrates from the
/// same props.
#[derive(Debug, Clone, Parser)]
#[command(name = "isomorph-server", version, about)]
pub struct Config {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// How the page hands props to the client: `js-literal` or `json-parse`
    #[arg(long, env = "EMBED_MODE", default_value_t = EmbedMode::JsLiteral)]
    pub embed_mode: EmbedMode,

    /// JSON file with the initial render props
    #[arg(long = "props", env = "PROPS_FILE")]
    pub props_file: Option<PathBuf>,

    /// Load client modules from this directory instead of the built-in copies
    #[arg(long = "assets", env = "ASSETS_DIR")]
    pub assets_dir: Option<PathBuf>,
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn load_props(&self) -> anyhow::Result<Value> {
        let Some(path) = &self.props_file else {
            return Ok(default_props());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read props file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("props file {} is not valid JSON", path.display()))
    }
}

/// Sample data with values that would break out of an inline script if they
/// were embedded unescaped.
pub fn default_props() -> Value {
    json!({ "items": [0, 1, "</script>", "<!--inject!-->"] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["isomorph-server"]).unwrap();
        assert_eq!(config.embed_mode, EmbedMode::JsLiteral);
        assert!(config.props_file.is_none());
        assert_eq!(config.load_props().unwrap(), default_props());
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "isomorph-server",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--embed-mode",
            "json-parse",
        ])
        .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.embed_mode, EmbedMode::JsonParse);
    }

    #[test]
    fn test_bad_embed_mode() {
        assert!(Config::try_parse_from(["isomorph-server", "--embed-mode", "xml"]).is_err());
    }

    #[test]
    fn test_props_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("props.json");
        std::fs::write(&path, r#"{"items": ["a", "b"]}"#).unwrap();

        let config = Config::try_parse_from(["isomorph-server", "--props", path.to_str().unwrap()]).unwrap();
        assert_eq!(config.load_props().unwrap(), json!({ "items": ["a", "b"] }));

        std::fs::write(&path, "{not json").unwrap();
        assert!(config.load_props().is_err());
    }
}
