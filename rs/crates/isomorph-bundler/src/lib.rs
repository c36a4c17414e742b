//! isomorph-bundler: Package CommonJS modules into one browser script
//!
//! Starting from the exposed entry modules, every `require("./...")` is
//! followed recursively and the modules are wrapped in a small registry. Names
//! registered with [`Bundler::global`] are not bundled; their `require` call is
//! replaced by the given expression (e.g. a library the page already loaded
//! as a window global).
//!
//! ```ignore
//! let bundle = Bundler::new(&modules)
//!     .global("isomorph", "window.Isomorph")
//!     .require("./app.js")
//!     .bundle()?;
//! // in the page: require("./app.js")
//! ```

mod resolve;
mod source;

pub use resolve::{entry_id, resolve};
pub use source::{DirModules, EmbeddedModules, ModuleSource};

use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::LazyLock;

static REQUIRE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)(^|[^.\w$])require\(\s*["']([^"']+)["']\s*\)"#).expect("valid require pattern")
});

/// Marker used as `from` when an exposed entry itself is missing.
const ENTRY: &str = "<entry>";

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("cannot find module `{module}` required from `{from}`")]
    ModuleNotFound { module: String, from: String },
    #[error("failed to read module {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct Bundler<'a> {
    source: &'a dyn ModuleSource,
    globals: BTreeMap<String, String>,
    exposed: Vec<String>,
}

impl<'a> Bundler<'a> {
    pub fn new(source: &'a dyn ModuleSource) -> Self {
        Self {
            source,
            globals: BTreeMap::new(),
            exposed: Vec::new(),
        }
    }

    /// Replace `require(name)` with `(expr)` instead of bundling `name`.
    pub fn global(mut self, name: &str, expr: &str) -> Self {
        self.globals.insert(name.to_string(), expr.to_string());
        self
    }

    /// Bundle `entry` and make it reachable through the page-level `require`.
    pub fn require(mut self, entry: &str) -> Self {
        self.exposed.push(entry.to_string());
        self
    }

    /// Resolve the module graph and emit the script.
    pub fn bundle(&self) -> Result<String, BundleError> {
        let mut exposed = Vec::with_capacity(self.exposed.len());
        let mut pending: Vec<(String, String)> = Vec::new();
        for entry in &self.exposed {
            let id = entry_id(entry).ok_or_else(|| BundleError::ModuleNotFound {
                module: entry.clone(),
                from: ENTRY.to_string(),
            })?;
            exposed.push(id.clone());
            pending.push((id, ENTRY.to_string()));
        }

        let mut modules: BTreeMap<String, String> = BTreeMap::new();
        while let Some((id, from)) = pending.pop() {
            if modules.contains_key(&id) {
                continue;
            }
            let text = self
                .source
                .load(&id)?
                .ok_or_else(|| BundleError::ModuleNotFound {
                    module: id.clone(),
                    from: from.clone(),
                })?;
            let (body, deps) = self.link(&id, &text)?;
            pending.extend(deps.into_iter().map(|dep| (dep, id.clone())));
            modules.insert(id, body);
        }

        Ok(emit(&modules, &exposed))
    }

    /// Rewrite the `require` calls of one module. Returns the new text and
    /// the canonical ids it depends on.
    fn link(&self, id: &str, text: &str) -> Result<(String, Vec<String>), BundleError> {
        let mut replacements: HashMap<String, String> = HashMap::new();
        let mut deps = Vec::new();

        for caps in REQUIRE_CALL.captures_iter(text) {
            let spec = &caps[2];
            if replacements.contains_key(spec) {
                continue;
            }
            let replacement = if let Some(expr) = self.globals.get(spec) {
                format!("({})", expr)
            } else {
                let dep = resolve(id, spec).ok_or_else(|| BundleError::ModuleNotFound {
                    module: spec.to_string(),
                    from: id.to_string(),
                })?;
                let call = format!("require({})", js_string(&dep));
                deps.push(dep);
                call
            };
            replacements.insert(spec.to_string(), replacement);
        }

        let body = REQUIRE_CALL.replace_all(text, |caps: &Captures| {
            format!("{}{}", &caps[1], replacements[&caps[2]])
        });
        Ok((body.into_owned(), deps))
    }
}

fn emit(modules: &BTreeMap<String, String>, exposed: &[String]) -> String {
    let size: usize = modules.values().map(String::len).sum();
    let mut out = String::with_capacity(size + 1024);
    out.push_str(PRELUDE);
    out.push_str("({\n");
    for (id, body) in modules {
        out.push_str(&js_string(id));
        out.push_str(": function (require, module, exports) {\n");
        out.push_str(body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("},\n");
    }
    out.push_str("}, [");
    let ids: Vec<String> = exposed.iter().map(|id| js_string(id)).collect();
    out.push_str(&ids.join(", "));
    out.push_str("]);\n");
    out
}

fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

const PRELUDE: &str = r#"(function (root) {
  return function (modules, exposed) {
    var cache = {};
    function load(id) {
      if (!Object.prototype.hasOwnProperty.call(modules, id)) {
        throw new Error("Cannot find module '" + id + "'");
      }
      var cached = cache[id];
      if (cached) return cached.exports;
      var module = cache[id] = { exports: {} };
      modules[id].call(module.exports, load, module, module.exports);
      return module.exports;
    }
    var previous = root.require;
    root.require = function (id) {
      if (exposed.indexOf(id) !== -1) return load(id);
      if (typeof previous === "function") return previous(id);
      throw new Error("Cannot find module '" + id + "'");
    };
  };
})(typeof window !== "undefined" ? window : this)"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EmbeddedModules {
        EmbeddedModules::new()
            .with("./app.js", "var lib = require('isomorph');\nvar fmt = require(\"./format\");\nmodule.exports = fmt;\n")
            .with("./format.js", "exports.label = function (xs) { return xs.join(', '); };\n")
            .with("./unused.js", "throw new Error('never bundled');\n")
    }

    #[test]
    fn test_bundle_follows_requires() {
        let modules = sample();
        let bundle = Bundler::new(&modules)
            .global("isomorph", "window.Isomorph")
            .require("./app.js")
            .bundle()
            .unwrap();

        assert!(bundle.contains("\"./app.js\": function (require, module, exports) {"));
        assert!(bundle.contains("\"./format.js\": function (require, module, exports) {"));
        assert!(bundle.contains("var lib = (window.Isomorph);"));
        assert!(bundle.contains("var fmt = require(\"./format.js\");"));
        assert!(!bundle.contains("never bundled"));
        assert!(bundle.trim_end().ends_with("}, [\"./app.js\"]);"));
    }

    #[test]
    fn test_bundle_is_deterministic() {
        let modules = sample();
        let build = || {
            Bundler::new(&modules)
                .global("isomorph", "window.Isomorph")
                .require("app.js")
                .bundle()
                .unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_missing_dependency() {
        let modules = EmbeddedModules::new().with("./app.js", "require('./gone');\n");
        let err = Bundler::new(&modules).require("./app.js").bundle().unwrap_err();
        match err {
            BundleError::ModuleNotFound { module, from } => {
                assert_eq!(module, "./gone.js");
                assert_eq!(from, "./app.js");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unmapped_bare_module() {
        let modules = EmbeddedModules::new().with("./app.js", "require('react');\n");
        let err = Bundler::new(&modules).require("./app.js").bundle().unwrap_err();
        assert!(err.to_string().contains("`react`"));
    }

    #[test]
    fn test_missing_entry() {
        let modules = EmbeddedModules::new();
        let err = Bundler::new(&modules).require("./app.js").bundle().unwrap_err();
        assert!(matches!(err, BundleError::ModuleNotFound { ref from, .. } if from == ENTRY));
    }

    #[test]
    fn test_cycles_bundle_once() {
        let modules = EmbeddedModules::new()
            .with("./a.js", "require('./b');\n")
            .with("./b.js", "require('./a');\n");
        let bundle = Bundler::new(&modules).require("./a.js").bundle().unwrap();
        assert_eq!(bundle.matches("\"./a.js\": function").count(), 1);
        assert_eq!(bundle.matches("\"./b.js\": function").count(), 1);
    }

    #[test]
    fn test_method_named_require_is_left_alone() {
        let modules = EmbeddedModules::new().with("./app.js", "loader.require('./nope');\n");
        let bundle = Bundler::new(&modules).require("./app.js").bundle().unwrap();
        assert!(bundle.contains("loader.require('./nope');"));
    }

    #[test]
    fn test_dir_modules() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("lib")).unwrap();
        std::fs::write(dir.path().join("app.js"), "module.exports = require('./lib/x');\n").unwrap();
        std::fs::write(dir.path().join("lib/x.js"), "module.exports = 42;\n").unwrap();

        let modules = DirModules::new(dir.path());
        let bundle = Bundler::new(&modules).require("./app.js").bundle().unwrap();
        assert!(bundle.contains("module.exports = require(\"./lib/x.js\");"));
        assert!(bundle.contains("module.exports = 42;"));
        assert_eq!(modules.load("./missing.js").unwrap(), None);
    }
}
