use crate::BundleError;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

/// Where module text comes from. Ids are canonical (`./dir/file.js`).
pub trait ModuleSource: Send + Sync {
    /// Load a module by id; `Ok(None)` when it does not exist.
    fn load(&self, id: &str) -> Result<Option<String>, BundleError>;
}

/// Modules compiled into the binary (e.g. with `include_str!`).
#[derive(Debug, Default, Clone)]
pub struct EmbeddedModules {
    modules: BTreeMap<String, &'static str>,
}

impl EmbeddedModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &str, text: &'static str) -> Self {
        self.modules.insert(id.to_string(), text);
        self
    }
}

impl ModuleSource for EmbeddedModules {
    fn load(&self, id: &str) -> Result<Option<String>, BundleError> {
        Ok(self.modules.get(id).map(|text| text.to_string()))
    }
}

/// Modules read from a directory at bundle time.
#[derive(Debug, Clone)]
pub struct DirModules {
    root: PathBuf,
}

impl DirModules {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ModuleSource for DirModules {
    fn load(&self, id: &str) -> Result<Option<String>, BundleError> {
        // Canonical ids never contain `..`, so this stays under root.
        let path = self.root.join(id.trim_start_matches("./"));
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BundleError::Io { path, source }),
        }
    }
}
