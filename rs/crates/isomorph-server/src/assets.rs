use crate::config::Config;
use axum::body::Bytes;
use isomorph_bundler::{BundleError, Bundler, DirModules, EmbeddedModules, ModuleSource};

/// Component module the bundle exposes to the page's bootstrap script.
pub const COMPONENT_MODULE: &str = "./app.js";
/// Runtime served as its own script; bundled modules reach it as a global.
pub const RUNTIME_MODULE: &str = "./runtime.js";
const RUNTIME_NAME: &str = "isomorph";
const RUNTIME_GLOBAL: &str = "window.Isomorph";

/// Client modules compiled into the binary.
pub fn embedded() -> EmbeddedModules {
    EmbeddedModules::new()
        .with("./app.js", include_str!("../assets/app.js"))
        .with("./format.js", include_str!("../assets/format.js"))
        .with("./runtime.js", include_str!("../assets/runtime.js"))
}

/// Scripts served to the browser, built once at startup.
pub struct ClientAssets {
    pub bundle: Bytes,
    pub runtime: Bytes,
}

impl ClientAssets {
    pub fn load(config: &Config) -> Result<Self, BundleError> {
        match &config.assets_dir {
            Some(dir) => Self::build(&DirModules::new(dir)),
            None => Self::build(&embedded()),
        }
    }

    pub fn build(source: &dyn ModuleSource) -> Result<Self, BundleError> {
        let bundle = Bundler::new(source)
            .global(RUNTIME_NAME, RUNTIME_GLOBAL)
            .require(COMPONENT_MODULE)
            .bundle()?;
        let runtime = source
            .load(RUNTIME_MODULE)?
            .ok_or_else(|| BundleError::ModuleNotFound {
                module: RUNTIME_MODULE.to_string(),
                from: "<runtime>".to_string(),
            })?;
        Ok(Self {
            bundle: Bytes::from(bundle),
            runtime: Bytes::from(runtime),
        })
    }
}
