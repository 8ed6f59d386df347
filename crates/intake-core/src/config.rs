//! Configuration types for intake.
//!
//! [`Config::load`] layers, lowest precedence first: the embedded defaults,
//! an optional TOML file, and `INTAKE__<SECTION>__<KEY>` environment
//! variables. [`Config::defaults`] returns the embedded defaults alone
//! (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[server]
bind = "127.0.0.1:8080"

[store]
name    = "Desi Arms — Customer Requests"
backend = "directory"
root    = "intake-data"

[notify]
brand            = "Desi Arms"
operator_address = "you@desiarms.com"
from_address     = "no-reply@desiarms.com"
relay_url        = ""

[log]
format = "pretty"
filter = "info"
"#;

const ENV_PREFIX: &str = "INTAKE";
const ENV_SEPARATOR: &str = "__";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub notify: NotifyConfig,
    pub log: LogConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

/// `[store]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Exact name the store is looked up (and created) by.
    pub name: String,
    pub backend: StoreBackendKind,
    /// Root directory of the `directory` backend.
    pub root: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    Directory,
    Memory,
}

/// `[notify]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Business name used in mail templates and the liveness text.
    pub brand: String,
    /// Staff inbox for internal notifications.
    pub operator_address: String,
    pub from_address: String,
    /// HTTP mail relay endpoint. Empty means log-only delivery.
    #[serde(default)]
    pub relay_url: String,
}

impl NotifyConfig {
    pub fn relay_url(&self) -> Option<&str> {
        let url = self.relay_url.trim();
        (!url.is_empty()).then_some(url)
    }
}

/// `[log]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the layered configuration. `path`, when given, must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem or the
    /// environment.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
