//! Configuration for supsub tools
//!
//! The editor settings every tool attaches with, plus how the CLI reports results. The shipped
//! values live in `defaults/supsub.default.toml`, compiled in as the bottom layer of every
//! [`Loader`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use supsub::supsub::editor::EditorSettings;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/supsub.default.toml");

/// Top-level configuration consumed by supsub applications.
#[derive(Debug, Clone, Deserialize)]
pub struct SupsubConfig {
    /// Settings every editor is attached with, unless the host overrides them.
    pub editor: EditorSettings,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Text,
    Json,
}

/// Builds a [`SupsubConfig`] from the embedded defaults plus whatever the caller layers on.
///
/// Later layers win key by key. Keys reach serde lowercased, so camel-case settings rely on
/// the lowercase aliases declared on the settings types.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file that must exist; [`Loader::build`] fails otherwise.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a TOML file if it exists, e.g. a per-user settings file.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Set one dotted key, such as `editor.type`, above every file layer.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<SupsubConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in configuration with nothing layered on top.
pub fn load_defaults() -> Result<SupsubConfig, ConfigError> {
    Loader::new().build()
}
