//! Wiki layout constants and the settings read from `MANIFEST.uki`.

use crate::template::MAX_EXPANSION_DEPTH_LIMIT;
use crate::variables::{self, VariableStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MANIFEST_FILE: &str = "MANIFEST.uki";
pub const VARIABLES_FILE: &str = "VARIABLES.uki";
pub const ARTICLE_ROOT: &str = "pages";
pub const TEMPLATE_ROOT: &str = "templates";
pub const ASSETS_ROOT: &str = "assets";

/// Manifest keys understood by the engine
pub const KEY_MAIN_TEMPLATE: &str = "main_template";
pub const KEY_EXTENSION: &str = "extension";
pub const KEY_MAX_EXPANSION_DEPTH: &str = "max_expansion_depth";
pub const KEY_VARIABLE_POLICY: &str = "variable_policy";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No manifest file found at {}", path.display())]
    MissingManifest { path: PathBuf },

    #[error("No variables file found at {}", path.display())]
    MissingVariables { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing {}: {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: variables::ParseError,
    },

    #[error("Invalid value for '{key}': {value:?}")]
    InvalidValue { key: String, value: String },
}

/// What to do when a `%variable%` has no definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariablePolicy {
    /// Fail the render
    #[default]
    Strict,
    /// Stop substituting and keep the text produced so far
    Lenient,
}

impl VariablePolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Some(VariablePolicy::Strict),
            "lenient" => Some(VariablePolicy::Lenient),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VariablePolicy::Strict => "strict",
            VariablePolicy::Lenient => "lenient",
        }
    }
}

/// Engine settings resolved from the config store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Template used as the page layout (required only for rendering)
    pub main_template: Option<String>,

    /// Extension shared by articles and templates
    pub extension: String,

    /// Deepest allowed chain of nested inclusions or variable references
    pub max_expansion_depth: usize,

    pub variable_policy: VariablePolicy,
}

fn default_extension() -> String {
    String::from("html")
}

fn default_max_expansion_depth() -> usize {
    crate::template::DEFAULT_MAX_EXPANSION_DEPTH
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            main_template: None,
            extension: default_extension(),
            max_expansion_depth: default_max_expansion_depth(),
            variable_policy: VariablePolicy::default(),
        }
    }
}

impl Settings {
    /// Read settings out of the config store, falling back to defaults.
    pub fn from_store(config: &VariableStore) -> Result<Self, ConfigError> {
        let mut settings = Settings {
            main_template: config.get(KEY_MAIN_TEMPLATE).map(str::to_string),
            ..Settings::default()
        };

        if let Some(ext) = config.get(KEY_EXTENSION) {
            let ext = ext.trim().trim_start_matches('.');
            if ext.is_empty() {
                return Err(invalid(KEY_EXTENSION, ext));
            }
            settings.extension = ext.to_string();
        }

        if let Some(raw) = config.get(KEY_MAX_EXPANSION_DEPTH) {
            settings.max_expansion_depth = raw
                .trim()
                .parse()
                .ok()
                .filter(|d: &usize| (1..=MAX_EXPANSION_DEPTH_LIMIT).contains(d))
                .ok_or_else(|| invalid(KEY_MAX_EXPANSION_DEPTH, raw))?;
        }

        if let Some(raw) = config.get(KEY_VARIABLE_POLICY) {
            settings.variable_policy =
                VariablePolicy::from_str(raw).ok_or_else(|| invalid(KEY_VARIABLE_POLICY, raw))?;
        }

        Ok(settings)
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Load the config store from `<root>/MANIFEST.uki`.
pub fn load_manifest(root: &Path) -> Result<VariableStore, ConfigError> {
    let path = root.join(MANIFEST_FILE);
    if !crate::fs::file_exists(&path) {
        return Err(ConfigError::MissingManifest { path });
    }
    load_store(&path)
}

/// Load the variable store from `<root>/VARIABLES.uki`.
pub fn load_variables(root: &Path) -> Result<VariableStore, ConfigError> {
    let path = root.join(VARIABLES_FILE);
    if !crate::fs::file_exists(&path) {
        return Err(ConfigError::MissingVariables { path });
    }
    load_store(&path)
}

fn load_store(path: &Path) -> Result<VariableStore, ConfigError> {
    let contents = crate::fs::read_text(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    VariableStore::parse(&contents).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}
