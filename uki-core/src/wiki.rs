//! The loaded wiki: both key/value stores, resolved settings and the two
//! content indexes, read once from disk and then queried read-only.

use crate::config::{self, ConfigError, Settings, ARTICLE_ROOT, TEMPLATE_ROOT};
use crate::fs::ListingError;
use crate::index::{Entry, EntryIndex, EntryKind};
use crate::variables::VariableStore;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WikiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to index content: {0}")]
    Index(#[from] ListingError),
}

/// A wiki rooted at one directory.
#[derive(Debug, Clone)]
pub struct Wiki {
    root: PathBuf,
    config: VariableStore,
    variables: VariableStore,
    settings: Settings,
    articles: EntryIndex,
    templates: EntryIndex,
}

impl Wiki {
    /// Load the manifest and variables, then index articles and templates.
    pub fn initialize(root: impl AsRef<Path>) -> Result<Self, WikiError> {
        let root = root.as_ref().to_path_buf();

        let config = config::load_manifest(&root)?;
        let variables = config::load_variables(&root)?;
        let settings = Settings::from_store(&config)?;

        tracing::debug!(
            "Loaded {} config keys and {} variables from {:?}",
            config.len(),
            variables.len(),
            root
        );

        let articles = EntryIndex::build(
            EntryKind::Article,
            &root.join(ARTICLE_ROOT),
            &settings.extension,
            true,
        )?;
        let templates = EntryIndex::build(
            EntryKind::Template,
            &root.join(TEMPLATE_ROOT),
            &settings.extension,
            true,
        )?;

        Ok(Self {
            root,
            config,
            variables,
            settings,
            articles,
            templates,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Raw `MANIFEST.uki` definitions
    pub fn config(&self) -> &VariableStore {
        &self.config
    }

    /// `VARIABLES.uki` definitions used for `%name%` substitution
    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn articles(&self) -> &EntryIndex {
        &self.articles
    }

    pub fn templates(&self) -> &EntryIndex {
        &self.templates
    }

    pub fn article_path(&self, entry: &Entry) -> PathBuf {
        self.articles.file_path(entry)
    }

    pub fn template_path(&self, entry: &Entry) -> PathBuf {
        self.templates.file_path(entry)
    }
}
