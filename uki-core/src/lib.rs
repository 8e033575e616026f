//! # uki-core
//!
//! Core library for the uki micro-wiki.
//!
//! A wiki is a directory holding `MANIFEST.uki`, `VARIABLES.uki`, a `pages/`
//! tree of articles and a `templates/` tree of layout fragments. This crate
//! indexes that content and renders a page by expanding `[template]`
//! inclusions, injecting the article at `%_body_%` and substituting
//! `%variable%` references.

pub mod assets;
pub mod config;
pub mod edit;
pub mod fs;
pub mod index;
pub mod path;
pub mod render;
pub mod tag;
pub mod template;
pub mod variables;
pub mod wiki;

pub use assets::{rewrite_asset_paths, AssetError};
pub use config::{ConfigError, Settings, VariablePolicy};
pub use fs::ListingError;
pub use index::{Entry, EntryIndex, EntryKind, TreeNode};
pub use render::{
    check_articles, render_article_preview, render_page, ArticleReport, RenderError,
    RenderOptions, Renderer,
};
pub use template::{Substitution, TemplateEngine, TemplateError};
pub use variables::{Variable, VariableStore};
pub use wiki::{Wiki, WikiError};
