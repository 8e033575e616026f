//! CLI command implementations.

pub mod check;
pub mod init;
pub mod list;
pub mod render;
pub mod tree;

use anyhow::{Context, Result};
use std::path::Path;
use uki_core::Wiki;

pub use check::check_wiki;
pub use init::init_wiki;
pub use list::list_content;
pub use render::{preview_article, render_page};
pub use tree::print_tree;

/// Load the wiki rooted at `root`.
pub(crate) fn open_wiki(root: &Path) -> Result<Wiki> {
    Wiki::initialize(root).with_context(|| format!("Failed to load wiki at {:?}", root))
}
