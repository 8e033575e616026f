//! Directory tree view of articles and templates.

use super::open_wiki;
use anyhow::Result;
use std::path::Path;
use uki_core::{EntryIndex, TreeNode};

pub fn print_tree(root: &Path) -> Result<()> {
    let wiki = open_wiki(root)?;

    print_index("Articles", wiki.articles());
    println!();
    print_index("Templates", wiki.templates());
    Ok(())
}

fn print_index(title: &str, index: &EntryIndex) {
    println!("{} ({})", title, index.len());
    for node in index.tree() {
        match node {
            TreeNode::Directory { name, depth } => {
                println!("{}{}/", indent(depth), name);
            }
            TreeNode::Entry(entry) => {
                println!("{}{}", indent(entry.depth), entry.display_name);
            }
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth + 1)
}
