//! List indexed articles, templates or loaded definitions.

use super::open_wiki;
use crate::ListTarget;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use uki_core::{EntryIndex, Settings, Variable, VariableStore};

pub fn list_content(root: &Path, what: ListTarget, json: bool) -> Result<()> {
    let wiki = open_wiki(root)?;

    match what {
        ListTarget::Articles => list_entries(wiki.articles(), json),
        ListTarget::Templates => list_entries(wiki.templates(), json),
        ListTarget::Variables => list_store(wiki.variables(), json),
        ListTarget::Config if json => print_config_json(wiki.settings(), wiki.config()),
        ListTarget::Config => list_store(wiki.config(), json),
    }
}

fn list_entries(index: &EntryIndex, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(index.entries())?);
        return Ok(());
    }

    for entry in index {
        println!("{}", entry.relative_path);
    }
    Ok(())
}

fn list_store(store: &VariableStore, json: bool) -> Result<()> {
    if json {
        let vars: Vec<_> = store.iter().collect();
        println!("{}", serde_json::to_string_pretty(&vars)?);
        return Ok(());
    }

    for var in store {
        println!("{}={}", var.key, var.value);
    }
    Ok(())
}

#[derive(Serialize)]
struct ConfigListing<'a> {
    settings: &'a Settings,
    definitions: Vec<&'a Variable>,
}

/// Resolved settings alongside the raw manifest definitions.
fn print_config_json(settings: &Settings, config: &VariableStore) -> Result<()> {
    let listing = ConfigListing {
        settings,
        definitions: config.iter().collect(),
    };
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}
