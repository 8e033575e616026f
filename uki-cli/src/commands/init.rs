//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use uki_core::config::{ARTICLE_ROOT, ASSETS_ROOT, MANIFEST_FILE, TEMPLATE_ROOT, VARIABLES_FILE};

const DEFAULT_MANIFEST: &str = "main_template=layout\nextension=html\nvariable_policy=strict\n";

const DEFAULT_VARIABLES: &str = "site_title=My uki wiki\nauthor=Anonymous\n";

const DEFAULT_LAYOUT: &str = "<!DOCTYPE html>
<html>
[partials/head]
<body>
<h1>%site_title%</h1>
%_body_%
<footer>Written by %author%</footer>
</body>
</html>
";

const DEFAULT_HEAD: &str = "<head><meta charset=\"utf-8\"><title>%site_title%</title></head>";

const DEFAULT_HOME: &str = "<p>Welcome to your new wiki.</p>
";

/// Create a wiki skeleton under `path`, leaving existing files alone.
pub fn init_wiki(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));

    for dir in [ARTICLE_ROOT, TEMPLATE_ROOT, ASSETS_ROOT] {
        let dir = root.join(dir);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    let files = [
        (MANIFEST_FILE.to_string(), DEFAULT_MANIFEST),
        (VARIABLES_FILE.to_string(), DEFAULT_VARIABLES),
        (format!("{}/layout.html", TEMPLATE_ROOT), DEFAULT_LAYOUT),
        (format!("{}/partials/head.html", TEMPLATE_ROOT), DEFAULT_HEAD),
        (format!("{}/home.html", ARTICLE_ROOT), DEFAULT_HOME),
    ];
    for (rel, contents) in files {
        write_if_missing(&root.join(rel), contents)?;
    }

    println!("✓ uki wiki initialized in {:?}", root);
    println!("  - Set variables in {}", VARIABLES_FILE);
    println!("  - Write articles in {}/", ARTICLE_ROOT);
    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        println!("{:?} already exists", path);
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    println!("Created {:?}", path);
    Ok(())
}
