//! Render and preview commands.

use super::open_wiki;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use uki_core::{RenderOptions, Renderer};

fn options(lenient: bool) -> RenderOptions {
    if lenient {
        RenderOptions::lenient()
    } else {
        RenderOptions::default()
    }
}

/// Render `page` and write it to `output` or stdout.
pub fn render_page(root: &Path, page: &str, lenient: bool, output: Option<&Path>) -> Result<()> {
    let wiki = open_wiki(root)?;
    let html = Renderer::new(&wiki)
        .with_options(options(lenient))
        .render_page(page)
        .with_context(|| format!("Failed to render '{}'", page))?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {:?}", parent))?;
            }
            fs::write(path, &html).with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("Wrote {} bytes to {:?}", html.len(), path);
        }
        None => write_stdout(&html)?,
    }

    Ok(())
}

/// Print the article body of `page` with asset paths rewritten.
pub fn preview_article(root: &Path, page: &str, lenient: bool) -> Result<()> {
    let wiki = open_wiki(root)?;
    let html = Renderer::new(&wiki)
        .with_options(options(lenient))
        .render_article_preview(page)
        .with_context(|| format!("Failed to preview '{}'", page))?;

    write_stdout(&html)
}

fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
