//! Render every article and surface failures.

use super::open_wiki;
use anyhow::{bail, Result};
use serde::Serialize;
use std::path::Path;
use uki_core::ArticleReport;

#[derive(Serialize)]
struct CheckSummary<'a> {
    articles: usize,
    failed: usize,
    reports: &'a [ArticleReport],
}

/// Render all articles; fails when any of them does not render.
pub fn check_wiki(root: &Path, json: bool) -> Result<()> {
    let wiki = open_wiki(root)?;
    let reports = uki_core::check_articles(&wiki);
    let failed = reports.iter().filter(|r| !r.ok).count();

    if json {
        let summary = CheckSummary {
            articles: reports.len(),
            failed,
            reports: &reports,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for report in &reports {
            match &report.error {
                None => println!("✓ {}", report.page),
                Some(err) => println!("✗ {}: {}", report.page, err),
            }
        }
        println!("Check complete: {} articles, {} failed", reports.len(), failed);
    }

    if failed > 0 {
        bail!("{} of {} articles failed to render", failed, reports.len());
    }
    Ok(())
}
