//! Page rendering: main template, article body and variables combined into
//! one document.

use crate::assets::{self, AssetError};
use crate::config::VariablePolicy;
use crate::fs;
use crate::index::Entry;
use crate::template::{self, Substitution, TemplateEngine, TemplateError};
use crate::wiki::Wiki;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No main_template set in the manifest")]
    MainTemplateUnset,

    #[error("Article not found: '{page}'")]
    ArticleNotFound { page: String },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Per-call overrides of the wiki settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Replaces the manifest's `variable_policy` when set
    pub policy: Option<VariablePolicy>,
}

impl RenderOptions {
    pub fn lenient() -> Self {
        Self {
            policy: Some(VariablePolicy::Lenient),
        }
    }
}

/// State of one render call.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub wiki: &'a Wiki,
    pub article: &'a Entry,
    pub article_path: PathBuf,
    pub policy: VariablePolicy,
}

/// Outcome of rendering one article during a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleReport {
    pub page: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Renders the articles of a wiki.
pub struct Renderer<'a> {
    wiki: &'a Wiki,
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(wiki: &'a Wiki) -> Self {
        Self {
            wiki,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Render `page` inside the main template with every variable substituted.
    pub fn render_page(&self, page: &str) -> Result<String, RenderError> {
        let settings = self.wiki.settings();
        let main_template = settings
            .main_template
            .as_deref()
            .ok_or(RenderError::MainTemplateUnset)?;

        let engine = TemplateEngine::new(self.wiki.templates())
            .with_max_depth(settings.max_expansion_depth);
        let layout = engine.render_template(main_template)?;

        let ctx = self.context(page)?;
        let document = template::render_article_in_template(&layout, &ctx.article_path)?;
        self.substitute(&document, &ctx)
    }

    /// Render the article body alone, with image paths made relative to it.
    pub fn render_article_preview(&self, page: &str) -> Result<String, RenderError> {
        let ctx = self.context(page)?;
        let body = fs::read_text(&ctx.article_path).map_err(|source| {
            TemplateError::ArticleReadFailed {
                path: ctx.article_path.clone(),
                source,
            }
        })?;

        let body = self.substitute(&body, &ctx)?;
        Ok(assets::rewrite_asset_paths(&body, ctx.article.depth)?)
    }

    /// Render every indexed article and report the outcome of each.
    pub fn check_articles(&self) -> Vec<ArticleReport> {
        let reports: Vec<ArticleReport> = self
            .wiki
            .articles()
            .iter()
            .map(|entry| match self.render_page(&entry.relative_path) {
                Ok(_) => ArticleReport {
                    page: entry.relative_path.clone(),
                    ok: true,
                    error: None,
                },
                Err(e) => {
                    tracing::warn!("Failed to render '{}': {}", entry.relative_path, e);
                    ArticleReport {
                        page: entry.relative_path.clone(),
                        ok: false,
                        error: Some(e.to_string()),
                    }
                }
            })
            .collect();

        let failed = reports.iter().filter(|r| !r.ok).count();
        tracing::info!("Checked {} articles, {} failed", reports.len(), failed);
        reports
    }

    fn context(&self, page: &str) -> Result<RenderContext<'a>, RenderError> {
        let article =
            self.wiki
                .articles()
                .find(page)
                .ok_or_else(|| RenderError::ArticleNotFound {
                    page: page.to_string(),
                })?;

        Ok(RenderContext {
            wiki: self.wiki,
            article,
            article_path: self.wiki.article_path(article),
            policy: self
                .options
                .policy
                .unwrap_or(self.wiki.settings().variable_policy),
        })
    }

    fn substitute(&self, text: &str, ctx: &RenderContext<'_>) -> Result<String, RenderError> {
        let max_depth = ctx.wiki.settings().max_expansion_depth;

        match ctx.policy {
            VariablePolicy::Strict => {
                Ok(template::render_variables(text, ctx.wiki.variables(), max_depth)?)
            }
            VariablePolicy::Lenient => {
                match template::substitute_variables(text, ctx.wiki.variables(), max_depth)? {
                    Substitution::Complete(text) => Ok(text),
                    Substitution::Stopped { text, missing } => {
                        tracing::warn!(
                            "Variable '{}' not found while rendering '{}', keeping the rest verbatim",
                            missing,
                            ctx.article.relative_path
                        );
                        Ok(text)
                    }
                }
            }
        }
    }
}

/// Render `page` with the wiki's own settings.
pub fn render_page(wiki: &Wiki, page: &str) -> Result<String, RenderError> {
    Renderer::new(wiki).render_page(page)
}

/// Preview `page` with the wiki's own settings.
pub fn render_article_preview(wiki: &Wiki, page: &str) -> Result<String, RenderError> {
    Renderer::new(wiki).render_article_preview(page)
}

/// Render every article with the wiki's own settings.
pub fn check_articles(wiki: &Wiki) -> Vec<ArticleReport> {
    Renderer::new(wiki).check_articles()
}
