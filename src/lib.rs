//! pagefill: fetch blog content and render it into HTML pages
//!
//! Two pipelines fetch remote content and render it into containers of a
//! page: a JSON list of posts becomes a list of links, and Markdown
//! documents become HTML. The crate also carries the tooling around them:
//! a posts index builder, an HTML to Markdown converter and a local file
//! server.

pub mod commands;
pub mod config;
pub mod content;
pub mod dom;
pub mod fetch;
pub mod helpers;
pub mod pipeline;
pub mod render;
pub mod server;

use anyhow::Result;
use std::path::Path;

use content::MarkdownRenderer;

/// A site directory and its configuration
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
}

impl Site {
    /// Create a new site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self { config, base_dir })
    }

    /// Markdown converter configured for this site
    pub fn markdown_renderer(&self) -> Result<MarkdownRenderer> {
        let highlight = &self.config.highlight;
        if highlight.enable {
            Ok(MarkdownRenderer::with_highlight(
                &highlight.theme,
                highlight.line_number,
            )?)
        } else {
            Ok(MarkdownRenderer::new())
        }
    }

    /// Run every configured pipeline and write the filled page
    pub async fn render(&self, url: Option<&str>) -> Result<commands::render::Report> {
        commands::render::run(self, url).await
    }

    /// Build and write the posts index
    pub fn index(&self) -> Result<usize> {
        commands::index::run(self)
    }
}
