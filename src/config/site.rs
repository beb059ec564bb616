//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::render::EscapePolicy;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL relative endpoints are resolved against
    pub url: String,

    /// HTML page holding the containers
    pub page: String,
    /// Where the filled page is written
    pub output: String,

    #[serde(default)]
    pub posts: PostsConfig,
    #[serde(default)]
    pub markdown: Vec<MarkdownSource>,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:4000/".to_string(),
            page: "index.html".to_string(),
            output: "public/index.html".to_string(),
            posts: PostsConfig::default(),
            markdown: Vec::new(),
            highlight: HighlightConfig::default(),
            index: IndexConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Post list pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostsConfig {
    pub endpoint: String,
    pub container: String,
    pub item_class: String,
    pub escape: EscapePolicy,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            endpoint: "posts.json".to_string(),
            container: "posts-list".to_string(),
            item_class: "list-group-item".to_string(),
            escape: EscapePolicy::Verbatim,
        }
    }
}

/// A Markdown document rendered into a container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownSource {
    pub endpoint: String,
    pub container: String,
}

/// Code highlighting inside rendered Markdown
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: false,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Posts index builder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub posts_dir: String,
    pub output: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            posts_dir: "posts".to_string(),
            output: "posts.json".to_string(),
        }
    }
}

/// Local file server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}
