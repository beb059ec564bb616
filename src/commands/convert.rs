//! Convert an HTML file to Markdown

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::html_to_markdown;

/// Read an HTML file and return it as Markdown
pub fn run(path: &Path) -> Result<String> {
    let html = fs::read_to_string(path)?;
    let markdown = html_to_markdown(&html)?;
    tracing::debug!("Converted {:?} ({} bytes)", path, markdown.len());
    Ok(markdown)
}
