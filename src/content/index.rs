//! Posts index builder
//!
//! Every post lives in its own directory as `<posts_dir>/<name>/index.html`.
//! The index lists them in directory name order, titled by the page's
//! `<title>` element.

use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::PostEntry;

lazy_static! {
    static ref TITLE_RE: Regex = Regex::new(r"<title>(.*?)</title>").unwrap();
}

/// Extract the first `<title>` of a page
pub fn extract_title(html: &str) -> Option<&str> {
    TITLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Scan `base_dir/posts_dir` and build the index entries
pub fn build_index(base_dir: &Path, posts_dir: &str) -> Result<Vec<PostEntry>> {
    let root = base_dir.join(posts_dir);
    if !root.is_dir() {
        anyhow::bail!("Posts directory not found: {:?}", root);
    }

    let mut entries = Vec::new();

    for entry in WalkDir::new(&root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        let page = entry.path().join("index.html");
        let html = match fs::read_to_string(&page) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", page, e);
                continue;
            }
        };

        let title = extract_title(&html).unwrap_or(name.as_str()).to_string();
        let path = format!("{}/{}/index.html", posts_dir.trim_end_matches('/'), name);
        entries.push(PostEntry { title, path });
    }

    Ok(entries)
}

/// Write the index as pretty-printed JSON
pub fn write_index(entries: &[PostEntry], output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(output, json)?;
    Ok(())
}
