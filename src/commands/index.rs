//! Build the posts index

use anyhow::Result;

use crate::content::index::{build_index, write_index};
use crate::Site;

/// Scan the posts directory and write the index, returning the entry count
pub fn run(site: &Site) -> Result<usize> {
    let index = &site.config.index;
    let entries = build_index(&site.base_dir, &index.posts_dir)?;

    let output = site.base_dir.join(&index.output);
    write_index(&entries, &output)?;
    tracing::info!("Wrote {} entries to {:?}", entries.len(), output);

    Ok(entries.len())
}
