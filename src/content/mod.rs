//! Content module - post entries, the posts index and format conversion

pub mod html_to_md;
pub mod index;
mod markdown;
mod post;

pub use html_to_md::html_to_markdown;
pub use markdown::MarkdownRenderer;
pub use post::PostEntry;
