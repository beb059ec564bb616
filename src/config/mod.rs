//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::IndexConfig;
pub use site::MarkdownSource;
pub use site::PostsConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
