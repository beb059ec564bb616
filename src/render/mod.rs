//! Renderers turning fetched content into container children

mod list;
mod markup;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use list::ListRenderer;
pub use markup::MarkupRenderer;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("unknown highlight theme '{0}'")]
    UnknownTheme(String),

    #[error("conversion failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("container '{0}' not found")]
    ContainerNotFound(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Converts raw markup into an HTML fragment
pub trait MarkupConverter {
    fn convert(&self, source: &str) -> Result<String, ConversionError>;
}

impl<C: MarkupConverter + ?Sized> MarkupConverter for &C {
    fn convert(&self, source: &str) -> Result<String, ConversionError> {
        (**self).convert(source)
    }
}

/// How entry fields are placed into list markup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapePolicy {
    /// Fields are interpolated as-is. Titles or paths containing markup are
    /// injected into the page.
    #[default]
    Verbatim,
    /// Fields are HTML-escaped
    Escaped,
}
