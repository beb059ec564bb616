//! Helper functions shared by renderers and converters

mod html;

pub use html::*;
