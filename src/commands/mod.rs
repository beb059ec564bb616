pub mod convert;
pub mod index;
pub mod render;
