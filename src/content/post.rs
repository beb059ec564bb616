//! Post list entries

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the posts index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntry {
    /// Post title, used as link label
    pub title: String,

    /// Link target
    pub path: String,
}

impl PostEntry {
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
        }
    }

    /// Read a fetched JSON array of entries, keeping its order
    pub fn list_from_json(value: Value) -> Result<Vec<PostEntry>, serde_json::Error> {
        serde_json::from_value(value)
    }
}
