//! Curriculum content returned by the content store.

use serde::{Deserialize, Serialize};

/// One ranked hit from a curriculum search.
///
/// Relevance is implicit in the position of the item within the returned
/// list (most relevant first); there is no score field on purpose so callers
/// cannot re-sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<i32>,
}

impl ContentItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            title: None,
            grade_level: None,
        }
    }
}
