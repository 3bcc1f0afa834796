//! Retrieval adapter: student message + grade -> ordered curriculum snippets.
//!
//! Retrieval is best-effort enrichment. A store failure or an empty result
//! never fails the tutor call; the context region receives the configured
//! placeholder instead.

use tracing::{debug, warn};

use tutor_types::content::ContentItem;

use crate::content::box_store::BoxContentStore;

/// Separator between snippets in the rendered context region.
pub const SNIPPET_SEPARATOR: &str = "\n\n";

/// Turns a query into a bounded, rank-ordered list of snippets.
pub struct RetrievalAdapter {
    store: BoxContentStore,
    max_snippets: usize,
    max_context_chars: usize,
    placeholder: String,
}

impl RetrievalAdapter {
    pub fn new(
        store: BoxContentStore,
        max_snippets: usize,
        max_context_chars: usize,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            store,
            max_snippets: max_snippets.max(1),
            max_context_chars,
            placeholder: placeholder.into(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Retrieve snippets for `query`, preferring content tagged with
    /// `grade_level` and falling back to all grades when no usable
    /// grade-scoped snippet remains.
    ///
    /// Always returns at least one non-empty entry: the placeholder when
    /// nothing usable was found or the store failed.
    pub async fn retrieve(&self, query: &str, grade_level: i32) -> Vec<String> {
        let Some(graded) = self.search(query, Some(grade_level)).await else {
            return vec![self.placeholder.clone()];
        };

        let snippets = if graded.is_empty() {
            debug!(grade_level, "No grade-scoped content, retrying across all grades");
            let Some(global) = self.search(query, None).await else {
                return vec![self.placeholder.clone()];
            };
            global
        } else {
            graded
        };

        if snippets.is_empty() {
            debug!(grade_level, "No curriculum content matched, using placeholder context");
            vec![self.placeholder.clone()]
        } else {
            debug!(grade_level, count = snippets.len(), "Retrieved curriculum snippets");
            snippets
        }
    }

    /// One bounded search; `None` when the store failed.
    async fn search(&self, query: &str, grade_level: Option<i32>) -> Option<Vec<String>> {
        match self.store.search(query, grade_level, self.max_snippets).await {
            Ok(items) => Some(self.bound(items)),
            Err(e) => {
                warn!(?grade_level, error = %e, "Content store search failed, using placeholder context");
                None
            }
        }
    }

    /// Join snippets in the given order, separated by a blank line.
    pub fn render(snippets: &[String]) -> String {
        snippets.join(SNIPPET_SEPARATOR)
    }

    /// Keep store order, drop blank items, cap count and total size.
    ///
    /// Whole snippets only, except a lone first snippet that is itself over
    /// budget, which is cut at a char boundary.
    fn bound(&self, items: Vec<ContentItem>) -> Vec<String> {
        let mut snippets = Vec::new();
        let mut used = 0usize;

        for item in items {
            if snippets.len() == self.max_snippets {
                break;
            }
            let text = item.content.trim();
            if text.is_empty() {
                continue;
            }

            let len = text.chars().count();
            let cost = if snippets.is_empty() {
                len
            } else {
                len + SNIPPET_SEPARATOR.len()
            };

            if used + cost <= self.max_context_chars {
                used += cost;
                snippets.push(text.to_string());
            } else if snippets.is_empty() {
                let cut: String = text.chars().take(self.max_context_chars).collect();
                if !cut.is_empty() {
                    snippets.push(cut);
                }
                break;
            } else {
                break;
            }
        }

        snippets
    }
}
