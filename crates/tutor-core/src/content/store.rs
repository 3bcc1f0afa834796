//! ContentStore trait definition.

use tutor_types::content::ContentItem;
use tutor_types::error::StoreError;

/// Keyword search over curriculum content.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in tutor-infra (e.g., `SqliteContentStore`).
pub trait ContentStore: Send + Sync {
    /// Search content relevant to `query`.
    ///
    /// Results are ordered by relevance, most relevant first. `grade_level`
    /// of `None` searches every grade. An empty vec is a valid answer and
    /// must not be reported as an error.
    fn search(
        &self,
        query: &str,
        grade_level: Option<i32>,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ContentItem>, StoreError>> + Send;
}
