//! BoxContentStore -- object-safe dynamic dispatch wrapper for ContentStore.
//!
//! Same blanket-impl pattern as `BoxLlmGateway`:
//! 1. Define an object-safe `ContentStoreDyn` trait with boxed futures
//! 2. Blanket-impl `ContentStoreDyn` for all `T: ContentStore`
//! 3. `BoxContentStore` wraps `Box<dyn ContentStoreDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use tutor_types::content::ContentItem;
use tutor_types::error::StoreError;

use super::store::ContentStore;

/// Object-safe version of [`ContentStore`] with boxed futures.
pub trait ContentStoreDyn: Send + Sync {
    fn search_boxed<'a>(
        &'a self,
        query: &'a str,
        grade_level: Option<i32>,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ContentItem>, StoreError>> + Send + 'a>>;
}

impl<T: ContentStore> ContentStoreDyn for T {
    fn search_boxed<'a>(
        &'a self,
        query: &'a str,
        grade_level: Option<i32>,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ContentItem>, StoreError>> + Send + 'a>> {
        Box::pin(self.search(query, grade_level, limit))
    }
}

/// Type-erased content store for runtime backend selection.
pub struct BoxContentStore {
    inner: Box<dyn ContentStoreDyn + Send + Sync>,
}

impl BoxContentStore {
    /// Wrap a concrete `ContentStore` in a type-erased box.
    pub fn new<T: ContentStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }

    pub async fn search(
        &self,
        query: &str,
        grade_level: Option<i32>,
        limit: usize,
    ) -> Result<Vec<ContentItem>, StoreError> {
        self.inner.search_boxed(query, grade_level, limit).await
    }
}
