use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::types::{Article, Category};

/// Failure kinds an article store can report. Readers decide what to do with
/// them; stores never swallow their own errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("could not decode stored article: {0}")]
    Decode(String),

    #[error("store did not answer within {0:?}")]
    Timeout(Duration),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Short name used in logs ("sqlite", "documents", ...)
    fn name(&self) -> &str;

    /// Articles tagged with `category`, newest first.
    async fn query_by_category(
        &self,
        category: Category,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Article>>;

    /// All articles regardless of category, newest first.
    async fn query_all(&self, limit: usize, offset: usize) -> StoreResult<Vec<Article>>;

    /// Insert or update an article, keyed by its URL.
    async fn upsert(&self, article: &Article) -> StoreResult<()>;

    /// Dispatches to `query_all` for the unfiltered category.
    async fn query(
        &self,
        category: Category,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Article>> {
        if category.is_unfiltered() {
            self.query_all(limit, offset).await
        } else {
            self.query_by_category(category, limit, offset).await
        }
    }
}
