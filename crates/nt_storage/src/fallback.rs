use nt_core::{Article, ArticleStore, Category, StoreError, StoreResult};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::demo::demo_articles;

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a listing ended up coming from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Primary,
    Secondary,
    Demo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackRead {
    pub articles: Vec<Article>,
    pub tier: Tier,
}

impl FallbackRead {
    pub fn is_demo(&self) -> bool {
        self.tier == Tier::Demo
    }
}

#[derive(Debug, Clone)]
pub struct FallbackConfig {
    /// Treat a successful but empty primary listing like an outage and serve
    /// demo data. Sparse real data will look like downtime while this is on.
    pub empty_result_triggers_fallback: bool,
    /// Upper bound on each store call; `None` waits indefinitely.
    pub store_timeout: Option<Duration>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            empty_result_triggers_fallback: true,
            store_timeout: Some(DEFAULT_STORE_TIMEOUT),
        }
    }
}

/// Reads a category listing from the primary store, then the secondary
/// store, then the static demo set. Never fails.
#[derive(Clone)]
pub struct FallbackReader {
    primary: Option<Arc<dyn ArticleStore>>,
    secondary: Option<Arc<dyn ArticleStore>>,
    config: FallbackConfig,
}

impl FallbackReader {
    pub fn new(
        primary: Option<Arc<dyn ArticleStore>>,
        secondary: Option<Arc<dyn ArticleStore>>,
        config: FallbackConfig,
    ) -> Self {
        Self {
            primary,
            secondary,
            config,
        }
    }

    /// A reader with no stores at all; every read is demo data.
    pub fn demo_only() -> Self {
        Self::new(None, None, FallbackConfig::default())
    }

    pub fn config(&self) -> &FallbackConfig {
        &self.config
    }

    pub fn primary(&self) -> Option<&Arc<dyn ArticleStore>> {
        self.primary.as_ref()
    }

    pub fn secondary(&self) -> Option<&Arc<dyn ArticleStore>> {
        self.secondary.as_ref()
    }

    pub async fn read(&self, category: Category, limit: usize, offset: usize) -> FallbackRead {
        match self.attempt(self.primary.as_ref(), category, limit, offset).await {
            Ok(rows) if !rows.is_empty() => {
                return Self::served(rows, category, limit, Tier::Primary);
            }
            Ok(rows) if !self.config.empty_result_triggers_fallback => {
                debug!(%category, "Primary store returned no rows");
                return Self::served(rows, category, limit, Tier::Primary);
            }
            Ok(_) => {
                info!(%category, "Primary store returned no rows, serving demo data");
                return self.demo(category, limit);
            }
            Err(e) => warn!(%category, "Primary store failed: {}", e),
        }

        // The secondary store has no cursor; it always serves the head.
        match self.attempt(self.secondary.as_ref(), category, limit, 0).await {
            Ok(rows) if !rows.is_empty() => {
                return Self::served(rows, category, limit, Tier::Secondary);
            }
            Ok(_) => info!(%category, "Secondary store returned no rows"),
            Err(e) => warn!(%category, "Secondary store failed: {}", e),
        }

        self.demo(category, limit)
    }

    async fn attempt(
        &self,
        store: Option<&Arc<dyn ArticleStore>>,
        category: Category,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Article>> {
        let store = store.ok_or_else(|| StoreError::Unavailable("not configured".to_string()))?;
        let query = store.query(category, limit, offset);
        match self.config.store_timeout {
            Some(timeout) => tokio::time::timeout(timeout, query)
                .await
                .map_err(|_| StoreError::Timeout(timeout))?,
            None => query.await,
        }
    }

    fn served(mut rows: Vec<Article>, category: Category, limit: usize, tier: Tier) -> FallbackRead {
        rows.retain(|article| category.admits(article.category));
        rows.truncate(limit);
        FallbackRead { articles: rows, tier }
    }

    fn demo(&self, category: Category, limit: usize) -> FallbackRead {
        FallbackRead {
            articles: demo_articles(category, limit),
            tier: Tier::Demo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryStore;
    use crate::test_support::{article, FailingStore, SlowStore};

    fn reader(
        primary: Option<Arc<dyn ArticleStore>>,
        secondary: Option<Arc<dyn ArticleStore>>,
    ) -> FallbackReader {
        FallbackReader::new(primary, secondary, FallbackConfig::default())
    }

    #[tokio::test]
    async fn test_primary_rows_win() {
        let primary = MemoryStore::with_articles(vec![article("p", Category::Tech, 1)])
            .await
            .unwrap();
        let secondary = MemoryStore::with_articles(vec![article("s", Category::Tech, 1)])
            .await
            .unwrap();
        let read = reader(Some(Arc::new(primary)), Some(Arc::new(secondary)))
            .read(Category::Tech, 20, 0)
            .await;

        assert_eq!(read.tier, Tier::Primary);
        assert_eq!(read.articles[0].id, "p");
    }

    #[tokio::test]
    async fn test_failing_primary_uses_secondary_head() {
        let secondary = MemoryStore::with_articles(vec![
            article("s1", Category::Politics, 1),
            article("s2", Category::Politics, 2),
        ])
        .await
        .unwrap();
        let reader = reader(Some(Arc::new(FailingStore)), Some(Arc::new(secondary)));

        let read = reader.read(Category::Politics, 20, 40).await;
        assert_eq!(read.tier, Tier::Secondary);
        assert_eq!(read.articles.len(), 2);
        assert_eq!(read.articles[0].id, "s2");
    }

    #[tokio::test]
    async fn test_everything_failing_serves_demo() {
        let reader = reader(Some(Arc::new(FailingStore)), Some(Arc::new(FailingStore)));
        let read = reader.read(Category::Tech, 20, 0).await;

        assert!(read.is_demo());
        assert_eq!(read.articles, demo_articles(Category::Tech, 20));
        assert!(read.articles.len() <= 20);
        assert!(read.articles.iter().all(|a| a.category == Category::Tech));
    }

    #[tokio::test]
    async fn test_empty_primary_serves_demo_without_asking_secondary() {
        let secondary = MemoryStore::with_articles(vec![article("s", Category::Farming, 1)])
            .await
            .unwrap();
        let reader = reader(Some(Arc::new(MemoryStore::new())), Some(Arc::new(secondary)));

        let read = reader.read(Category::Farming, 20, 0).await;
        assert!(read.is_demo());
        assert_eq!(read.articles, demo_articles(Category::Farming, 20));
    }

    #[tokio::test]
    async fn test_empty_primary_can_be_served_as_is() {
        let config = FallbackConfig {
            empty_result_triggers_fallback: false,
            ..FallbackConfig::default()
        };
        let reader = FallbackReader::new(Some(Arc::new(MemoryStore::new())), None, config);

        let read = reader.read(Category::Farming, 20, 0).await;
        assert_eq!(read.tier, Tier::Primary);
        assert!(read.articles.is_empty());
    }

    #[tokio::test]
    async fn test_empty_secondary_serves_demo() {
        let reader = reader(Some(Arc::new(FailingStore)), Some(Arc::new(MemoryStore::new())));
        assert!(reader.read(Category::Hospitality, 5, 0).await.is_demo());
    }

    #[tokio::test]
    async fn test_demo_pages_repeat() {
        let reader = FallbackReader::demo_only();
        let first = reader.read(Category::General, 3, 0).await;
        let second = reader.read(Category::General, 3, 3).await;
        assert_eq!(first, second);
        assert_eq!(first.articles.len(), 3);
    }

    #[tokio::test]
    async fn test_slow_primary_times_out() {
        let config = FallbackConfig {
            store_timeout: Some(Duration::from_millis(50)),
            ..FallbackConfig::default()
        };
        let reader = FallbackReader::new(Some(Arc::new(SlowStore)), None, config);

        let read = reader.read(Category::Tech, 10, 0).await;
        assert!(read.is_demo());

        let err = reader
            .attempt(reader.primary(), Category::Tech, 10, 0)
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Timeout(Duration::from_millis(50)));
        assert_eq!(err.to_string(), "store did not answer within 50ms");
    }
}
