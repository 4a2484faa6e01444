use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use nt_core::{Article, ArticleStore, Category, Importance, Sentiment, StoreError, StoreResult};

/// Article `id` published `hours` after a fixed instant; larger is newer.
pub fn article(id: &str, category: Category, hours: i64) -> Article {
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    Article {
        id: id.to_string(),
        external_id: None,
        title: format!("Article {}", id),
        description: Some("Description".to_string()),
        content: None,
        url: format!("https://example.com/{}", id),
        image_url: None,
        published_at: base + Duration::hours(hours),
        source: "test".to_string(),
        category,
        summary: vec!["first point".to_string(), "second point".to_string()],
        sentiment: Sentiment::Neutral,
        importance: Importance::Medium,
    }
}

pub struct FailingStore;

#[async_trait]
impl ArticleStore for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    async fn query_by_category(&self, _: Category, _: usize, _: usize) -> StoreResult<Vec<Article>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn query_all(&self, _: usize, _: usize) -> StoreResult<Vec<Article>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn upsert(&self, _: &Article) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

pub struct SlowStore;

#[async_trait]
impl ArticleStore for SlowStore {
    fn name(&self) -> &str {
        "slow"
    }

    async fn query_by_category(&self, category: Category, _: usize, _: usize) -> StoreResult<Vec<Article>> {
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        Ok(vec![article("late", category, 1)])
    }

    async fn query_all(&self, _: usize, _: usize) -> StoreResult<Vec<Article>> {
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        Ok(vec![article("late", Category::General, 1)])
    }

    async fn upsert(&self, _: &Article) -> StoreResult<()> {
        Ok(())
    }
}
