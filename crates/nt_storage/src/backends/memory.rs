use async_trait::async_trait;
use nt_core::{Article, ArticleStore, Category, StoreResult};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local store. Honours offsets and upserts by URL like the row
/// store does, which makes it a stand-in for it in tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    articles: Arc<RwLock<Vec<Article>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_articles(articles: Vec<Article>) -> StoreResult<Self> {
        let store = Self::new();
        for article in &articles {
            store.upsert(article).await?;
        }
        Ok(store)
    }

    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }

    async fn listing(&self, category: Category, limit: usize, offset: usize) -> Vec<Article> {
        let mut articles = self
            .articles
            .read()
            .await
            .iter()
            .filter(|article| category.admits(article.category))
            .cloned()
            .collect::<Vec<_>>();
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        articles.into_iter().skip(offset).take(limit).collect()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn query_by_category(
        &self,
        category: Category,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Article>> {
        Ok(self.listing(category, limit, offset).await)
    }

    async fn query_all(&self, limit: usize, offset: usize) -> StoreResult<Vec<Article>> {
        Ok(self.listing(Category::General, limit, offset).await)
    }

    async fn upsert(&self, article: &Article) -> StoreResult<()> {
        let mut articles = self.articles.write().await;
        let article = article.clone().normalized();
        if let Some(existing) = articles.iter_mut().find(|a| a.url == article.url) {
            *existing = article;
        } else {
            articles.push(article);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::article;

    #[tokio::test]
    async fn test_memory_store_pages_newest_first() {
        let store = MemoryStore::with_articles(vec![
            article("a", Category::Tech, 1),
            article("b", Category::Tech, 3),
            article("c", Category::Farming, 2),
            article("d", Category::Tech, 2),
        ])
        .await
        .unwrap();

        let first = store.query(Category::Tech, 2, 0).await.unwrap();
        assert_eq!(first.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), ["b", "d"]);
        let second = store.query(Category::Tech, 2, 2).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, "a");

        let all = store.query(Category::General, 10, 0).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_memory_store_upserts_by_url() {
        let store = MemoryStore::new();
        let mut original = article("a", Category::Politics, 1);
        store.upsert(&original).await.unwrap();
        original.title = "Updated".to_string();
        store.upsert(&original).await.unwrap();

        assert_eq!(store.len().await, 1);
        let rows = store.query(Category::Politics, 5, 0).await.unwrap();
        assert_eq!(rows[0].title, "Updated");
    }
}
