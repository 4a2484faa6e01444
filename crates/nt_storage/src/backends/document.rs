use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nt_core::{Article, ArticleStore, Category, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One JSON document per article, named after a digest of its URL.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDocument {
    #[serde(flatten)]
    article: Article,
    processed_at: DateTime<Utc>,
}

/// Document-oriented secondary store living in a directory. It has no
/// cursor support, so every listing is the head ordered by publish time.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.root.join(format!("{}.json", hex::encode(digest)))
    }

    async fn load_all(&self) -> StoreResult<Vec<Article>> {
        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(|e| {
            StoreError::Unavailable(format!("{}: {}", self.root.display(), e))
        })?;

        let mut articles = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => return Err(StoreError::Query(e.to_string())),
            };
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(StoreError::Query(e.to_string())),
            };
            match serde_json::from_slice::<StoredDocument>(&bytes) {
                Ok(doc) => articles.push(doc.article.normalized()),
                Err(e) => warn!(path = %path.display(), "Skipping unreadable document: {}", e),
            }
        }
        Ok(articles)
    }

    async fn listing(&self, category: Category, limit: usize) -> StoreResult<Vec<Article>> {
        let mut articles = self.load_all().await?;
        articles.retain(|article| category.admits(article.category));
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        articles.truncate(limit);
        Ok(articles)
    }
}

#[async_trait]
impl ArticleStore for DocumentStore {
    fn name(&self) -> &str {
        "documents"
    }

    async fn query_by_category(
        &self,
        category: Category,
        limit: usize,
        _offset: usize,
    ) -> StoreResult<Vec<Article>> {
        self.listing(category, limit).await
    }

    async fn query_all(&self, limit: usize, _offset: usize) -> StoreResult<Vec<Article>> {
        self.listing(Category::General, limit).await
    }

    async fn upsert(&self, article: &Article) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut article = article.clone().normalized();
        if article.id.is_empty() {
            article.id = hex::encode(Sha256::digest(article.url.as_bytes()));
        }
        let doc = StoredDocument {
            article,
            processed_at: Utc::now(),
        };
        let bytes = serde_json::to_vec_pretty(&doc)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        tokio::fs::write(self.document_path(&doc.article.url), bytes)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::article;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_document_store_ignores_offset() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        for (id, hours) in [("a", 1), ("b", 2), ("c", 3)] {
            store.upsert(&article(id, Category::Hospitality, hours)).await.unwrap();
        }
        store.upsert(&article("d", Category::Tech, 4)).await.unwrap();

        let head = store.query(Category::Hospitality, 2, 0).await.unwrap();
        let again = store.query(Category::Hospitality, 2, 2).await.unwrap();
        assert_eq!(head, again);
        assert_eq!(head.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), ["c", "b"]);

        let all = store.query(Category::General, 10, 0).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].id, "d");
    }

    #[tokio::test]
    async fn test_document_store_upserts_by_url() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        let mut doc = article("a", Category::Farming, 1);
        store.upsert(&doc).await.unwrap();
        doc.title = "Second take".to_string();
        store.upsert(&doc).await.unwrap();

        let rows = store.query_all(10, 0).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Second take");
    }

    #[tokio::test]
    async fn test_missing_directory_is_unavailable() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("missing"));
        assert!(matches!(
            store.query(Category::Tech, 5, 0).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
