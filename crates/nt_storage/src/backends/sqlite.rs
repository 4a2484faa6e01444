use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use nt_core::{Article, ArticleStore, Category, StoreError, StoreResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    INSERT OR IGNORE INTO categories (name)
    VALUES ('farming'), ('tech'), ('politics'), ('hospitality'), ('general')
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        external_id TEXT,
        title TEXT NOT NULL,
        description TEXT,
        content TEXT,
        url TEXT NOT NULL UNIQUE,
        image_url TEXT,
        published_at TEXT NOT NULL,
        source TEXT NOT NULL,
        category_id INTEGER NOT NULL REFERENCES categories(id),
        summary TEXT NOT NULL DEFAULT '[]',
        sentiment TEXT NOT NULL DEFAULT 'neutral',
        importance TEXT NOT NULL DEFAULT 'medium',
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_articles_published_at ON articles (published_at DESC)
    "#,
    // Add future migrations here
];

const SELECT_COLUMNS: &str = r#"
    SELECT a.id, a.external_id, a.title, a.description, a.content, a.url,
           a.image_url, a.published_at, a.source, a.summary, a.sentiment,
           a.importance, c.name AS category_name
    FROM articles a
    JOIN categories c ON a.category_id = c.id
"#;

/// Row-oriented primary store backed by a SQLite file.
pub struct SQLiteStore {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

impl SQLiteStore {
    pub async fn new_with_path(db_path: &Path) -> nt_core::Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| nt_core::Error::Database(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| nt_core::Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn query_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            StoreError::Unavailable(e.to_string())
        }
        other => StoreError::Query(other.to_string()),
    }
}

fn decode<T>(row: &SqliteRow, column: &str) -> StoreResult<T>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| StoreError::Decode(format!("{}: {}", column, e)))
}

fn row_to_article(row: &SqliteRow) -> StoreResult<Article> {
    let published_at: String = decode(row, "published_at")?;
    let published_at = DateTime::parse_from_rfc3339(&published_at)
        .map_err(|e| StoreError::Decode(format!("published_at: {}", e)))?
        .with_timezone(&Utc);
    let summary: String = decode(row, "summary")?;
    let summary: Vec<String> = serde_json::from_str(&summary)
        .map_err(|e| StoreError::Decode(format!("summary: {}", e)))?;
    let category: String = decode(row, "category_name")?;
    let sentiment: String = decode(row, "sentiment")?;
    let importance: String = decode(row, "importance")?;

    let article = Article {
        id: decode::<i64>(row, "id")?.to_string(),
        external_id: decode(row, "external_id")?,
        title: decode(row, "title")?,
        description: decode(row, "description")?,
        content: decode(row, "content")?,
        url: decode(row, "url")?,
        image_url: decode(row, "image_url")?,
        published_at,
        source: decode(row, "source")?,
        category: category
            .parse()
            .map_err(|e: nt_core::Error| StoreError::Decode(e.to_string()))?,
        summary,
        sentiment: sentiment
            .parse()
            .map_err(|e: nt_core::Error| StoreError::Decode(e.to_string()))?,
        importance: importance
            .parse()
            .map_err(|e: nt_core::Error| StoreError::Decode(e.to_string()))?,
    };
    Ok(article.normalized())
}

#[async_trait]
impl ArticleStore for SQLiteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn query_by_category(
        &self,
        category: Category,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Article>> {
        let sql = format!(
            "{} WHERE c.name = ? ORDER BY a.published_at DESC LIMIT ? OFFSET ?",
            SELECT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(category.as_str())
            .bind(to_sql_int(limit))
            .bind(to_sql_int(offset))
            .fetch_all(&*self.pool)
            .await
            .map_err(query_error)?;

        rows.iter().map(row_to_article).collect()
    }

    async fn query_all(&self, limit: usize, offset: usize) -> StoreResult<Vec<Article>> {
        let sql = format!(
            "{} ORDER BY a.published_at DESC LIMIT ? OFFSET ?",
            SELECT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(to_sql_int(limit))
            .bind(to_sql_int(offset))
            .fetch_all(&*self.pool)
            .await
            .map_err(query_error)?;

        rows.iter().map(row_to_article).collect()
    }

    async fn upsert(&self, article: &Article) -> StoreResult<()> {
        let summary = serde_json::to_string(&article.summary)
            .map_err(|e| StoreError::Query(format!("summary: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO articles
            (external_id, title, description, content, url, image_url,
             published_at, source, category_id, summary, sentiment, importance)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?,
                    (SELECT id FROM categories WHERE name = ?), ?, ?, ?)
            ON CONFLICT (url) DO UPDATE
            SET title = excluded.title,
                description = excluded.description,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(article.external_id.as_deref())
        .bind(&article.title)
        .bind(article.description.as_deref())
        .bind(article.content.as_deref())
        .bind(&article.url)
        .bind(article.image_url.as_deref())
        .bind(article.published_at.to_rfc3339_opts(SecondsFormat::Secs, true))
        .bind(&article.source)
        .bind(article.category.as_str())
        .bind(summary)
        .bind(article.sentiment.as_str())
        .bind(article.importance.as_str())
        .execute(&*self.pool)
        .await
        .map_err(query_error)?;

        Ok(())
    }
}

/// SQLite treats a negative OFFSET as zero, so out-of-range values saturate
/// instead of wrapping.
fn to_sql_int(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
