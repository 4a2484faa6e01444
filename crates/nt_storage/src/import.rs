use nt_core::{Article, ArticleStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub stored: usize,
    pub failed: usize,
}

/// Upserts every article into every store. A failure against one store is
/// logged and counted; it does not stop the others.
pub async fn upsert_everywhere(stores: &[Arc<dyn ArticleStore>], articles: &[Article]) -> ImportReport {
    let mut report = ImportReport::default();
    for article in articles {
        for store in stores {
            match store.upsert(article).await {
                Ok(()) => report.stored += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(store = store.name(), url = %article.url, "Failed to store article: {}", e);
                }
            }
        }
    }
    info!("💾 Stored {} article copies ({} failed)", report.stored, report.failed);
    report
}
