use nt_core::ArticleStore;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub mod backends;
pub mod demo;
pub mod fallback;
pub mod import;

#[cfg(test)]
mod test_support;

pub use backends::*;
pub use demo::demo_articles;
pub use fallback::{FallbackConfig, FallbackRead, FallbackReader, Tier};
pub use import::{upsert_everywhere, ImportReport};

/// Opens the SQLite primary store. A store that cannot be opened is logged
/// and left out; reads then go straight to the next tier.
#[cfg(feature = "sqlite")]
pub async fn open_primary(path: Option<&Path>) -> Option<Arc<dyn ArticleStore>> {
    let path = path?;
    match SQLiteStore::new_with_path(path).await {
        Ok(store) => {
            info!("🏦 Primary store ready at {}", path.display());
            Some(Arc::new(store))
        }
        Err(e) => {
            warn!("Primary store at {} is unavailable: {}", path.display(), e);
            None
        }
    }
}

#[cfg(not(feature = "sqlite"))]
pub async fn open_primary(path: Option<&Path>) -> Option<Arc<dyn ArticleStore>> {
    if let Some(path) = path {
        warn!("Built without sqlite support, ignoring {}", path.display());
    }
    None
}

pub fn open_secondary(dir: Option<&Path>) -> Option<Arc<dyn ArticleStore>> {
    let dir = dir?;
    info!("📂 Secondary document store at {}", dir.display());
    Some(Arc::new(DocumentStore::new(dir)))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::fallback::{FallbackConfig, FallbackReader, Tier};
}
