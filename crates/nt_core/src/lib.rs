pub mod error;
pub mod logging;
pub mod pagination;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use pagination::PageRequest;
pub use storage::{ArticleStore, StoreError, StoreResult};
pub use types::{Article, Category, Importance, Sentiment};

pub mod prelude {
    pub use crate::storage::{ArticleStore, StoreError, StoreResult};
    pub use crate::types::{Article, Category, Importance, Sentiment};
    pub use crate::{Error, PageRequest, Result};
}
