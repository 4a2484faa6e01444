pub mod document;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use document::DocumentStore;
pub use memory::MemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SQLiteStore;
