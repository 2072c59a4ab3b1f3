//! Costsim Storage
//!
//! Implementations of the `HistoryStore` port:
//!
//! ```text
//! SqliteStore   sqlx + SQLite, one table per record type, ms timestamps
//! MemoryStore   Vecs behind a RwLock, for tests and ephemeral runs
//! ```

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
