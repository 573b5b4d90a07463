//! Persistence adapters.

mod sqlite;

pub use sqlite::{MIGRATIONS, SqliteStore};
