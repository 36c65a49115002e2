//! SQLite destination

mod writer;

pub use writer::{quote_identifier, PendingWrite, SqliteWriter};
