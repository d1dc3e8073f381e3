//! In-memory storage primitives backing the ledger services.

pub mod append_log;
pub mod table;

pub use append_log::AppendLog;
pub use table::{Staged, Table};
