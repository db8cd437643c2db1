//! In-process store used by tests and `memory://` runs.

pub mod adapter;
pub mod transaction;

pub use adapter::MemoryAdapter;
pub use transaction::MemoryTransaction;
