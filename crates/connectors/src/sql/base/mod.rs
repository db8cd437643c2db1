pub mod adapter;
pub mod dialect;
pub mod error;
pub mod query;
pub mod transaction;
