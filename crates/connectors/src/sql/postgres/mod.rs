pub mod adapter;
pub mod transaction;
pub(crate) mod utils;
