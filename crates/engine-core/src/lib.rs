pub mod coercion;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod orchestrator;
pub mod registry;
pub mod session;
pub mod validator;
