pub mod api;
pub mod auth;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::TrackerError;
pub use crate::core::services::TrackerService;
pub use infrastructure::logging::in_memory::InMemoryLogging;
pub use infrastructure::session::in_memory::InMemorySessions;
pub use infrastructure::storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests;
