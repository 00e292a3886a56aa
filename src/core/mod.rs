//! Core utilities, configuration, and common functionality

pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod validation;
pub mod web_server;

// Re-exports for convenience
pub use config::Offer;
pub use error::{AppError, AppResult};
pub use logging::init_logger;
