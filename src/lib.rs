//! TubeComy - Telegram bot of a paid community
//!
//! The bot shows a handful of inline-keyboard screens, collects the user's
//! e-mail once and hands them over to an external payment page.
//!
//! # Module Structure
//!
//! - `navigation`: screens, the per-user navigation stack and rendering
//! - `storage`: SQLite pool, migrations and the contact store
//! - `telegram`: Bot API messenger, dispatcher schema and commands
//! - `core`: configuration, errors, logging, validation, export, health

pub mod cli;
pub mod core;
pub mod i18n;
pub mod navigation;
pub mod storage;
pub mod telegram;

// Re-exports for convenience
pub use crate::core::{config, AppError, AppResult};
pub use crate::navigation::{InboundEvent, Navigator, Screen, SessionStore};
pub use crate::storage::{create_pool, get_connection, DbConnection, DbPool};
