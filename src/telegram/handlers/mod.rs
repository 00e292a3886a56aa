//! Telegram bot handler tree configuration
//!
//! This module provides the dispatcher schema for the bot. The handlers are
//! organized so integration tests can drive the same handler tree as
//! production code.

mod commands;
mod schema;
mod types;

pub use schema::schema;
pub use types::{navigate, private_sender, user_lang, HandlerDeps, HandlerError};
