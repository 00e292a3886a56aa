//! Handler types, dependencies, and the shared navigation helper

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{Message, User};
use unic_langid::LanguageIdentifier;

use crate::i18n;
use crate::navigation::{InboundEvent, Navigator, UserId};
use crate::storage::db::DbPool;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub navigator: Navigator,
    pub db_pool: Arc<DbPool>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(navigator: Navigator, db_pool: Arc<DbPool>) -> Self {
        Self { navigator, db_pool }
    }
}

/// Interface language of the sender.
pub fn user_lang(user: Option<&User>) -> LanguageIdentifier {
    i18n::lang_from_code(user.and_then(|u| u.language_code.as_deref()))
}

/// Session owner of a message: its sender, and only in a private chat.
///
/// Screens live in the user's private chat, where the chat id equals the
/// user id that callbacks carry. Messages from groups or channels get `None`.
pub fn private_sender(msg: &Message) -> Option<UserId> {
    if !msg.chat.is_private() {
        return None;
    }
    msg.from.as_ref().and_then(|u| i64::try_from(u.id.0).ok())
}

/// Runs one navigation event for a user.
///
/// Failures never reach the dispatcher: they are logged and the user gets
/// the apology stored under `failure_key`, best effort.
///
/// # Arguments
/// * `bot` - Bot used for the apology
/// * `deps` - Handler dependencies
/// * `user` - User id (equals the private chat id)
/// * `lang` - Language of the apology and of the rendered screen
/// * `event` - What the user did
/// * `failure_key` - Locale key of the apology
pub async fn navigate(
    bot: &Bot,
    deps: &HandlerDeps,
    user: i64,
    lang: &LanguageIdentifier,
    event: InboundEvent,
    failure_key: &str,
) {
    log::debug!("User {} -> {:?}", user, event);

    if let Err(e) = deps.navigator.handle(user, lang, event).await {
        log::error!("Navigation failed for user {}: {}", user, e);
        if let Err(e) = bot.send_message(ChatId(user), i18n::t(lang, failure_key)).await {
            log::warn!("Failed to send apology to user {}: {}", user, e);
        }
    }
}
