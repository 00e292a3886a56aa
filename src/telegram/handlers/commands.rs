//! Command handler implementations (/start, /export)

use fluent_templates::fluent_bundle::FluentArgs;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{InputFile, Message};

use super::types::{navigate, private_sender, user_lang, HandlerDeps, HandlerError};
use crate::core::config;
use crate::core::error::AppError;
use crate::core::export::export_contacts;
use crate::i18n;
use crate::navigation::InboundEvent;

/// Handle /start command
pub(super) async fn handle_start_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(user) = private_sender(msg) else {
        return Ok(());
    };
    let lang = user_lang(msg.from.as_ref());
    navigate(bot, deps, user, &lang, InboundEvent::SessionStart, "error-start").await;
    Ok(())
}

/// Handle /export command: every captured contact as a CSV document
pub(super) async fn handle_export_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let lang = user_lang(msg.from.as_ref());
    let user_id = msg.from.as_ref().and_then(|u| i64::try_from(u.id.0).ok()).unwrap_or(0);

    if !config::admin::is_admin(user_id) {
        log::warn!("User {} tried /export without admin rights", user_id);
        bot.send_message(msg.chat.id, i18n::t(&lang, "export-forbidden")).await?;
        return Ok(());
    }

    let db_pool = Arc::clone(&deps.db_pool);
    let export = match tokio::task::spawn_blocking(move || export_contacts(&db_pool)).await {
        Ok(result) => result,
        Err(e) => Err(AppError::from(e)),
    };
    let (csv, count) = match export {
        Ok(export) => export,
        Err(e) => {
            log::error!("Contact export failed: {}", e);
            bot.send_message(msg.chat.id, i18n::t(&lang, "export-failed")).await?;
            return Ok(());
        }
    };

    if count == 0 {
        bot.send_message(msg.chat.id, i18n::t(&lang, "export-empty")).await?;
        return Ok(());
    }

    let mut args = FluentArgs::new();
    args.set("count", count);
    let filename = format!("contacts_{}.csv", chrono::Utc::now().format("%Y%m%d_%H%M%S"));

    bot.send_document(msg.chat.id, InputFile::memory(csv.into_bytes()).file_name(filename))
        .caption(i18n::t_args(&lang, "export-caption", &args))
        .await?;
    log::info!("Sent {} contact(s) to admin {}", count, user_id);

    Ok(())
}
