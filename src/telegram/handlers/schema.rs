//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::{handle_export_command, handle_start_command};
use super::types::{navigate, private_sender, user_lang, HandlerDeps, HandlerError};
use crate::navigation::InboundEvent;
use crate::telegram::bot::Command;
use crate::telegram::callbacks::CallbackAction;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Order matters: commands win over free text, so `/start` typed while the
/// e-mail prompt is up restarts instead of failing validation.
///
/// # Arguments
/// * `deps` - Handler dependencies (navigator, database pool)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_text = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(text_handler(deps_text))
        .branch(callback_handler(deps_callback))
}

/// Handler for bot commands, private chats only
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private())
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                    let deps = deps.clone();
                    async move {
                        log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);

                        match cmd {
                            Command::Start => handle_start_command(&bot, &msg, &deps).await?,
                            Command::Export => handle_export_command(&bot, &msg, &deps).await?,
                        }
                        Ok(())
                    }
                }),
        )
}

/// Handler for free text in private chats
fn text_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private() && msg.text().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let Some(user) = private_sender(&msg) else {
                    return Ok(());
                };
                let text = msg.text().unwrap_or_default().to_string();
                let lang = user_lang(msg.from.as_ref());
                navigate(&bot, &deps, user, &lang, InboundEvent::Text(text), "error-text").await;
                Ok(())
            }
        })
}

/// Handler for callback queries (inline keyboard buttons)
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            // Stops the spinner on the client whatever happens next
            if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
                log::warn!("Failed to answer callback query {:?}: {}", q.id, e);
            }

            let Ok(user) = i64::try_from(q.from.id.0) else {
                return Ok(());
            };
            let Some(action) = q.data.as_deref().and_then(CallbackAction::parse) else {
                log::warn!("Unknown callback data {:?} from user {}", q.data, user);
                return Ok(());
            };

            let lang = user_lang(Some(&q.from));
            navigate(&bot, &deps, user, &lang, action.event(), action.failure_key()).await;
            Ok(())
        }
    })
}
