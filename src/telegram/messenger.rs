//! Bot API implementation of the `Messenger` capability.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode, Recipient};

use crate::navigation::{
    ButtonAction, ExternalPost, Keyboard, Media, MessageId, Messenger, MessengerError, OutboundMessage, UserId,
};

/// Sends screens through the Bot API. Texts are HTML.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn transport(e: teloxide::RequestError) -> MessengerError {
    MessengerError::Transport(Box::new(e))
}

/// Converts a keyboard into Bot API inline markup.
pub fn to_inline_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|button| match &button.action {
                ButtonAction::Callback(data) => InlineKeyboardButton::callback(button.label.clone(), data.clone()),
                ButtonAction::Url(url) => InlineKeyboardButton::url(button.label.clone(), url.clone()),
            })
            .collect::<Vec<_>>()
    }))
}

/// `@username` channels go by name, everything else is a numeric chat id.
pub fn channel_recipient(channel: &str) -> Recipient {
    match channel.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(channel.to_string()),
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, user: UserId, message: &OutboundMessage) -> Result<MessageId, MessengerError> {
        let chat_id = ChatId(user);
        let markup = message.keyboard.as_ref().map(to_inline_markup);

        let sent = match &message.media {
            Some(Media::Photo(url)) => {
                let mut request = self
                    .bot
                    .send_photo(chat_id, InputFile::url(url.clone()))
                    .caption(message.text.clone())
                    .parse_mode(ParseMode::Html);
                if let Some(markup) = markup {
                    request = request.reply_markup(markup);
                }
                request.await
            }
            None => {
                let mut request = self
                    .bot
                    .send_message(chat_id, message.text.clone())
                    .parse_mode(ParseMode::Html);
                if let Some(markup) = markup {
                    request = request.reply_markup(markup);
                }
                request.await
            }
        }
        .map_err(transport)?;

        Ok(sent.id.0)
    }

    async fn delete(&self, user: UserId, message_id: MessageId) -> Result<(), MessengerError> {
        self.bot
            .delete_message(ChatId(user), teloxide::types::MessageId(message_id))
            .await
            .map_err(transport)?;
        Ok(())
    }

    async fn copy_external_post(&self, user: UserId, post: &ExternalPost) -> Result<MessageId, MessengerError> {
        let copied = self
            .bot
            .copy_message(
                ChatId(user),
                channel_recipient(&post.channel),
                teloxide::types::MessageId(post.message_id),
            )
            .await
            .map_err(transport)?;
        Ok(copied.0)
    }
}
