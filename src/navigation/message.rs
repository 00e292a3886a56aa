//! Transport-neutral description of what a screen sends.
//!
//! Nothing here knows about teloxide; `telegram::messenger` turns these into
//! Bot API requests.

use url::Url;

/// Stable user key. In a private chat the chat id equals the user id.
pub type UserId = i64;

/// Identifier of a message the bot sent.
pub type MessageId = i32;

/// One outbound message: text, optional inline keyboard, optional media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// HTML-formatted text (caption when `media` is set)
    pub text: String,
    pub keyboard: Option<Keyboard>,
    pub media: Option<Media>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            media: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn with_media(mut self, media: Media) -> Self {
        self.media = Some(media);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Media {
    Photo(Url),
}

/// Inline keyboard, row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row holding a single button.
    pub fn row(mut self, button: Button) -> Self {
        self.rows.push(vec![button]);
        self
    }

    /// Every callback payload on the keyboard, in layout order.
    pub fn callbacks(&self) -> Vec<&str> {
        self.rows
            .iter()
            .flatten()
            .filter_map(|b| match &b.action {
                ButtonAction::Callback(data) => Some(data.as_str()),
                ButtonAction::Url(_) => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

impl Button {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }

    pub fn url(label: impl Into<String>, url: Url) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Url(url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Sent back to the bot as callback data
    Callback(String),
    /// Opens a link on the client
    Url(Url),
}

/// A post in some channel that a screen copies into the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalPost {
    /// `@username` or numeric chat id of the channel
    pub channel: String,
    pub message_id: MessageId,
}

/// One piece of a rendered screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenPart {
    /// Must be delivered; a failure aborts the render
    Message(OutboundMessage),
    /// Best effort: if the copy fails, `fallback` is sent instead
    ExternalPost {
        post: ExternalPost,
        fallback: OutboundMessage,
    },
}
