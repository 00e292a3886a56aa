//! The single entry point of the screen flow.
//!
//! The transport classifies an update into an [`InboundEvent`]; the
//! navigator locks the user's session, consults the contact store, moves the
//! stack and asks the renderer to swap what is on screen. The session guard
//! is held until the render finished, so the stack top and the messages on
//! display never drift apart.

use std::sync::Arc;
use unic_langid::LanguageIdentifier;

use super::message::{OutboundMessage, UserId};
use super::renderer::ScreenRenderer;
use super::screen::{Screen, ScreenContext};
use super::session::SessionStore;
use crate::core::config::Offer;
use crate::core::error::AppResult;
use crate::core::validation::validate_email;
use crate::i18n;
use crate::storage::ContactStore;

/// What the user did, stripped of transport details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// `/start`
    SessionStart,
    /// A button that opens a screen
    Forward(Screen),
    /// The "back" button
    Backward,
    /// Any other text message
    Text(String),
}

/// How an event ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// This screen is now on display and on top of the stack
    Shown(Screen),
    /// The text was not an e-mail; the prompt stays, an error was appended
    EmailRejected,
}

/// Where "back" lands when there is nothing left to go back to.
pub const FALLBACK_SCREEN: Screen = Screen::Main;

#[derive(Clone)]
pub struct Navigator {
    renderer: ScreenRenderer,
    contacts: Arc<dyn ContactStore>,
    sessions: SessionStore,
    offer: Arc<Offer>,
}

impl Navigator {
    pub fn new(
        renderer: ScreenRenderer,
        contacts: Arc<dyn ContactStore>,
        sessions: SessionStore,
        offer: Arc<Offer>,
    ) -> Self {
        Self {
            renderer,
            contacts,
            sessions,
            offer,
        }
    }

    pub async fn handle(&self, user: UserId, lang: &LanguageIdentifier, event: InboundEvent) -> AppResult<Outcome> {
        match event {
            InboundEvent::SessionStart => self.session_start(user, lang).await,
            InboundEvent::Forward(screen) => self.forward(user, lang, screen).await,
            InboundEvent::Backward => self.backward(user, lang).await,
            InboundEvent::Text(text) => self.text(user, lang, &text).await,
        }
    }

    /// Clears the history and shows the main screen.
    pub async fn session_start(&self, user: UserId, lang: &LanguageIdentifier) -> AppResult<Outcome> {
        let mut session = self.sessions.lock(user).await;
        let email = self.contacts.get_email(user).await?;

        session.stack.reset();
        let screen = session.stack.push(Screen::Main, email.is_some());

        let ctx = self.context(email, lang);
        let session = &mut *session;
        self.renderer.transition(user, &mut session.rendered, screen, &ctx).await?;
        Ok(Outcome::Shown(screen))
    }

    /// Opens `screen`. Joining without a stored e-mail asks for the e-mail
    /// first.
    pub async fn forward(&self, user: UserId, lang: &LanguageIdentifier, screen: Screen) -> AppResult<Outcome> {
        let mut session = self.sessions.lock(user).await;
        let email = self.contacts.get_email(user).await?;

        let requested = match screen {
            Screen::Join if email.is_none() => Screen::Email,
            other => other,
        };
        let screen = session.stack.push(requested, email.is_some());

        let ctx = self.context(email, lang);
        let session = &mut *session;
        self.renderer.transition(user, &mut session.rendered, screen, &ctx).await?;
        Ok(Outcome::Shown(screen))
    }

    /// Goes back one screen, skipping the e-mail prompt once it is answered.
    pub async fn backward(&self, user: UserId, lang: &LanguageIdentifier) -> AppResult<Outcome> {
        let mut session = self.sessions.lock(user).await;
        let email = self.contacts.get_email(user).await?;

        let screen = session.stack.pop(FALLBACK_SCREEN, email.is_some());

        let ctx = self.context(email, lang);
        let session = &mut *session;
        self.renderer.transition(user, &mut session.rendered, screen, &ctx).await?;
        Ok(Outcome::Shown(screen))
    }

    /// Handles free text: an e-mail answer while the prompt is up, anything
    /// else sends the user home.
    pub async fn text(&self, user: UserId, lang: &LanguageIdentifier, text: &str) -> AppResult<Outcome> {
        let mut session = self.sessions.lock(user).await;
        let session = &mut *session;

        if session.stack.peek() != Some(Screen::Email) {
            let email = self.contacts.get_email(user).await?;
            session.stack.reset();
            let screen = session.stack.push(FALLBACK_SCREEN, email.is_some());

            let ctx = self.context(email, lang);
            self.renderer.transition(user, &mut session.rendered, screen, &ctx).await?;
            return Ok(Outcome::Shown(screen));
        }

        let email = match validate_email(text) {
            Ok(email) => email,
            Err(e) => {
                log::debug!("User {} sent an invalid e-mail: {}", user, e);
                let reply = OutboundMessage::text(i18n::t(lang, "email-invalid"));
                self.renderer.append(user, &mut session.rendered, &reply).await?;
                return Ok(Outcome::EmailRejected);
            }
        };

        self.contacts.save_email(user, email).await?;
        log::info!("Stored e-mail for user {}", user);

        session.stack.drop_transient_top();
        let screen = session.stack.push(Screen::Join, true);

        let ctx = self.context(Some(email.to_string()), lang);
        self.renderer.transition(user, &mut session.rendered, screen, &ctx).await?;
        Ok(Outcome::Shown(screen))
    }

    /// Screen on top of the user's stack.
    pub async fn peek(&self, user: UserId) -> Option<Screen> {
        self.sessions.lock(user).await.stack.peek()
    }

    fn context(&self, email: Option<String>, lang: &LanguageIdentifier) -> ScreenContext {
        ScreenContext {
            offer: Arc::clone(&self.offer),
            email,
            lang: lang.clone(),
        }
    }
}
