//! Common test utilities
//!
//! `Harness` wires a real `Navigator` to the in-process mocks, the same way
//! `main` wires it to Telegram and SQLite.

#![allow(dead_code)]

use std::sync::Arc;

use tubecomy::core::config::Offer;
use tubecomy::i18n;
use tubecomy::navigation::{
    InboundEvent, MessageId, Navigator, Outcome, Screen, ScreenRenderer, SessionStore, UserId,
};

use crate::mocks::{MemoryContactStore, RecordingMessenger};

pub const USER: UserId = 1001;
pub const OTHER_USER: UserId = 2002;

/// Offer used across tests, with an "inside" post configured.
pub fn test_offer() -> Offer {
    Offer::from_lookup(|key| {
        let value = match key {
            "PAY_CARD_URL" => "https://pay.example.com/card",
            "PAY_CRYPTO_URL" => "https://pay.example.com/crypto",
            "PRICE" => "990 ₽",
            "PERIOD" => "30 дней",
            "SUPPORT_HANDLE" => "@tubecomy_support",
            "INSIDE_POST" => "@tubecomy/42",
            _ => return None,
        };
        Some(value.to_string())
    })
    .unwrap()
}

pub struct Harness {
    pub navigator: Navigator,
    pub messenger: Arc<RecordingMessenger>,
    pub contacts: Arc<MemoryContactStore>,
    pub sessions: SessionStore,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_contacts(MemoryContactStore::new())
    }

    pub fn with_contacts(contacts: MemoryContactStore) -> Self {
        let messenger = Arc::new(RecordingMessenger::new());
        let contacts = Arc::new(contacts);
        let sessions = SessionStore::new();
        let renderer = ScreenRenderer::new(messenger.clone());
        let navigator = Navigator::new(renderer, contacts.clone(), sessions.clone(), Arc::new(test_offer()));

        Self {
            navigator,
            messenger,
            contacts,
            sessions,
        }
    }

    /// Runs one event in the default language and expects it to succeed.
    pub async fn send(&self, user: UserId, event: InboundEvent) -> Outcome {
        self.navigator
            .handle(user, &i18n::DEFAULT_LANG, event)
            .await
            .unwrap()
    }

    pub async fn start(&self, user: UserId) -> Outcome {
        self.send(user, InboundEvent::SessionStart).await
    }

    pub async fn forward(&self, user: UserId, screen: Screen) -> Outcome {
        self.send(user, InboundEvent::Forward(screen)).await
    }

    pub async fn back(&self, user: UserId) -> Outcome {
        self.send(user, InboundEvent::Backward).await
    }

    pub async fn text(&self, user: UserId, text: &str) -> Outcome {
        self.send(user, InboundEvent::Text(text.to_string())).await
    }

    pub async fn stack(&self, user: UserId) -> Vec<Screen> {
        self.sessions.lock(user).await.stack.screens().to_vec()
    }

    pub async fn rendered(&self, user: UserId) -> Vec<MessageId> {
        self.sessions.lock(user).await.rendered.clone()
    }

    /// What the chat shows is exactly what the session believes it shows.
    pub async fn assert_no_drift(&self, user: UserId) {
        assert_eq!(
            self.messenger.visible(user),
            self.rendered(user).await,
            "chat and rendered block disagree"
        );
    }
}
