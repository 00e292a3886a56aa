use std::sync::Arc;

use super::message::{MessageId, OutboundMessage, ScreenPart, UserId};
use super::messenger::{Messenger, MessengerError};
use super::screen::{Screen, ScreenContext, ScreenRegistry};

/// Turns screens into chat messages and cleans up after them.
#[derive(Clone)]
pub struct ScreenRenderer {
    messenger: Arc<dyn Messenger>,
    registry: ScreenRegistry,
}

impl ScreenRenderer {
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self::with_registry(messenger, ScreenRegistry::new())
    }

    pub fn with_registry(messenger: Arc<dyn Messenger>, registry: ScreenRegistry) -> Self {
        Self { messenger, registry }
    }

    /// Sends every part of `screen` in order and returns the new message ids.
    pub async fn render(
        &self,
        user: UserId,
        screen: Screen,
        ctx: &ScreenContext,
    ) -> Result<Vec<MessageId>, MessengerError> {
        let mut ids = Vec::new();
        self.render_into(user, screen, ctx, &mut ids).await?;
        Ok(ids)
    }

    /// Like `render`, but records each id in `block` as soon as it is sent,
    /// so a failure halfway still leaves the delivered messages tracked.
    pub async fn render_into(
        &self,
        user: UserId,
        screen: Screen,
        ctx: &ScreenContext,
        block: &mut Vec<MessageId>,
    ) -> Result<(), MessengerError> {
        for part in self.registry.render(screen, ctx) {
            let id = match part {
                ScreenPart::Message(message) => self.messenger.send(user, &message).await?,
                ScreenPart::ExternalPost { post, fallback } => {
                    match self.messenger.copy_external_post(user, &post).await {
                        Ok(id) => id,
                        Err(e) => {
                            log::warn!(
                                "Failed to copy post {}/{} for user {}: {}. Sending fallback text",
                                post.channel,
                                post.message_id,
                                user,
                                e
                            );
                            self.messenger.send(user, &fallback).await?
                        }
                    }
                }
            };
            block.push(id);
        }
        Ok(())
    }

    /// Deletes every message of the block, ignoring individual failures.
    pub async fn teardown(&self, user: UserId, block: &mut Vec<MessageId>) {
        for message_id in block.drain(..) {
            if let Err(e) = self.messenger.delete(user, message_id).await {
                log::warn!("Failed to delete message {} for user {}: {}", message_id, user, e);
            }
        }
    }

    /// Replaces the screen on display: tears `block` down, then renders
    /// `screen` into it.
    pub async fn transition(
        &self,
        user: UserId,
        block: &mut Vec<MessageId>,
        screen: Screen,
        ctx: &ScreenContext,
    ) -> Result<(), MessengerError> {
        self.teardown(user, block).await;
        log::debug!("Rendering screen {} for user {}", screen, user);
        self.render_into(user, screen, ctx, block).await
    }

    /// Sends one extra message that belongs to the current screen.
    pub async fn append(
        &self,
        user: UserId,
        block: &mut Vec<MessageId>,
        message: &OutboundMessage,
    ) -> Result<MessageId, MessengerError> {
        let id = self.messenger.send(user, message).await?;
        block.push(id);
        Ok(id)
    }
}
