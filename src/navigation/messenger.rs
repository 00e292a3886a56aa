use async_trait::async_trait;
use thiserror::Error;

use super::message::{ExternalPost, MessageId, OutboundMessage, UserId};

/// Failure of a single outbound chat operation.
#[derive(Debug, Error)]
pub enum MessengerError {
    /// The transport rejected or failed the request
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Outbound chat capability used by the screen renderer.
///
/// Implementations must be cheap to share: one instance serves every user.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends a message and returns its id.
    async fn send(&self, user: UserId, message: &OutboundMessage) -> Result<MessageId, MessengerError>;

    /// Deletes a message. Callers treat failures as harmless (already gone,
    /// too old, no rights).
    async fn delete(&self, user: UserId, message_id: MessageId) -> Result<(), MessengerError>;

    /// Copies a channel post into the user's chat and returns the new id.
    async fn copy_external_post(&self, user: UserId, post: &ExternalPost) -> Result<MessageId, MessengerError>;
}
