//! Screen navigation: what the user sees and how they move between screens.
//!
//! Nothing in this module talks to Telegram directly; outbound traffic goes
//! through the [`Messenger`] trait and e-mails through
//! [`ContactStore`](crate::storage::ContactStore).

pub mod message;
pub mod messenger;
pub mod navigator;
pub mod renderer;
pub mod screen;
pub mod session;
pub mod stack;

pub use message::{Button, ButtonAction, ExternalPost, Keyboard, Media, MessageId, OutboundMessage, ScreenPart, UserId};
pub use messenger::{Messenger, MessengerError};
pub use navigator::{InboundEvent, Navigator, Outcome, FALLBACK_SCREEN};
pub use renderer::ScreenRenderer;
pub use screen::{RenderFn, Screen, ScreenContext, ScreenRegistry, BACK_CALLBACK};
pub use session::{Session, SessionStore};
pub use stack::NavigationStack;
