//! Callback data carried by inline buttons.

use std::str::FromStr;

use crate::navigation::{InboundEvent, Screen, BACK_CALLBACK};

/// Callback data of the "back to payment choice" button some older
/// messages still carry.
pub const BACK_JOIN_CALLBACK: &str = "back_join";

/// A parsed button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Open(Screen),
    Back,
    BackToJoin,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            BACK_CALLBACK => Some(Self::Back),
            BACK_JOIN_CALLBACK => Some(Self::BackToJoin),
            other => Screen::from_str(other).ok().map(Self::Open),
        }
    }

    /// Both back buttons walk the stack the same way.
    pub fn event(self) -> InboundEvent {
        match self {
            Self::Open(screen) => InboundEvent::Forward(screen),
            Self::Back | Self::BackToJoin => InboundEvent::Backward,
        }
    }

    /// Locale key of the apology sent when the action fails.
    pub fn failure_key(self) -> &'static str {
        match self {
            Self::Open(Screen::PayCard) => "error-pay-card",
            Self::Open(Screen::PayCrypto) => "error-pay-crypto",
            Self::Open(Screen::Inside) => "error-inside",
            Self::Open(_) => "error-open",
            Self::Back => "error-back",
            Self::BackToJoin => "error-back-join",
        }
    }
}
