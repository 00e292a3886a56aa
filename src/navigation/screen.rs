//! Screens and how each one is drawn.
//!
//! ```text
//!   Main ──► Join ──► PayCard
//!    │  ▲      ▲  └──► PayCrypto
//!    │  │      │
//!    │  └─ Email (only until an e-mail is stored)
//!    ▼
//!   Inside ──► Join
//! ```
//!
//! Every screen except `Main` carries a "back" button; back walks the
//! navigation stack instead of a fixed edge.

use fluent_templates::fluent_bundle::FluentArgs;
use std::collections::HashMap;
use std::sync::Arc;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use unic_langid::LanguageIdentifier;

use super::message::{Button, Keyboard, Media, OutboundMessage, ScreenPart};
use crate::core::config::Offer;
use crate::i18n;

/// Callback data of every "back" button.
pub const BACK_CALLBACK: &str = "back";

/// A named UI state. The string form doubles as callback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Screen {
    Main,
    Email,
    Join,
    PayCard,
    PayCrypto,
    Inside,
}

impl Screen {
    /// Transient screens exist to collect one piece of durable state and are
    /// skipped for good once it is stored.
    pub fn is_transient(self) -> bool {
        matches!(self, Screen::Email)
    }

    /// Where a push of this screen lands once its state is already resolved.
    pub fn resolved_target(self) -> Screen {
        match self {
            Screen::Email => Screen::Join,
            other => other,
        }
    }
}

/// Everything a render function may show.
#[derive(Debug, Clone)]
pub struct ScreenContext {
    pub offer: Arc<Offer>,
    /// The user's stored e-mail, if any
    pub email: Option<String>,
    pub lang: LanguageIdentifier,
}

/// Draws one screen.
pub type RenderFn = fn(&ScreenContext) -> Vec<ScreenPart>;

/// Maps each screen to its render function.
///
/// Defaults cover every variant; `register` swaps one out (custom texts,
/// tests) without touching the dispatch.
#[derive(Clone, Default)]
pub struct ScreenRegistry {
    overrides: HashMap<Screen, RenderFn>,
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, screen: Screen, render: RenderFn) -> Self {
        self.overrides.insert(screen, render);
        self
    }

    pub fn renderer(&self, screen: Screen) -> RenderFn {
        self.overrides
            .get(&screen)
            .copied()
            .unwrap_or_else(|| default_renderer(screen))
    }

    pub fn render(&self, screen: Screen, ctx: &ScreenContext) -> Vec<ScreenPart> {
        (self.renderer(screen))(ctx)
    }
}

fn default_renderer(screen: Screen) -> RenderFn {
    match screen {
        Screen::Main => render_main,
        Screen::Email => render_email,
        Screen::Join => render_join,
        Screen::PayCard => render_pay_card,
        Screen::PayCrypto => render_pay_crypto,
        Screen::Inside => render_inside,
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn price_args(offer: &Offer) -> FluentArgs<'static> {
    let mut args = FluentArgs::new();
    args.set("price", escape_html(&offer.price));
    args.set("period", escape_html(&offer.period));
    args.set("support", escape_html(&offer.support_handle));
    args
}

fn back_button(lang: &LanguageIdentifier) -> Button {
    Button::callback(i18n::t(lang, "back-button"), BACK_CALLBACK)
}

fn render_main(ctx: &ScreenContext) -> Vec<ScreenPart> {
    let lang = &ctx.lang;
    let keyboard = Keyboard::new()
        .row(Button::callback(i18n::t(lang, "main-join-button"), Screen::Join.to_string()))
        .row(Button::callback(i18n::t(lang, "main-inside-button"), Screen::Inside.to_string()))
        .row(Button::url(i18n::t(lang, "main-support-button"), ctx.offer.support_url.clone()));

    let mut message =
        OutboundMessage::text(i18n::t_args(lang, "main-text", &price_args(&ctx.offer))).with_keyboard(keyboard);
    if let Some(banner) = &ctx.offer.main_banner {
        message = message.with_media(Media::Photo(banner.clone()));
    }

    vec![ScreenPart::Message(message)]
}

fn render_email(ctx: &ScreenContext) -> Vec<ScreenPart> {
    let message =
        OutboundMessage::text(i18n::t(&ctx.lang, "email-text")).with_keyboard(Keyboard::new().row(back_button(&ctx.lang)));
    vec![ScreenPart::Message(message)]
}

fn render_join(ctx: &ScreenContext) -> Vec<ScreenPart> {
    let lang = &ctx.lang;
    let mut args = FluentArgs::new();
    args.set("email", escape_html(ctx.email.as_deref().unwrap_or("—")));

    let keyboard = Keyboard::new()
        .row(Button::callback(i18n::t(lang, "join-card-button"), Screen::PayCard.to_string()))
        .row(Button::callback(i18n::t(lang, "join-crypto-button"), Screen::PayCrypto.to_string()))
        .row(back_button(lang));

    vec![ScreenPart::Message(
        OutboundMessage::text(i18n::t_args(lang, "join-text", &args)).with_keyboard(keyboard),
    )]
}

fn render_pay_card(ctx: &ScreenContext) -> Vec<ScreenPart> {
    let lang = &ctx.lang;
    let keyboard = Keyboard::new()
        .row(Button::url(i18n::t(lang, "pay-card-button"), ctx.offer.pay_card_url.clone()))
        .row(back_button(lang));

    vec![ScreenPart::Message(
        OutboundMessage::text(i18n::t_args(lang, "pay-card-text", &price_args(&ctx.offer))).with_keyboard(keyboard),
    )]
}

fn render_pay_crypto(ctx: &ScreenContext) -> Vec<ScreenPart> {
    let lang = &ctx.lang;
    let keyboard = Keyboard::new()
        .row(Button::url(i18n::t(lang, "pay-crypto-button"), ctx.offer.pay_crypto_url.clone()))
        .row(back_button(lang));

    vec![ScreenPart::Message(
        OutboundMessage::text(i18n::t_args(lang, "pay-crypto-text", &price_args(&ctx.offer))).with_keyboard(keyboard),
    )]
}

fn render_inside(ctx: &ScreenContext) -> Vec<ScreenPart> {
    let lang = &ctx.lang;
    let fallback = OutboundMessage::text(i18n::t(lang, "inside-fallback"));
    let showcase = match &ctx.offer.inside_post {
        Some(post) => ScreenPart::ExternalPost {
            post: post.clone(),
            fallback,
        },
        None => ScreenPart::Message(fallback),
    };

    let keyboard = Keyboard::new()
        .row(Button::callback(i18n::t(lang, "main-join-button"), Screen::Join.to_string()))
        .row(back_button(lang));

    vec![
        showcase,
        ScreenPart::Message(OutboundMessage::text(i18n::t(lang, "inside-text")).with_keyboard(keyboard)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::message::{ButtonAction, ExternalPost};
    use std::str::FromStr;
    use strum::IntoEnumIterator;
    use url::Url;

    fn offer() -> Offer {
        Offer {
            price: "990 ₽".to_string(),
            period: "30 дней".to_string(),
            support_handle: "@help".to_string(),
            support_url: Url::parse("https://t.me/help").unwrap(),
            pay_card_url: Url::parse("https://pay.example.com/card").unwrap(),
            pay_crypto_url: Url::parse("https://pay.example.com/crypto").unwrap(),
            inside_post: None,
            main_banner: None,
        }
    }

    fn ctx(offer: Offer, email: Option<&str>) -> ScreenContext {
        ScreenContext {
            offer: Arc::new(offer),
            email: email.map(str::to_string),
            lang: i18n::DEFAULT_LANG,
        }
    }

    fn only_message(parts: Vec<ScreenPart>) -> OutboundMessage {
        assert_eq!(parts.len(), 1);
        match parts.into_iter().next() {
            Some(ScreenPart::Message(m)) => m,
            other => panic!("expected a plain message, got {:?}", other),
        }
    }

    #[test]
    fn test_screen_names_roundtrip() {
        assert_eq!(Screen::PayCard.to_string(), "pay_card");
        let name: &str = Screen::PayCrypto.as_ref();
        assert_eq!(name, "pay_crypto");
        for screen in Screen::iter() {
            assert_eq!(Screen::from_str(screen.as_ref()).unwrap(), screen);
        }
        assert!(Screen::from_str("settings").is_err());
    }

    #[test]
    fn test_only_email_is_transient() {
        let transient: Vec<Screen> = Screen::iter().filter(|s| s.is_transient()).collect();
        assert_eq!(transient, vec![Screen::Email]);
        assert_eq!(Screen::Email.resolved_target(), Screen::Join);
        assert_eq!(Screen::Inside.resolved_target(), Screen::Inside);
    }

    #[test]
    fn test_every_screen_renders_something() {
        let registry = ScreenRegistry::new();
        let ctx = ctx(offer(), Some("a@b.co"));
        for screen in Screen::iter() {
            assert!(!registry.render(screen, &ctx).is_empty(), "{} rendered nothing", screen);
        }
    }

    #[test]
    fn test_main_keyboard() {
        let message = only_message(ScreenRegistry::new().render(Screen::Main, &ctx(offer(), None)));

        assert!(message.text.contains("990 ₽"));
        assert!(message.media.is_none());
        let keyboard = message.keyboard.unwrap();
        assert_eq!(keyboard.callbacks(), vec!["join", "inside"]);
        assert!(matches!(&keyboard.rows[2][0].action, ButtonAction::Url(u) if u.as_str() == "https://t.me/help"));
    }

    #[test]
    fn test_main_with_banner_is_photo() {
        let mut offer = offer();
        offer.main_banner = Some(Url::parse("https://cdn.example.com/b.jpg").unwrap());
        let message = only_message(ScreenRegistry::new().render(Screen::Main, &ctx(offer, None)));

        assert!(matches!(message.media, Some(Media::Photo(_))));
    }

    #[test]
    fn test_non_main_screens_have_back() {
        let registry = ScreenRegistry::new();
        let ctx = ctx(offer(), Some("a@b.co"));
        for screen in Screen::iter().filter(|s| *s != Screen::Main) {
            let has_back = registry.render(screen, &ctx).iter().any(|part| match part {
                ScreenPart::Message(m) => m
                    .keyboard
                    .as_ref()
                    .is_some_and(|k| k.callbacks().contains(&BACK_CALLBACK)),
                ScreenPart::ExternalPost { .. } => false,
            });
            assert!(has_back, "{} has no back button", screen);
        }
    }

    #[test]
    fn test_join_shows_email_escaped() {
        let message = only_message(ScreenRegistry::new().render(Screen::Join, &ctx(offer(), Some("a@b.co"))));
        assert!(message.text.contains("a@b.co"));
        assert_eq!(message.keyboard.unwrap().callbacks(), vec!["pay_card", "pay_crypto", "back"]);
    }

    #[test]
    fn test_pay_screens_link_to_payment() {
        let registry = ScreenRegistry::new();
        let ctx = ctx(offer(), Some("a@b.co"));

        let card = only_message(registry.render(Screen::PayCard, &ctx));
        assert!(matches!(
            &card.keyboard.unwrap().rows[0][0].action,
            ButtonAction::Url(u) if u.as_str() == "https://pay.example.com/card"
        ));

        let crypto = only_message(registry.render(Screen::PayCrypto, &ctx));
        assert!(crypto.text.contains("@help"));
        assert!(matches!(
            &crypto.keyboard.unwrap().rows[0][0].action,
            ButtonAction::Url(u) if u.as_str() == "https://pay.example.com/crypto"
        ));
    }

    #[test]
    fn test_inside_copies_post_when_configured() {
        let mut offer = offer();
        offer.inside_post = Some(ExternalPost {
            channel: "@tubecomy".to_string(),
            message_id: 3,
        });
        let parts = ScreenRegistry::new().render(Screen::Inside, &ctx(offer, None));

        assert_eq!(parts.len(), 2);
        assert!(matches!(&parts[0], ScreenPart::ExternalPost { post, .. } if post.message_id == 3));
        assert!(matches!(&parts[1], ScreenPart::Message(m) if m.keyboard.is_some()));
    }

    #[test]
    fn test_inside_without_post_sends_static_text() {
        let parts = ScreenRegistry::new().render(Screen::Inside, &ctx(offer(), None));
        assert!(matches!(&parts[0], ScreenPart::Message(m) if m.keyboard.is_none()));
    }

    #[test]
    fn test_price_is_html_escaped() {
        let mut offer = offer();
        offer.price = "<990>".to_string();
        let message = only_message(ScreenRegistry::new().render(Screen::PayCard, &ctx(offer, None)));
        assert!(message.text.contains("&lt;990&gt;"));
    }

    #[test]
    fn test_register_overrides_one_screen() {
        fn custom(_: &ScreenContext) -> Vec<ScreenPart> {
            vec![ScreenPart::Message(OutboundMessage::text("custom"))]
        }
        let registry = ScreenRegistry::new().register(Screen::Inside, custom);
        let ctx = ctx(offer(), None);

        assert_eq!(only_message(registry.render(Screen::Inside, &ctx)).text, "custom");
        assert_ne!(only_message(registry.render(Screen::Email, &ctx)).text, "custom");
    }
}
