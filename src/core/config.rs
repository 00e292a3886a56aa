use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;
use url::Url;

use crate::core::error::{AppError, AppResult};
use crate::navigation::ExternalPost;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: tubecomy.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "tubecomy.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: tubecomy.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "tubecomy.log".to_string()));

/// Webhook URL for Telegram updates
/// Read from WEBHOOK_URL environment variable
pub static WEBHOOK_URL: Lazy<Option<String>> = Lazy::new(|| non_empty(env::var("WEBHOOK_URL").ok()));

/// Port for the webhook listener and the /health endpoint
/// Read from WEB_PORT (or PORT, as set by most PaaS) environment variable
/// Default: 8080
pub static WEB_PORT: Lazy<u16> = Lazy::new(|| {
    env::var("WEB_PORT")
        .or_else(|_| env::var("PORT"))
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(8080)
});

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Per-user navigation session configuration
pub mod session {
    use super::Duration;
    use once_cell::sync::Lazy;
    use std::env;

    /// Sessions untouched for this many hours are dropped by the eviction task
    /// Read from SESSION_IDLE_HOURS environment variable
    static IDLE_HOURS: Lazy<u64> = Lazy::new(|| {
        env::var("SESSION_IDLE_HOURS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(72)
    });

    /// How often the eviction task runs (in seconds)
    pub const EVICTION_INTERVAL_SECS: u64 = 60 * 60;

    pub fn idle_timeout() -> Duration {
        Duration::from_secs(*IDLE_HOURS * 60 * 60)
    }

    pub fn eviction_interval() -> Duration {
        Duration::from_secs(EVICTION_INTERVAL_SECS)
    }
}

/// Admin configuration
pub mod admin {
    use once_cell::sync::Lazy;
    use std::env;

    pub(crate) fn parse_admin_ids(raw: &str) -> Vec<i64> {
        raw.split([',', ' ', '\n', '\t'])
            .filter_map(|part| part.trim().parse::<i64>().ok())
            .collect()
    }

    /// Admin user IDs (comma-separated)
    /// Read from ADMIN_IDS environment variable
    pub static ADMIN_IDS: Lazy<Vec<i64>> = Lazy::new(|| {
        env::var("ADMIN_IDS")
            .ok()
            .map(|raw| parse_admin_ids(&raw))
            .unwrap_or_default()
    });

    pub fn is_admin(user_id: i64) -> bool {
        ADMIN_IDS.contains(&user_id)
    }
}

/// What the community sells and where to pay for it.
///
/// Everything a screen needs besides the user's own e-mail. Loaded once at
/// startup; a bad value is a configuration error and stops the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub price: String,
    pub period: String,
    pub support_handle: String,
    pub support_url: Url,
    pub pay_card_url: Url,
    pub pay_crypto_url: Url,
    /// Channel post copied into the chat on the "inside" screen
    pub inside_post: Option<ExternalPost>,
    /// Optional picture sent with the main screen
    pub main_banner: Option<Url>,
}

impl Offer {
    /// Reads the offer from the process environment.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the offer from an arbitrary key lookup (env, tests).
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));
        let required_url = |key: &str| -> AppResult<Url> {
            let raw = get(key).ok_or_else(|| AppError::Config(format!("{} is not set", key)))?;
            Url::parse(&raw).map_err(|e| AppError::Config(format!("{} is not a valid URL ({}): {}", key, raw, e)))
        };

        let support_handle = get("SUPPORT_HANDLE").unwrap_or_else(|| "@tubecomy_support".to_string());
        let support_url = support_url(&support_handle)?;

        let inside_post = get("INSIDE_POST").map(|raw| parse_external_post(&raw)).transpose()?;
        let main_banner = get("MAIN_BANNER_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| AppError::Config(format!("MAIN_BANNER_URL is not a valid URL: {}", e)))
            })
            .transpose()?;

        Ok(Self {
            price: get("PRICE").unwrap_or_else(|| "990 ₽".to_string()),
            period: get("PERIOD").unwrap_or_else(|| "30 дней".to_string()),
            support_handle,
            support_url,
            pay_card_url: required_url("PAY_CARD_URL")?,
            pay_crypto_url: required_url("PAY_CRYPTO_URL")?,
            inside_post,
            main_banner,
        })
    }
}

/// Turns `@handle`, `handle` or a full link into a t.me URL.
fn support_url(handle: &str) -> AppResult<Url> {
    if handle.starts_with("http://") || handle.starts_with("https://") {
        return Url::parse(handle).map_err(|e| AppError::Config(format!("SUPPORT_HANDLE is not a valid URL: {}", e)));
    }
    let name = handle.trim_start_matches('@');
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AppError::Config(format!("SUPPORT_HANDLE is not a Telegram username: {}", handle)));
    }
    Url::parse(&format!("https://t.me/{}", name)).map_err(|e| AppError::Config(e.to_string()))
}

/// Parses `<channel>/<message_id>`, e.g. `@tubecomy/42` or `-1001234567890/7`.
pub(crate) fn parse_external_post(raw: &str) -> AppResult<ExternalPost> {
    let (channel, message_id) = raw
        .trim()
        .rsplit_once('/')
        .ok_or_else(|| AppError::Config(format!("INSIDE_POST must look like <channel>/<message_id>: {}", raw)))?;

    let message_id = message_id
        .parse::<i32>()
        .map_err(|_| AppError::Config(format!("INSIDE_POST has a bad message id: {}", raw)))?;

    let channel = channel.trim_start_matches("https://t.me/");
    if channel.is_empty() {
        return Err(AppError::Config(format!("INSIDE_POST has no channel: {}", raw)));
    }
    let channel = if channel.starts_with('@') || channel.parse::<i64>().is_ok() {
        channel.to_string()
    } else {
        format!("@{}", channel)
    };

    Ok(ExternalPost { channel, message_id })
}
