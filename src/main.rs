use anyhow::Result;
use dotenvy::dotenv;
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;

use tubecomy::cli::{Cli, Commands};
use tubecomy::core::{config, export, init_logger, web_server, Offer};
use tubecomy::navigation::{Navigator, ScreenRenderer, SessionStore};
use tubecomy::storage::{create_pool, SqliteContactStore};
use tubecomy::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps, TelegramMessenger};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, configuration,
/// database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present, before any config is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run { webhook }) => run_bot(webhook).await,
        Some(Commands::ExportContacts { output }) => run_export(output),
        None => run_bot(false).await,
    }
}

/// Writes the contact CSV to `output`, or stdout.
fn run_export(output: Option<PathBuf>) -> Result<()> {
    let db_pool = Arc::new(create_pool(&config::DATABASE_PATH)?);
    let (csv, count) = export::export_contacts(&db_pool)?;

    match output {
        Some(path) => {
            std::fs::write(&path, csv)?;
            log::info!("Wrote {} contact(s) to {}", count, path.display());
        }
        None => std::io::stdout().write_all(csv.as_bytes())?,
    }
    Ok(())
}

async fn run_bot(use_webhook: bool) -> Result<()> {
    log::info!("Starting bot...");

    let offer = Arc::new(Offer::from_env()?);
    log::info!("Offer: {} for {}", offer.price, offer.period);

    let db_pool = Arc::new(create_pool(&config::DATABASE_PATH)?);

    let bot = create_bot()?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let sessions = SessionStore::new();
    sessions.spawn_eviction_task(config::session::eviction_interval(), config::session::idle_timeout());

    let renderer = ScreenRenderer::new(Arc::new(TelegramMessenger::new(bot.clone())));
    let contacts = Arc::new(SqliteContactStore::new(Arc::clone(&db_pool)));
    let navigator = Navigator::new(renderer, contacts, sessions.clone(), offer);

    let handler = schema(HandlerDeps::new(navigator, Arc::clone(&db_pool)));

    let webhook_url = if use_webhook { config::WEBHOOK_URL.clone() } else { None };
    if use_webhook && webhook_url.is_none() {
        log::warn!("--webhook given but WEBHOOK_URL is not set, falling back to long polling");
    }

    if let Some(url) = webhook_url {
        let url = url::Url::parse(&url)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], *config::WEB_PORT));
        log::info!("Starting bot in webhook mode at {} (listening on {})", url, addr);

        let (listener, stop_flag, router) = webhooks::axum_to_router(bot.clone(), webhooks::Options::new(addr, url)).await?;
        let app = router.merge(web_server::health_router(sessions));

        let tcp = tokio::net::TcpListener::bind(addr).await?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(tcp, app).with_graceful_shutdown(stop_flag).await {
                log::error!("Web server error: {}", e);
            }
        });

        Dispatcher::builder(bot, handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    } else {
        use teloxide::update_listeners::Polling;

        log::info!("Starting bot in long polling mode");
        let _ = bot.delete_webhook().await;
        let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

        Dispatcher::builder(bot, handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    }

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
