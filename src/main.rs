use smswatch::{
    arguments::{is_help_requested, print_help},
    config,
    logger::{self, LogTag},
    monitor::MonitorEngine,
    portal::{PortalClient, SnapshotFetcher},
    telegram::{self, TelegramNotifier},
    version::VERSION,
    webserver::{self, AppState},
};
use std::sync::Arc;
use tokio::sync::Notify;

/// Main entry point for smswatch
///
/// Startup order: logger → config → portal client → background tasks
/// (monitor loop, Telegram command handler) → status API in the
/// foreground. Ctrl-C notifies all tasks and the server drains.
#[tokio::main]
async fn main() {
    logger::init();

    if is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    logger::info(LogTag::System, &format!("🚀 smswatch {} starting up", VERSION));

    if let Err(e) = config::load_config() {
        logger::error(LogTag::System, &format!("Config error: {}", e));
        std::process::exit(1);
    }

    let portal = match PortalClient::from_config() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            logger::error(LogTag::System, &format!("Portal client error: {}", e));
            std::process::exit(1);
        }
    };

    let notifier = match TelegramNotifier::from_config() {
        Ok(notifier) => Arc::new(notifier),
        Err(e) => {
            logger::error(
                LogTag::System,
                &format!(
                    "Telegram not configured ({}). Set [telegram] bot_token and chat_id \
                     or the TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID environment variables.",
                    e
                ),
            );
            std::process::exit(1);
        }
    };

    // First login attempt is best-effort; the monitor loop keeps retrying
    match portal.login().await {
        Ok(()) => {}
        Err(e) => logger::warning(
            LogTag::System,
            &format!("Initial portal login failed, monitor will retry: {}", e),
        ),
    }

    let shutdown = Arc::new(Notify::new());
    {
        let shutdown = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            shutdown.notify_waiters();
        }) {
            logger::warning(LogTag::System, &format!("Failed to set ctrl-c handler: {}", e));
        }
    }

    let engine = MonitorEngine::new(portal.clone(), notifier);
    let monitor_handle = tokio::spawn(engine.run(shutdown.clone()));

    let telegram_handle = match telegram::start_polling(shutdown.clone()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            logger::warning(
                LogTag::System,
                &format!("Telegram command handler not started: {}", e),
            );
            None
        }
    };

    let state = Arc::new(AppState::new(portal));
    if let Err(e) = webserver::start_server(state, shutdown.clone()).await {
        logger::error(LogTag::System, &format!("Webserver failed: {}", e));
        shutdown.notify_waiters();
    }

    // Server returned: shutdown in progress, wait for background tasks
    let _ = monitor_handle.await;
    if let Some(handle) = telegram_handle {
        let _ = handle.await;
    }

    logger::info(LogTag::System, "✅ smswatch stopped");
    logger::flush();
}
