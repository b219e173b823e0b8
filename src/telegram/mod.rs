//! Telegram integration for smswatch
//!
//! Two independent halves:
//! - Outbound: [`TelegramNotifier`], the production [`NotificationSink`]
//!   behind arrival notifications.
//! - Inbound: a manual `getUpdates` polling loop routing the /start,
//!   /stats and /help commands plus the stats refresh callback. Handlers
//!   only read the published range overview, never the monitor loop's
//!   private state.
//!
//! Commands are only served to the configured chat; everything else is
//! ignored with a warning.

pub mod commands;
pub mod keyboards;
pub mod notifier;
pub mod polling;

pub use notifier::TelegramNotifier;
pub use polling::start_polling;
