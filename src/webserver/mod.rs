//! Status API
//!
//! Thin, read-only HTTP surface: health/status plus an on-demand counter
//! query that goes straight to the portal client, not through the
//! monitor loop's state.

pub mod routes;
pub mod server;
pub mod state;

pub use server::start_server;
pub use state::AppState;
