/// Shared application state for the status API
use crate::portal::PortalClient;
use std::sync::Arc;

/// State passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    /// Shared portal client, for login status and on-demand queries
    pub portal: Arc<PortalClient>,
    /// Server startup time, for uptime reporting
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(portal: Arc<PortalClient>) -> Self {
        Self {
            portal,
            startup_time: chrono::Utc::now(),
        }
    }
}
