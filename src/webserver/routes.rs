//! Route handlers for the status API

use crate::arguments::is_debug_webserver_enabled;
use crate::errors::FetchError;
use crate::logger::{self, LogTag};
use crate::monitor::snapshot;
use crate::portal::types::SnapshotFetcher;
use crate::utils::portal_date_today;
use crate::version::VERSION;
use crate::webserver::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Build the full router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_status))
        .route("/api/health", get(health_check))
        .route("/api/status", get(system_status))
        .route("/api/sms", get(on_demand_counters))
        .with_state(state)
}

/// Root status, mirroring the original service's shape
#[derive(Debug, Serialize)]
struct RootStatus {
    status: &'static str,
    login: bool,
}

/// GET /
async fn root_status(State(state): State<Arc<AppState>>) -> Json<RootStatus> {
    Json(RootStatus {
        status: "smswatch running",
        login: state.portal.is_logged_in(),
    })
}

/// Simple health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: chrono::DateTime<Utc>,
    version: &'static str,
}

/// GET /api/health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        version: VERSION,
    })
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    login: bool,
    uptime_seconds: i64,
    ranges_tracked: usize,
    overview_updated_at: Option<chrono::DateTime<Utc>>,
}

/// GET /api/status
async fn system_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let overview = snapshot::current();
    Json(StatusResponse {
        login: state.portal.is_logged_in(),
        uptime_seconds: (Utc::now() - state.startup_time).num_seconds(),
        ranges_tracked: overview.as_ref().map(|o| o.entries.len()).unwrap_or(0),
        overview_updated_at: overview.map(|o| o.updated_at),
    })
}

#[derive(Debug, Deserialize)]
struct SmsQuery {
    /// Portal date (DD/MM/YYYY), defaults to today
    date: Option<String>,
    /// Maximum number of ranges returned
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// GET /api/sms?date=DD/MM/YYYY&limit=N
///
/// On-demand counter fetch: a direct call into the portal client,
/// independent of the monitor loop's state.
async fn on_demand_counters(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SmsQuery>,
) -> Response {
    let date = query.date.unwrap_or_else(portal_date_today);

    if is_debug_webserver_enabled() {
        logger::debug(
            LogTag::Webserver,
            &format!("On-demand counter fetch for {} (limit={:?})", date, query.limit),
        );
    }

    match state.portal.fetch_counters(&date).await {
        Ok(mut snapshots) => {
            if let Some(limit) = query.limit {
                snapshots.truncate(limit);
            }
            Json(snapshots).into_response()
        }
        Err(FetchError::Auth(e)) => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                error: format!("not logged in: {}", e),
            }),
        )
            .into_response(),
        Err(FetchError::Upstream(e)) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}
