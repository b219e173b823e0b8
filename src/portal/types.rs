//! Data records and the fetcher contract consumed by the monitor loop.

use crate::errors::{AuthError, FetchError};
use async_trait::async_trait;
use serde::Serialize;

/// Arrival counter for one phone-number range at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSnapshot {
    /// Opaque range label as reported by the portal, e.g. "Russian (+7)"
    pub range: String,
    /// Number of messages received for the range on the queried date
    pub count: u64,
}

/// Most recent arrival detail for a range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalDetail {
    pub phone_number: String,
    pub message: String,
}

/// Read-side contract against the upstream portal
///
/// All operations are idempotent reads. `login` establishes (or
/// re-establishes) the session; the fetch operations fail with
/// `FetchError::Auth` once the session expires, which sends the monitor
/// loop back to authentication.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    /// Establish a portal session from stored cookie material
    async fn login(&self) -> Result<(), AuthError>;

    /// Current per-range arrival counters for a date (DD/MM/YYYY)
    async fn fetch_counters(&self, date: &str) -> Result<Vec<RangeSnapshot>, FetchError>;

    /// The single most recent arrival for a range, if any detail is
    /// currently retrievable (the portal may have cleared it already)
    async fn fetch_top_arrival(
        &self,
        range: &str,
        date: &str,
    ) -> Result<Option<ArrivalDetail>, FetchError>;
}
