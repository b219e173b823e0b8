//! Published range overview
//!
//! The read side shared with the Telegram menu and the status API. The
//! monitor loop is the sole writer: each tick it builds a complete
//! replacement and swaps it in as one Arc, so readers never observe a
//! partially-updated snapshot. `None` means no tick has completed yet
//! (menu shows its "collecting data" placeholder).

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::{Arc, RwLock};

/// One range in the published overview
#[derive(Debug, Clone, Serialize)]
pub struct RangeOverviewEntry {
    pub range: String,
    pub count: u64,
    pub last_service: Option<String>,
}

/// Immutable overview of the last committed tick
#[derive(Debug, Clone, Serialize)]
pub struct RangeOverview {
    pub entries: Vec<RangeOverviewEntry>,
    pub updated_at: DateTime<Utc>,
}

static PUBLISHED: Lazy<RwLock<Option<Arc<RangeOverview>>>> = Lazy::new(|| RwLock::new(None));

/// Swap in a freshly built overview (monitor loop only)
pub fn publish(overview: RangeOverview) {
    if let Ok(mut guard) = PUBLISHED.write() {
        *guard = Some(Arc::new(overview));
    }
}

/// Current overview, if any tick has completed
pub fn current() -> Option<Arc<RangeOverview>> {
    PUBLISHED.read().ok().and_then(|guard| guard.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_replaces_wholesale() {
        publish(RangeOverview {
            entries: vec![RangeOverviewEntry {
                range: "A".to_string(),
                count: 1,
                last_service: None,
            }],
            updated_at: Utc::now(),
        });
        let first = current().expect("published");
        assert_eq!(first.entries.len(), 1);

        publish(RangeOverview {
            entries: vec![],
            updated_at: Utc::now(),
        });
        let second = current().expect("published");
        assert!(second.entries.is_empty());
        // The old Arc is still intact for readers that grabbed it
        assert_eq!(first.entries.len(), 1);
    }
}
