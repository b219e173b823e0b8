//! Monitor loop: poll, diff, enrich, dispatch, commit
//!
//! One engine instance owns the per-range state map; nothing else writes
//! it. The loop is a simple state machine — Authenticating → Polling →
//! Processing → Sleeping — that runs until process shutdown. No failure
//! is fatal: auth loss re-authenticates indefinitely, upstream failures
//! back off, delivery failures are dropped.

pub mod detector;
pub mod snapshot;

use crate::config::with_config;
use crate::errors::FetchError;
use crate::logger::{self, LogTag};
use crate::notifications::{ArrivalEvent, Dispatcher, NotificationSink};
use crate::portal::types::SnapshotFetcher;
use crate::resolver;
use crate::utils::{check_shutdown_or_delay, portal_date_today};
use detector::RangeState;
use snapshot::{RangeOverview, RangeOverviewEntry};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// What a single tick amounted to, for loop pacing
#[derive(Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Counters fetched and processed; normal sleep follows
    Processed { increased: usize, notified: usize },
    /// Session died; go back to authentication
    AuthRequired,
    /// Counter fetch failed transiently; longer backoff follows
    UpstreamFailure,
}

/// The monitoring engine
///
/// Generic over the fetcher and sink so tests can drive a full tick with
/// in-memory doubles.
pub struct MonitorEngine<F: SnapshotFetcher, S: NotificationSink> {
    fetcher: Arc<F>,
    dispatcher: Dispatcher<S>,
    ranges: HashMap<String, RangeState>,
    authenticated: bool,
}

impl<F: SnapshotFetcher, S: NotificationSink> MonitorEngine<F, S> {
    pub fn new(fetcher: Arc<F>, sink: Arc<S>) -> Self {
        Self {
            fetcher,
            dispatcher: Dispatcher::new(sink),
            ranges: HashMap::new(),
            authenticated: false,
        }
    }

    /// Committed per-range state (primarily for tests)
    pub fn ranges(&self) -> &HashMap<String, RangeState> {
        &self.ranges
    }

    /// Run one complete tick: fetch, diff, enrich, dispatch, commit
    ///
    /// The updated counter map commits even when detail fetching aborts
    /// on auth loss; re-flagging already-notified ranges next tick would
    /// break the at-most-once delivery policy (see DESIGN.md).
    pub async fn tick(&mut self, date: &str) -> TickOutcome {
        let counters = match self.fetcher.fetch_counters(date).await {
            Ok(counters) => counters,
            Err(FetchError::Auth(e)) => {
                logger::warning(LogTag::Monitor, &format!("Session lost: {}", e));
                self.authenticated = false;
                return TickOutcome::AuthRequired;
            }
            Err(FetchError::Upstream(e)) => {
                logger::warning(LogTag::Monitor, &format!("Counter fetch failed: {}", e));
                return TickOutcome::UpstreamFailure;
            }
        };

        let (mut updated, increased) = detector::diff(&self.ranges, &counters);
        if !increased.is_empty() {
            logger::debug(
                LogTag::Monitor,
                &format!("{} range(s) with new arrivals", increased.len()),
            );
        }

        let mut notified = 0;
        let mut auth_lost = false;

        for range in &increased {
            match self.fetcher.fetch_top_arrival(range, date).await {
                Ok(Some(detail)) => {
                    let event = ArrivalEvent {
                        range: range.clone(),
                        phone_number: detail.phone_number,
                        message: detail.message,
                    };
                    let country = resolver::resolve_country(range);
                    let service = resolver::resolve_service(&event.message);

                    if let Some(state) = updated.get_mut(range) {
                        state.last_service = Some(service.to_string());
                    }

                    match self.dispatcher.dispatch(&event, &country, service).await {
                        Ok(()) => {
                            notified += 1;
                            logger::info(
                                LogTag::Monitor,
                                &format!(
                                    "Notified arrival: {} {} ({})",
                                    country.flag, range, service
                                ),
                            );
                        }
                        Err(e) => {
                            // Dropped by design: one failed delivery must not
                            // stall the tick or the ranges behind it
                            logger::warning(
                                LogTag::Monitor,
                                &format!("Delivery failed for '{}': {}", range, e),
                            );
                        }
                    }
                }
                Ok(None) => {
                    logger::debug(
                        LogTag::Monitor,
                        &format!("No detail retrievable for '{}'", range),
                    );
                }
                Err(FetchError::Auth(e)) => {
                    logger::warning(
                        LogTag::Monitor,
                        &format!("Session lost mid-tick at '{}': {}", range, e),
                    );
                    self.authenticated = false;
                    auth_lost = true;
                    break;
                }
                Err(FetchError::Upstream(e)) => {
                    logger::warning(
                        LogTag::Monitor,
                        &format!("Detail fetch failed for '{}', skipping: {}", range, e),
                    );
                }
            }
        }

        // Commit, then publish the read-side overview atomically
        self.ranges = updated;
        self.publish_overview(&counters);

        if auth_lost {
            TickOutcome::AuthRequired
        } else {
            TickOutcome::Processed {
                increased: increased.len(),
                notified,
            }
        }
    }

    /// Build and swap in the overview for menu/status readers
    fn publish_overview(&self, counters: &[crate::portal::types::RangeSnapshot]) {
        let entries = counters
            .iter()
            .map(|snap| RangeOverviewEntry {
                range: snap.range.clone(),
                count: snap.count,
                last_service: self
                    .ranges
                    .get(&snap.range)
                    .and_then(|state| state.last_service.clone()),
            })
            .collect();

        snapshot::publish(RangeOverview {
            entries,
            updated_at: chrono::Utc::now(),
        });
    }

    /// Drive the engine until shutdown
    pub async fn run(mut self, shutdown: Arc<Notify>) {
        let (poll_interval, auth_retry, error_backoff) = with_config(|c| {
            (
                Duration::from_secs(c.monitor.poll_interval_secs),
                Duration::from_secs(c.monitor.auth_retry_secs),
                Duration::from_secs(c.monitor.error_backoff_secs),
            )
        });

        logger::info(LogTag::Monitor, "Monitor engine started");

        loop {
            if !self.authenticated {
                match self.fetcher.login().await {
                    Ok(()) => {
                        self.authenticated = true;
                        logger::info(LogTag::Monitor, "Authenticated against portal");
                    }
                    Err(e) => {
                        logger::warning(
                            LogTag::Monitor,
                            &format!("Authentication failed, retrying: {}", e),
                        );
                        if check_shutdown_or_delay(&shutdown, auth_retry).await {
                            break;
                        }
                        continue;
                    }
                }
            }

            let date = portal_date_today();
            let delay = match self.tick(&date).await {
                TickOutcome::Processed { .. } => poll_interval,
                // Head straight back to authentication after a brief pause
                TickOutcome::AuthRequired => auth_retry,
                TickOutcome::UpstreamFailure => error_backoff,
            };

            if check_shutdown_or_delay(&shutdown, delay).await {
                break;
            }
        }

        logger::info(LogTag::Monitor, "Monitor engine shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AuthError, DeliveryError, UpstreamError};
    use crate::portal::types::{ArrivalDetail, RangeSnapshot};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted fetcher double: one counter snapshot per tick, a fixed
    /// detail per range, and counters for call assertions
    struct ScriptedFetcher {
        ticks: Mutex<Vec<Vec<RangeSnapshot>>>,
        details: HashMap<String, ArrivalDetail>,
        detail_calls: Mutex<Vec<String>>,
        detail_auth_failures: Mutex<HashMap<String, usize>>,
    }

    impl ScriptedFetcher {
        fn new(ticks: Vec<Vec<RangeSnapshot>>) -> Self {
            Self {
                ticks: Mutex::new(ticks),
                details: HashMap::new(),
                detail_calls: Mutex::new(Vec::new()),
                detail_auth_failures: Mutex::new(HashMap::new()),
            }
        }

        fn with_detail(mut self, range: &str, phone: &str, message: &str) -> Self {
            self.details.insert(
                range.to_string(),
                ArrivalDetail {
                    phone_number: phone.to_string(),
                    message: message.to_string(),
                },
            );
            self
        }

        fn detail_calls(&self) -> Vec<String> {
            self.detail_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SnapshotFetcher for ScriptedFetcher {
        async fn login(&self) -> Result<(), AuthError> {
            Ok(())
        }

        async fn fetch_counters(&self, _date: &str) -> Result<Vec<RangeSnapshot>, FetchError> {
            let mut ticks = self.ticks.lock().unwrap();
            if ticks.is_empty() {
                return Err(FetchError::Upstream(UpstreamError::Malformed {
                    endpoint: "test".to_string(),
                    message: "script exhausted".to_string(),
                }));
            }
            Ok(ticks.remove(0))
        }

        async fn fetch_top_arrival(
            &self,
            range: &str,
            _date: &str,
        ) -> Result<Option<ArrivalDetail>, FetchError> {
            self.detail_calls.lock().unwrap().push(range.to_string());

            let mut failures = self.detail_auth_failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(range) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(FetchError::Auth(AuthError::SessionRejected(
                        "expired".to_string(),
                    )));
                }
            }

            Ok(self.details.get(range).cloned())
        }
    }

    /// Recording sink, optionally failing for messages containing a marker
    struct RecordingSink {
        sent: Mutex<Vec<String>>,
        fail_containing: Option<String>,
        failures: AtomicUsize,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_containing: None,
                failures: AtomicUsize::new(0),
            }
        }

        fn failing_for(marker: &str) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_containing: Some(marker.to_string()),
                failures: AtomicUsize::new(0),
            }
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn send(&self, text: &str) -> Result<(), DeliveryError> {
            if let Some(marker) = &self.fail_containing {
                if text.contains(marker.as_str()) {
                    self.failures.fetch_add(1, Ordering::SeqCst);
                    return Err(DeliveryError::Send("transport unavailable".to_string()));
                }
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn snap(range: &str, count: u64) -> RangeSnapshot {
        RangeSnapshot {
            range: range.to_string(),
            count,
        }
    }

    #[tokio::test]
    async fn test_cold_baseline_then_increase_notifies_once() {
        let fetcher = Arc::new(
            ScriptedFetcher::new(vec![
                vec![snap("Indonesia (+62)", 5)],
                vec![snap("Indonesia (+62)", 7)],
            ])
            .with_detail("Indonesia (+62)", "6281234567", "Your WhatsApp code is 123456"),
        );
        let sink = Arc::new(RecordingSink::new());
        let mut engine = MonitorEngine::new(fetcher.clone(), sink.clone());

        // Cold tick: baseline only, no detail fetch, no notification
        let outcome = engine.tick("01/01/2026").await;
        assert_eq!(
            outcome,
            TickOutcome::Processed {
                increased: 0,
                notified: 0
            }
        );
        assert!(fetcher.detail_calls().is_empty());
        assert!(sink.sent().is_empty());

        // Counter rises: exactly one detail fetch, one notification
        let outcome = engine.tick("01/01/2026").await;
        assert_eq!(
            outcome,
            TickOutcome::Processed {
                increased: 1,
                notified: 1
            }
        );
        assert_eq!(fetcher.detail_calls(), vec!["Indonesia (+62)"]);

        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("6281234567"));
        assert!(sent[0].contains("Your WhatsApp code is 123456"));
        assert!(sent[0].contains("WhatsApp"));

        assert_eq!(engine.ranges()["Indonesia (+62)"].last_count, 7);
        assert_eq!(
            engine.ranges()["Indonesia (+62)"].last_service.as_deref(),
            Some("WhatsApp")
        );
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_block_other_ranges() {
        let fetcher = Arc::new(
            ScriptedFetcher::new(vec![
                vec![snap("X (+1)", 1), snap("Y (+2)", 1)],
                vec![snap("X (+1)", 2), snap("Y (+2)", 2)],
            ])
            .with_detail("X (+1)", "1555000", "failme please")
            .with_detail("Y (+2)", "2555000", "Telegram code 4242"),
        );
        let sink = Arc::new(RecordingSink::failing_for("failme"));
        let mut engine = MonitorEngine::new(fetcher.clone(), sink.clone());

        engine.tick("01/01/2026").await;
        let outcome = engine.tick("01/01/2026").await;

        assert_eq!(
            outcome,
            TickOutcome::Processed {
                increased: 2,
                notified: 1
            }
        );
        // X's delivery was attempted and failed; Y still went out
        assert_eq!(sink.failures.load(Ordering::SeqCst), 1);
        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("2555000"));
        // Both ranges committed the new counts despite X's failure
        assert_eq!(engine.ranges()["X (+1)"].last_count, 2);
        assert_eq!(engine.ranges()["Y (+2)"].last_count, 2);
    }

    #[tokio::test]
    async fn test_missing_detail_is_skipped_but_committed() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![
            vec![snap("Ghost (+0)", 1)],
            vec![snap("Ghost (+0)", 3)],
        ]));
        let sink = Arc::new(RecordingSink::new());
        let mut engine = MonitorEngine::new(fetcher.clone(), sink.clone());

        engine.tick("01/01/2026").await;
        let outcome = engine.tick("01/01/2026").await;

        assert_eq!(
            outcome,
            TickOutcome::Processed {
                increased: 1,
                notified: 0
            }
        );
        assert!(sink.sent().is_empty());
        assert_eq!(engine.ranges()["Ghost (+0)"].last_count, 3);
    }

    #[tokio::test]
    async fn test_auth_loss_mid_tick_aborts_but_commits() {
        let fetcher = Arc::new(
            ScriptedFetcher::new(vec![
                vec![snap("A", 1), snap("B", 1)],
                vec![snap("A", 2), snap("B", 2)],
            ])
            .with_detail("A", "111", "code")
            .with_detail("B", "222", "code"),
        );
        fetcher
            .detail_auth_failures
            .lock()
            .unwrap()
            .insert("A".to_string(), 1);

        let sink = Arc::new(RecordingSink::new());
        let mut engine = MonitorEngine::new(fetcher.clone(), sink.clone());

        engine.tick("01/01/2026").await;
        let outcome = engine.tick("01/01/2026").await;

        assert_eq!(outcome, TickOutcome::AuthRequired);
        // B never got its detail fetch this tick
        assert_eq!(fetcher.detail_calls(), vec!["A"]);
        assert!(sink.sent().is_empty());
        // Counters still committed: next tick won't re-flag A or B
        assert_eq!(engine.ranges()["A"].last_count, 2);
        assert_eq!(engine.ranges()["B"].last_count, 2);
    }

    #[tokio::test]
    async fn test_upstream_failure_leaves_state_untouched() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![vec![snap("A", 4)]]));
        let sink = Arc::new(RecordingSink::new());
        let mut engine = MonitorEngine::new(fetcher, sink);

        engine.tick("01/01/2026").await;
        // Script exhausted: the fetcher now fails with an upstream error
        let outcome = engine.tick("01/01/2026").await;

        assert_eq!(outcome, TickOutcome::UpstreamFailure);
        assert_eq!(engine.ranges()["A"].last_count, 4);
    }
}
