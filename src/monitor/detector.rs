//! Per-range change detection
//!
//! Pure diff of the previous per-range state against a fresh counter
//! snapshot. The returned state is built wholesale from the snapshot, so
//! ranges the portal stopped reporting drop out on their own.
//!
//! Rules:
//! - Unseen range: recorded as a baseline, never flagged (prevents a
//!   notification storm of historical data on first contact).
//! - Counter increased: flagged once, regardless of delta size.
//! - Counter equal or decreased (e.g. upstream day rollover): silently
//!   re-baselined, never flagged as a negative delta.

use std::collections::HashMap;

/// Carried memory for one range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeState {
    /// Last observed arrival counter
    pub last_count: u64,
    /// Service label of the last notified arrival, for the stats menu
    pub last_service: Option<String>,
}

use crate::portal::types::RangeSnapshot;

/// Diff a snapshot against the previous state
///
/// Returns the replacement state map and the ranges whose counter
/// increased, in snapshot order (processing stays deterministic).
pub fn diff(
    previous: &HashMap<String, RangeState>,
    snapshot: &[RangeSnapshot],
) -> (HashMap<String, RangeState>, Vec<String>) {
    let mut updated = HashMap::with_capacity(snapshot.len());
    let mut increased = Vec::new();

    for entry in snapshot {
        match previous.get(&entry.range) {
            None => {
                updated.insert(
                    entry.range.clone(),
                    RangeState {
                        last_count: entry.count,
                        last_service: None,
                    },
                );
            }
            Some(prev) => {
                if entry.count > prev.last_count {
                    increased.push(entry.range.clone());
                }
                updated.insert(
                    entry.range.clone(),
                    RangeState {
                        last_count: entry.count,
                        last_service: prev.last_service.clone(),
                    },
                );
            }
        }
    }

    (updated, increased)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(range: &str, count: u64) -> RangeSnapshot {
        RangeSnapshot {
            range: range.to_string(),
            count,
        }
    }

    #[test]
    fn test_first_sighting_is_baseline_not_event() {
        let (state, increased) = diff(&HashMap::new(), &[snap("Russian (+7)", 5)]);
        assert!(increased.is_empty());
        assert_eq!(state["Russian (+7)"].last_count, 5);
    }

    #[test]
    fn test_increase_flagged_exactly_once() {
        let (state, increased) = diff(&HashMap::new(), &[snap("Russian (+7)", 5)]);
        assert!(increased.is_empty());

        let (state, increased) = diff(&state, &[snap("Russian (+7)", 9)]);
        assert_eq!(increased, vec!["Russian (+7)"]);
        assert_eq!(state["Russian (+7)"].last_count, 9);

        // Same count next tick: nothing new
        let (_, increased) = diff(&state, &[snap("Russian (+7)", 9)]);
        assert!(increased.is_empty());
    }

    #[test]
    fn test_non_increasing_never_flags() {
        let (mut state, _) = diff(&HashMap::new(), &[snap("Vietnam (+84)", 10)]);
        for count in [10, 9, 9, 3, 3] {
            let (next, increased) = diff(&state, &[snap("Vietnam (+84)", count)]);
            assert!(increased.is_empty(), "count {} must not flag", count);
            state = next;
        }
        // Re-baselined to the lowest observed value
        assert_eq!(state["Vietnam (+84)"].last_count, 3);
    }

    #[test]
    fn test_decrease_rebaselines_for_next_increase() {
        let (state, _) = diff(&HashMap::new(), &[snap("UK (+44)", 20)]);
        // Day rollover: counter resets
        let (state, increased) = diff(&state, &[snap("UK (+44)", 1)]);
        assert!(increased.is_empty());
        // Next arrival on the new baseline fires
        let (_, increased) = diff(&state, &[snap("UK (+44)", 2)]);
        assert_eq!(increased, vec!["UK (+44)"]);
    }

    #[test]
    fn test_absent_range_dropped() {
        let (state, _) = diff(
            &HashMap::new(),
            &[snap("Russian (+7)", 5), snap("Indonesia (+62)", 3)],
        );
        let (state, increased) = diff(&state, &[snap("Indonesia (+62)", 3)]);
        assert!(increased.is_empty());
        assert!(!state.contains_key("Russian (+7)"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_multiple_ranges_ordered() {
        let (state, _) = diff(
            &HashMap::new(),
            &[snap("A", 1), snap("B", 1), snap("C", 1)],
        );
        let (_, increased) = diff(
            &state,
            &[snap("A", 2), snap("B", 1), snap("C", 5)],
        );
        assert_eq!(increased, vec!["A", "C"]);
    }

    #[test]
    fn test_last_service_carries_over() {
        let mut state = HashMap::new();
        state.insert(
            "A".to_string(),
            RangeState {
                last_count: 1,
                last_service: Some("WhatsApp".to_string()),
            },
        );
        let (state, _) = diff(&state, &[snap("A", 1)]);
        assert_eq!(state["A"].last_service.as_deref(), Some("WhatsApp"));
    }
}
