/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Expansion-gated polling source for stack services.
//!
//! Services are fetched only while their owning stack is rendered and
//! expanded. Rather than managing one timer per stack, the schedule is
//! reconciled against the aggregator's current active set on every
//! tick: cancellation is a pure function of state, not cleanup
//! bookkeeping. The caller (the event loop) performs the actual
//! fetches serially and records the results back here.
//!
//! Invariants:
//! - An inactive stack is never returned by [`ServiceSource::due`],
//!   however long it stays inactive.
//! - Deactivation drops the schedule but retains the last known value,
//!   so a re-expanded stack shows stale data while its fresh fetch
//!   (issued immediately) is in flight.
//! - A failed fetch retains the previous value; the error is logged,
//!   never surfaced through the tree.

use std::collections::HashMap;
use std::collections::HashSet;
use std::time::Duration;
use std::time::Instant;

use crate::client::ApiError;
use crate::model::Service;

/// Fixed polling cadence for service lists of expanded stacks.
pub const SERVICE_POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Default)]
struct ServiceEntry {
    /// Last known service list, retained across failures and
    /// deactivation.
    services: Option<Vec<Service>>,
    /// When the last fetch was recorded. `None` means the next active
    /// tick fetches immediately (initial fetch or fresh re-expansion).
    last_polled: Option<Instant>,
}

/// Per-stack service data with an expansion-gated polling schedule.
#[derive(Debug)]
pub struct ServiceSource {
    interval: Duration,
    entries: HashMap<String, ServiceEntry>,
}

impl Default for ServiceSource {
    fn default() -> Self {
        Self::new(SERVICE_POLL_INTERVAL)
    }
}

impl ServiceSource {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            entries: HashMap::new(),
        }
    }

    /// Last known services for a stack, without fetching or blocking.
    ///
    /// `None` until the first successful fetch lands.
    pub fn latest(&self, stack_id: &str) -> Option<&[Service]> {
        self.entries
            .get(stack_id)
            .and_then(|e| e.services.as_deref())
    }

    /// Reconcile the schedule with `active` and return the stacks owed
    /// a fetch now.
    ///
    /// Stacks outside `active` have their schedule cleared (value
    /// retained); stacks inside it are due immediately when never
    /// polled, and on the fixed interval afterwards. The caller must
    /// fetch and [`record`](Self::record) each returned id before the
    /// next call, which the serial event loop guarantees.
    pub fn due(&mut self, active: &HashSet<String>, now: Instant) -> Vec<String> {
        // Deactivate: clear timers so re-expansion refetches at once;
        // drop entries that also hold no data.
        self.entries.retain(|id, entry| {
            if !active.contains(id) {
                entry.last_polled = None;
            }
            active.contains(id) || entry.services.is_some()
        });

        let mut owed = Vec::new();
        for id in active {
            let entry = self.entries.entry(id.clone()).or_default();
            let is_due = match entry.last_polled {
                None => true,
                Some(at) => now.duration_since(at) >= self.interval,
            };
            if is_due {
                owed.push(id.clone());
            }
        }
        owed
    }

    /// Record a fetch result for a stack and schedule the next poll
    /// one interval out.
    ///
    /// Failures keep the previous value and are logged to the
    /// observability channel only.
    pub fn record(&mut self, stack_id: &str, result: Result<Vec<Service>, ApiError>, now: Instant) {
        let entry = self.entries.entry(stack_id.to_string()).or_default();
        entry.last_polled = Some(now);
        match result {
            Ok(services) => entry.services = Some(services),
            Err(err) => {
                tracing::warn!(stack_id, error = %err, "service fetch failed; keeping last known value");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn services(names: &[&str]) -> Vec<Service> {
        names
            .iter()
            .map(|n| Service {
                name: n.to_string(),
                container: None,
            })
            .collect()
    }

    // A newly-activated stack is due immediately.
    #[test]
    fn activation_fetches_immediately() {
        let mut source = ServiceSource::new(Duration::from_secs(10));
        let owed = source.due(&active(&["frontend"]), Instant::now());
        assert_eq!(owed, vec!["frontend".to_string()]);
    }

    // After a recorded fetch, nothing is due until the interval elapses.
    #[test]
    fn polls_on_the_fixed_interval() {
        let mut source = ServiceSource::new(Duration::from_secs(10));
        let t0 = Instant::now();
        source.record("frontend", Ok(services(&["web"])), t0);

        let set = active(&["frontend"]);
        assert!(source.due(&set, t0 + Duration::from_secs(5)).is_empty());
        assert_eq!(
            source.due(&set, t0 + Duration::from_secs(10)),
            vec!["frontend".to_string()]
        );
    }

    // Collapse stops polling: no fetch is owed across many intervals.
    #[test]
    fn deactivation_stops_polling() {
        let mut source = ServiceSource::new(Duration::from_secs(10));
        let t0 = Instant::now();
        source.record("frontend", Ok(services(&["web"])), t0);

        let none = active(&[]);
        for n in 1..=5u64 {
            let now = t0 + Duration::from_secs(10 * n);
            assert!(source.due(&none, now).is_empty());
        }
        // Last known value survives deactivation.
        assert!(source.latest("frontend").is_some());
    }

    // Re-expansion issues a fresh fetch at once, not on the old schedule.
    #[test]
    fn reactivation_refetches_immediately() {
        let mut source = ServiceSource::new(Duration::from_secs(10));
        let t0 = Instant::now();
        source.record("frontend", Ok(services(&["web"])), t0);

        // Collapse, then re-expand one second later: due despite the
        // interval not having elapsed since the last record.
        assert!(source.due(&active(&[]), t0).is_empty());
        let owed = source.due(&active(&["frontend"]), t0 + Duration::from_secs(1));
        assert_eq!(owed, vec!["frontend".to_string()]);
    }

    // A failed fetch retains the previous value and still reschedules.
    #[test]
    fn failure_retains_last_known_value() {
        let mut source = ServiceSource::new(Duration::from_secs(10));
        let t0 = Instant::now();
        source.record("frontend", Ok(services(&["web"])), t0);
        source.record(
            "frontend",
            Err(ApiError::Status(reqwest::StatusCode::BAD_GATEWAY)),
            t0 + Duration::from_secs(10),
        );

        let known = source.latest("frontend").unwrap();
        assert_eq!(known.len(), 1);
        assert_eq!(known[0].name, "web");
        // Rescheduled: not due again until a full interval after the failure.
        let set = active(&["frontend"]);
        assert!(source.due(&set, t0 + Duration::from_secs(15)).is_empty());
        assert!(!source.due(&set, t0 + Duration::from_secs(20)).is_empty());
    }

    // Stacks with neither data nor activity are forgotten entirely.
    #[test]
    fn empty_inactive_entries_are_dropped() {
        let mut source = ServiceSource::new(Duration::from_secs(10));
        let t0 = Instant::now();
        source.due(&active(&["frontend"]), t0);
        // Deactivated before any fetch landed.
        source.due(&active(&[]), t0 + Duration::from_secs(1));
        assert!(source.latest("frontend").is_none());
    }
}
