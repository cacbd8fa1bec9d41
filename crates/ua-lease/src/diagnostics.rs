//! Per-requester contention counters and the advisory contention warning.
//!
//! Every unit a module asks for is one *request*, resolved as either a
//! *grant* or a *denial*, so `grants + denials == requests` holds for every
//! requester at all times.  Renewals and preemptions are sub-kinds of grants
//! and are tallied separately on top.
//!
//! Counters are kept twice: lifetime totals (monotonic until
//! [`Diagnostics::reset`]) and a rolling window that
//! [`Diagnostics::report`] closes and restarts.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use ua_core::Tick;

use crate::{ContentionConfig, Resolution};

/// Counters for one requester.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequesterStats {
    pub requests:    u64,
    pub grants:      u64,
    pub denials:     u64,
    /// Grants that only extended an existing lease.
    pub renewals:    u64,
    /// Grants that evicted another module's lease.
    pub preemptions: u64,
    /// Leases this requester lost to someone else's preemption.
    pub evicted:     u64,
    /// Leases this requester gave back explicitly.
    pub releases:    u64,
}

impl RequesterStats {
    /// Fraction of requests granted, or `None` before the first request.
    pub fn grant_rate(&self) -> Option<f64> {
        (self.requests > 0).then(|| self.grants as f64 / self.requests as f64)
    }

    fn record(&mut self, resolution: &Resolution) {
        self.requests += 1;
        match resolution {
            Resolution::GrantNew => self.grants += 1,
            Resolution::GrantRenew => {
                self.grants += 1;
                self.renewals += 1;
            }
            Resolution::GrantPreempt { .. } => {
                self.grants += 1;
                self.preemptions += 1;
            }
            Resolution::Deny { .. } => self.denials += 1,
        }
    }
}

/// Snapshot of every requester's counters, sorted by name.
pub type Statistics = BTreeMap<String, RequesterStats>;

/// A requester that is being starved over the last window.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentionWarning {
    pub requester:  String,
    pub requests:   u64,
    pub grants:     u64,
    pub grant_rate: f64,
    pub threshold:  f64,
}

impl fmt::Display for ContentionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} granted {}/{} requests ({:.0}%, threshold {:.0}%)",
            self.requester,
            self.grants,
            self.requests,
            self.grant_rate * 100.0,
            self.threshold * 100.0,
        )
    }
}

/// The result of closing one reporting window.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentionReport {
    pub window_start: Tick,
    pub window_end:   Tick,
    /// Window counters for every requester active in the window.
    pub window:       Statistics,
    pub warnings:     Vec<ContentionWarning>,
}

#[derive(Debug, Default)]
struct Entry {
    lifetime: RequesterStats,
    window:   RequesterStats,
}

/// Counter store owned by the arbiter.
#[derive(Debug)]
pub struct Diagnostics {
    config:       ContentionConfig,
    entries:      BTreeMap<Arc<str>, Entry>,
    window_start: Tick,
}

impl Diagnostics {
    pub fn new(config: ContentionConfig) -> Self {
        Self { config, entries: BTreeMap::new(), window_start: Tick::ZERO }
    }

    pub fn config(&self) -> &ContentionConfig {
        &self.config
    }

    fn entry(&mut self, requester: &Arc<str>) -> &mut Entry {
        self.entries.entry(Arc::clone(requester)).or_default()
    }

    pub(crate) fn record(&mut self, requester: &Arc<str>, resolution: &Resolution) {
        let e = self.entry(requester);
        e.lifetime.record(resolution);
        e.window.record(resolution);
    }

    pub(crate) fn record_eviction(&mut self, holder: &Arc<str>) {
        let e = self.entry(holder);
        e.lifetime.evicted += 1;
        e.window.evicted += 1;
    }

    pub(crate) fn record_releases(&mut self, requester: &Arc<str>, n: u64) {
        if n == 0 {
            return;
        }
        let e = self.entry(requester);
        e.lifetime.releases += n;
        e.window.releases += n;
    }

    /// Lifetime counters for one requester.
    pub fn stats_for(&self, requester: &str) -> Option<RequesterStats> {
        self.entries.get(requester).map(|e| e.lifetime)
    }

    /// Lifetime counters for every requester seen this session.
    pub fn snapshot(&self) -> Statistics {
        self.entries
            .iter()
            .map(|(name, e)| (name.to_string(), e.lifetime))
            .collect()
    }

    /// Counters accumulated since the last [`report`](Self::report).
    pub fn window_snapshot(&self) -> Statistics {
        self.entries
            .iter()
            .filter(|(_, e)| e.window.requests > 0 || e.window.evicted > 0 || e.window.releases > 0)
            .map(|(name, e)| (name.to_string(), e.window))
            .collect()
    }

    /// `true` once `now` is at least one full window past the last report.
    pub fn window_elapsed(&self, now: Tick) -> bool {
        now.since(self.window_start) >= self.config.window_ticks
    }

    /// Close the current window: flag starved requesters, log each warning,
    /// and start a fresh window at `now`.
    pub fn report(&mut self, now: Tick) -> ContentionReport {
        let window = self.window_snapshot();
        let warnings: Vec<ContentionWarning> = window
            .iter()
            .filter(|(_, s)| s.requests >= self.config.min_requests.max(1))
            .filter_map(|(name, s)| {
                let rate = s.grant_rate()?;
                (rate < self.config.min_grant_rate).then(|| ContentionWarning {
                    requester:  name.clone(),
                    requests:   s.requests,
                    grants:     s.grants,
                    grant_rate: rate,
                    threshold:  self.config.min_grant_rate,
                })
            })
            .collect();

        for w in &warnings {
            log::warn!("contention {}..{}: {w}", self.window_start, now);
        }

        let report = ContentionReport {
            window_start: self.window_start,
            window_end: now,
            window,
            warnings,
        };
        for e in self.entries.values_mut() {
            e.window = RequesterStats::default();
        }
        self.window_start = now;
        report
    }

    /// Zero every counter, lifetime and window.
    pub fn reset(&mut self, now: Tick) {
        self.entries.clear();
        self.window_start = now;
    }
}
