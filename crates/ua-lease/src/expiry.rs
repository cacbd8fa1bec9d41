//! `ExpiryQueue`: sparse tick-indexed index of lease expiries.
//!
//! # Why this exists
//!
//! Most leases are alive most ticks.  Scanning the whole registry every tick
//! to find the expired ones would cost O(leases) regardless of how few are
//! actually due.
//!
//! `ExpiryQueue` inverts the problem: every grant or renewal registers the
//! tick at which that lease runs out.  A sweep drains only the ticks that
//! have passed, O(due) work instead of O(leases).
//!
//! Entries are hints, not truth.  A renewal or release leaves the old entry
//! behind; the sweeper re-checks the registry before removing anything and
//! stale entries fall out when their tick is drained.

use std::collections::BTreeMap;

use ua_core::{Tick, UnitId};

/// Maps expiry ticks → units whose lease (may) run out at that tick.
#[derive(Debug, Default)]
pub struct ExpiryQueue {
    inner: BTreeMap<Tick, Vec<UnitId>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
}

impl ExpiryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `unit`'s lease expires at `tick`.
    pub fn push(&mut self, tick: Tick, unit: UnitId) {
        self.inner.entry(tick).or_default().push(unit);
        self.total += 1;
    }

    /// Remove and return every entry with an expiry tick `<= now`, in
    /// ascending tick order.
    pub fn drain_through(&mut self, now: Tick) -> Vec<UnitId> {
        let due = if now == Tick::MAX {
            std::mem::take(&mut self.inner)
        } else {
            let later = self.inner.split_off(&now.offset(1));
            std::mem::replace(&mut self.inner, later)
        };
        let units: Vec<UnitId> = due.into_values().flatten().collect();
        self.total -= units.len();
        units
    }

    /// The earliest recorded expiry, or `None` if empty.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    /// Total number of (tick, unit) entries, stale ones included.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct ticks with at least one entry.
    pub fn tick_count(&self) -> usize {
        self.inner.len()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.total = 0;
    }
}
