//! The `Lease` record: one unit's current control grant.

use std::fmt;
use std::sync::Arc;

use ua_core::{Priority, Tick, UnitId};

/// A time-bounded, exclusive grant of control over one unit to one module.
///
/// `holder` is an `Arc<str>` so a batch grant shares one allocation across
/// all of its leases and the record stays `Send` for the service form.
///
/// Invariant: `expires_tick > granted_tick`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lease {
    pub unit:         UnitId,
    pub priority:     Priority,
    pub holder:       Arc<str>,
    /// Tick at which the lease was created or last renewed.
    pub granted_tick: Tick,
    /// First tick at which arbitration treats the unit as free again.
    pub expires_tick: Tick,
}

impl Lease {
    pub(crate) fn new(
        unit:     UnitId,
        priority: Priority,
        holder:   Arc<str>,
        now:      Tick,
        duration: u64,
    ) -> Self {
        debug_assert!(duration > 0, "zero-length lease for {unit}");
        Self {
            unit,
            priority,
            holder,
            granted_tick: now,
            expires_tick: now.offset(duration.max(1)),
        }
    }

    /// `true` once arbitration may hand the unit to anyone.
    #[inline]
    pub fn is_expired(&self, now: Tick) -> bool {
        self.expires_tick <= now
    }

    /// `true` while the lease still reports as locked to observers.
    ///
    /// Inclusive of the expiry tick itself: a caller probing at
    /// `expires_tick` still sees the unit as taken.
    #[inline]
    pub fn is_locked_at(&self, now: Tick) -> bool {
        now <= self.expires_tick
    }

    #[inline]
    pub fn is_held_by(&self, requester: &str) -> bool {
        &*self.holder == requester
    }

    /// Ticks left before arbitration releases the unit (0 once expired).
    #[inline]
    pub fn remaining(&self, now: Tick) -> u64 {
        self.expires_tick.since(now)
    }

    /// Extend the expiry for a renewal.  Holder and priority are untouched.
    pub(crate) fn renew(&mut self, now: Tick, duration: u64) {
        self.granted_tick = now;
        self.expires_tick = self.expires_tick.max(now.offset(duration.max(1)));
    }
}

impl fmt::Display for Lease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} held by {} at {} [{}, {})",
            self.unit, self.holder, self.priority, self.granted_tick, self.expires_tick,
        )
    }
}
