//! `LeaseRegistry`: the single source of truth for "who controls what".
//!
//! Keyed by `UnitId`, at most one `Lease` per key.  Only the arbiter holds a
//! `&mut LeaseRegistry`; everything else sees it through `&`.

use ua_core::{Tick, UnitId};

use crate::{ExpiryQueue, Lease};

#[cfg(feature = "fx-hash")]
pub(crate) type UnitMap<V> = rustc_hash::FxHashMap<UnitId, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type UnitMap<V> = std::collections::HashMap<UnitId, V>;

#[cfg(feature = "fx-hash")]
pub(crate) type UnitSet = rustc_hash::FxHashSet<UnitId>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type UnitSet = std::collections::HashSet<UnitId>;

/// Map of unit → active lease, plus the expiry index the sweeper drains.
#[derive(Debug, Default)]
pub struct LeaseRegistry {
    leases: UnitMap<Lease>,
    expiry: ExpiryQueue,
}

impl LeaseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, unit: UnitId) -> Option<&Lease> {
        self.leases.get(&unit)
    }

    #[inline]
    pub fn contains(&self, unit: UnitId) -> bool {
        self.leases.contains_key(&unit)
    }

    pub fn len(&self) -> usize {
        self.leases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leases.is_empty()
    }

    /// All leases, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Lease> {
        self.leases.values()
    }

    /// Entries currently in the expiry index, stale ones included.
    pub fn pending_expiries(&self) -> usize {
        self.expiry.len()
    }

    /// Store `lease`, replacing (never merging) whatever was there.
    pub(crate) fn insert(&mut self, lease: Lease) -> Option<Lease> {
        self.expiry.push(lease.expires_tick, lease.unit);
        self.leases.insert(lease.unit, lease)
    }

    /// Extend an existing lease in place.  Returns the new expiry.
    pub(crate) fn renew(&mut self, unit: UnitId, now: Tick, duration: u64) -> Option<Tick> {
        let lease = self.leases.get_mut(&unit)?;
        let before = lease.expires_tick;
        lease.renew(now, duration);
        let after = lease.expires_tick;
        if after != before {
            self.expiry.push(after, unit);
        }
        Some(after)
    }

    pub(crate) fn remove(&mut self, unit: UnitId) -> Option<Lease> {
        self.leases.remove(&unit)
    }

    /// Remove `unit`'s lease only if `requester` holds it.
    pub(crate) fn remove_if_held(&mut self, unit: UnitId, requester: &str) -> Option<Lease> {
        match self.leases.get(&unit) {
            Some(lease) if lease.is_held_by(requester) => self.leases.remove(&unit),
            _ => None,
        }
    }

    /// Remove every lease matching `pred` and return them.
    pub(crate) fn drain_where(&mut self, mut pred: impl FnMut(&Lease) -> bool) -> Vec<Lease> {
        let doomed: Vec<UnitId> = self
            .leases
            .values()
            .filter(|l| pred(l))
            .map(|l| l.unit)
            .collect();
        doomed.into_iter().filter_map(|u| self.leases.remove(&u)).collect()
    }

    /// Remove every lease with `expires_tick <= now`.
    ///
    /// Walks only the expiry entries that have come due and re-checks each
    /// against the registry, so renewed leases survive.  Idempotent.
    pub(crate) fn sweep(&mut self, now: Tick) -> Vec<Lease> {
        let mut removed = Vec::new();
        for unit in self.expiry.drain_through(now) {
            if self.leases.get(&unit).is_some_and(|l| l.is_expired(now)) {
                if let Some(lease) = self.leases.remove(&unit) {
                    removed.push(lease);
                }
            }
        }
        if self.leases.is_empty() {
            // Only stale hints can remain.
            self.expiry.clear();
        }
        removed
    }
}
