//! The preemption resolver.
//!
//! A pure function of (existing lease, incoming request).  The arbiter calls
//! it once per unit, in call order, against the registry state left by every
//! earlier resolution, which is what makes same-tick contests sequential.

use std::sync::Arc;

use ua_core::{Priority, Tick};

use crate::Lease;

/// Outcome of one unit's arbitration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No lease, or the existing lease has expired.
    GrantNew,
    /// The requester already holds the unit; only the expiry moves.
    GrantRenew,
    /// The requester is strictly more urgent than the current holder.
    GrantPreempt {
        previous_holder:   Arc<str>,
        previous_priority: Priority,
    },
    /// A different holder keeps the unit.
    Deny {
        holder:   Arc<str>,
        priority: Priority,
    },
}

impl Resolution {
    #[inline]
    pub fn is_granted(&self) -> bool {
        !matches!(self, Resolution::Deny { .. })
    }
}

/// Decide whether `requester` at `priority` may take a unit whose current
/// lease is `existing`.
///
/// Rules, checked in order:
///
/// 1. no lease, or `expires_tick <= now` → [`Resolution::GrantNew`]
/// 2. same holder, any priority          → [`Resolution::GrantRenew`]
/// 3. strictly more urgent               → [`Resolution::GrantPreempt`]
/// 4. otherwise (equal or less urgent)   → [`Resolution::Deny`]
pub fn resolve(
    existing:  Option<&Lease>,
    priority:  Priority,
    requester: &str,
    now:       Tick,
) -> Resolution {
    let Some(lease) = existing else {
        return Resolution::GrantNew;
    };
    if lease.is_expired(now) {
        return Resolution::GrantNew;
    }
    if lease.is_held_by(requester) {
        return Resolution::GrantRenew;
    }
    if priority.outranks(lease.priority) {
        Resolution::GrantPreempt {
            previous_holder:   Arc::clone(&lease.holder),
            previous_priority: lease.priority,
        }
    } else {
        Resolution::Deny {
            holder:   Arc::clone(&lease.holder),
            priority: lease.priority,
        }
    }
}
