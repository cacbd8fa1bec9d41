//! Messages sent from [`ArbiterHandle`][crate::ArbiterHandle] to the actor.

use crossbeam_channel::Sender;
use ua_core::{Priority, Tick, UnitId};
use ua_lease::{ContentionReport, Grant, Lease, LeaseResult, Statistics};

/// One arbiter operation plus the channel its answer goes back on.
pub(crate) enum Command {
    Request {
        units:     Vec<UnitId>,
        priority:  Priority,
        requester: String,
        now:       Tick,
        duration:  Option<u64>,
        reply:     Sender<LeaseResult<Grant>>,
    },
    Release {
        units:     Vec<UnitId>,
        requester: String,
        reply:     Sender<usize>,
    },
    ReleaseAll {
        requester: String,
        reply:     Sender<usize>,
    },
    IsLocked {
        unit:  UnitId,
        now:   Tick,
        reply: Sender<bool>,
    },
    LeaseInfo {
        unit:  UnitId,
        reply: Sender<Option<Lease>>,
    },
    FilterControllable {
        units:     Vec<UnitId>,
        priority:  Priority,
        requester: String,
        now:       Tick,
        reply:     Sender<Vec<UnitId>>,
    },
    LeasesHeldBy {
        requester: String,
        reply:     Sender<Vec<Lease>>,
    },
    Cleanup {
        now:   Tick,
        reply: Sender<usize>,
    },
    EvictUnits {
        units: Vec<UnitId>,
        reply: Sender<usize>,
    },
    Statistics {
        reply: Sender<Statistics>,
    },
    ReportContention {
        now:   Tick,
        reply: Sender<ContentionReport>,
    },
    Shutdown {
        reply: Sender<Statistics>,
    },
}
