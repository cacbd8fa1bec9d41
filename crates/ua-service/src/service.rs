//! The actor thread that owns the arbiter.

use std::thread;

use crossbeam_channel::Receiver;
use ua_lease::{ArbiterConfig, AuthorityArbiter};

use crate::command::Command;
use crate::{ArbiterHandle, ServiceResult};

/// Capacity of the command queue used by [`ArbiterService::spawn`].
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Starts the arbiter actor.
///
/// Every operation is a message to one thread that owns the
/// [`AuthorityArbiter`], so calls from any number of threads are applied
/// one at a time in arrival order and the registry needs no lock.
pub struct ArbiterService;

impl ArbiterService {
    pub fn spawn(config: ArbiterConfig) -> ServiceResult<ArbiterHandle> {
        Self::spawn_with_capacity(config, DEFAULT_QUEUE_CAPACITY)
    }

    /// Like [`spawn`](Self::spawn) with an explicit command queue bound.
    /// Senders block while the queue is full.
    pub fn spawn_with_capacity(
        config:   ArbiterConfig,
        capacity: usize,
    ) -> ServiceResult<ArbiterHandle> {
        let arbiter = AuthorityArbiter::new(config)?;
        let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));

        let worker = thread::Builder::new()
            .name("ua-arbiter".into())
            .spawn(move || serve(arbiter, rx))?;

        Ok(ArbiterHandle::new(tx, worker))
    }
}

fn serve(mut arbiter: AuthorityArbiter, rx: Receiver<Command>) {
    log::info!("arbiter service started");

    // A failed reply only means the caller gave up waiting.
    for cmd in rx.iter() {
        match cmd {
            Command::Request { units, priority, requester, now, duration, reply } => {
                let grant = arbiter.try_request(&units, priority, &requester, now, duration);
                let _ = reply.send(grant);
            }
            Command::Release { units, requester, reply } => {
                let _ = reply.send(arbiter.release(&units, &requester));
            }
            Command::ReleaseAll { requester, reply } => {
                let _ = reply.send(arbiter.release_all(&requester));
            }
            Command::IsLocked { unit, now, reply } => {
                let _ = reply.send(arbiter.is_locked(unit, now));
            }
            Command::LeaseInfo { unit, reply } => {
                let _ = reply.send(arbiter.lease_info(unit).cloned());
            }
            Command::FilterControllable { units, priority, requester, now, reply } => {
                let _ = reply.send(arbiter.filter_controllable(&units, priority, &requester, now));
            }
            Command::LeasesHeldBy { requester, reply } => {
                let _ = reply.send(arbiter.leases_held_by(&requester));
            }
            Command::Cleanup { now, reply } => {
                let _ = reply.send(arbiter.cleanup_expired(now));
            }
            Command::EvictUnits { units, reply } => {
                let _ = reply.send(arbiter.evict_units(&units));
            }
            Command::Statistics { reply } => {
                let _ = reply.send(arbiter.statistics());
            }
            Command::ReportContention { now, reply } => {
                let _ = reply.send(arbiter.report_contention(now));
            }
            Command::Shutdown { reply } => {
                let _ = reply.send(arbiter.statistics());
                break;
            }
        }
    }

    log::info!("arbiter service stopped with {} lease(s) outstanding", arbiter.len());
}
