//! `ArbiterHandle`: the cloneable client side of the arbiter actor.

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use ua_core::{Priority, Tick, UnitId};
use ua_lease::{ContentionReport, Grant, Lease, Statistics};

use crate::command::Command;
use crate::{ServiceError, ServiceResult};

/// Client for an [`ArbiterService`][crate::ArbiterService].
///
/// Cheap to clone; each clone may be moved to its own thread.  Every call
/// blocks until the actor answers and fails with
/// [`ServiceError::Disconnected`] once the actor has stopped.
#[derive(Clone)]
pub struct ArbiterHandle {
    tx:     Sender<Command>,
    /// Shared by every clone; taken by whichever clone joins the actor.
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ArbiterHandle {
    pub(crate) fn new(tx: Sender<Command>, worker: JoinHandle<()>) -> Self {
        Self { tx, worker: Arc::new(Mutex::new(Some(worker))) }
    }

    /// `true` until the actor thread has exited.
    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .map(|slot| slot.as_ref().is_some_and(|w| !w.is_finished()))
            .unwrap_or(false)
    }

    fn call<T>(&self, make: impl FnOnce(Sender<T>) -> Command) -> ServiceResult<T> {
        let (reply, answer) = crossbeam_channel::bounded(1);
        self.tx.send(make(reply)).map_err(|_| ServiceError::Disconnected)?;
        answer.recv().map_err(|_| ServiceError::Disconnected)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Request `units` with the default duration for `priority`.  A
    /// malformed call yields an empty grant, as on the arbiter itself.
    pub fn request(
        &self,
        units:     &[UnitId],
        priority:  Priority,
        requester: &str,
        now:       Tick,
    ) -> ServiceResult<Vec<UnitId>> {
        self.request_inner(units, priority, requester, now, None)
    }

    pub fn request_for(
        &self,
        units:          &[UnitId],
        priority:       Priority,
        requester:      &str,
        now:            Tick,
        duration_ticks: u64,
    ) -> ServiceResult<Vec<UnitId>> {
        self.request_inner(units, priority, requester, now, Some(duration_ticks))
    }

    fn request_inner(
        &self,
        units:     &[UnitId],
        priority:  Priority,
        requester: &str,
        now:       Tick,
        duration:  Option<u64>,
    ) -> ServiceResult<Vec<UnitId>> {
        match self.try_request(units, priority, requester, now, duration) {
            Ok(grant) => Ok(grant.granted),
            Err(ServiceError::Lease(e)) => {
                log::warn!("authority request for {} unit(s) rejected: {e}", units.len());
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Full outcome of a request; malformed calls surface as
    /// [`ServiceError::Lease`].
    pub fn try_request(
        &self,
        units:     &[UnitId],
        priority:  Priority,
        requester: &str,
        now:       Tick,
        duration:  Option<u64>,
    ) -> ServiceResult<Grant> {
        let grant = self.call(|reply| Command::Request {
            units: units.to_vec(),
            priority,
            requester: requester.to_owned(),
            now,
            duration,
            reply,
        })?;
        Ok(grant?)
    }

    pub fn release(&self, units: &[UnitId], requester: &str) -> ServiceResult<usize> {
        self.call(|reply| Command::Release {
            units: units.to_vec(),
            requester: requester.to_owned(),
            reply,
        })
    }

    pub fn release_all(&self, requester: &str) -> ServiceResult<usize> {
        self.call(|reply| Command::ReleaseAll { requester: requester.to_owned(), reply })
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn is_locked(&self, unit: UnitId, now: Tick) -> ServiceResult<bool> {
        self.call(|reply| Command::IsLocked { unit, now, reply })
    }

    /// A copy of the stored lease, if any.
    pub fn lease_info(&self, unit: UnitId) -> ServiceResult<Option<Lease>> {
        self.call(|reply| Command::LeaseInfo { unit, reply })
    }

    pub fn filter_controllable(
        &self,
        units:     &[UnitId],
        priority:  Priority,
        requester: &str,
        now:       Tick,
    ) -> ServiceResult<Vec<UnitId>> {
        self.call(|reply| Command::FilterControllable {
            units: units.to_vec(),
            priority,
            requester: requester.to_owned(),
            now,
            reply,
        })
    }

    pub fn leases_held_by(&self, requester: &str) -> ServiceResult<Vec<Lease>> {
        self.call(|reply| Command::LeasesHeldBy { requester: requester.to_owned(), reply })
    }

    // ── Sweeping ──────────────────────────────────────────────────────────

    pub fn cleanup_expired(&self, now: Tick) -> ServiceResult<usize> {
        self.call(|reply| Command::Cleanup { now, reply })
    }

    pub fn evict_units(&self, units: &[UnitId]) -> ServiceResult<usize> {
        self.call(|reply| Command::EvictUnits { units: units.to_vec(), reply })
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    pub fn statistics(&self) -> ServiceResult<Statistics> {
        self.call(|reply| Command::Statistics { reply })
    }

    pub fn report_contention(&self, now: Tick) -> ServiceResult<ContentionReport> {
        self.call(|reply| Command::ReportContention { now, reply })
    }

    /// Stop the actor, wait for its thread to exit and return the final
    /// lifetime statistics.  Every clone of this handle is disconnected
    /// afterwards.
    pub fn shutdown(&self) -> ServiceResult<Statistics> {
        let stats = self.call(|reply| Command::Shutdown { reply })?;
        let worker = self.worker.lock().ok().and_then(|mut slot| slot.take());
        if let Some(worker) = worker {
            worker.join().map_err(|_| ServiceError::Disconnected)?;
        }
        Ok(stats)
    }
}
