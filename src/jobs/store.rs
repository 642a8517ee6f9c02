//! In-memory job store.
//!
//! Pending and approved jobs live in one keyed map with a [`JobState`] tag,
//! and each collection is a filtered view of it. A job is therefore never in
//! both collections, and moving it is a single tag change under the lock.
//!
//! All operations take the same mutex for the duration of a map access. File
//! I/O never happens while it is held.
//!
//! Removed ids are remembered so an id can never be handed out twice.

use super::job::{CropJob, JobId, JobState, NewJob};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Job id {0} is already in use")]
    DuplicateId(JobId),
}

/// Keyed storage for crop jobs.
///
/// The lifecycle manager is the only writer. Implementations must make each
/// method atomic with respect to the others.
pub trait JobStore: Send + Sync {
    /// Add a new job in the pending state and return the stored record.
    fn insert(&self, job: NewJob) -> Result<CropJob, StoreError>;

    fn get(&self, id: JobId) -> Option<CropJob>;

    /// Move a pending job to approved, stamping `approved_at`.
    ///
    /// Returns the updated record and the source path it released, or `None`
    /// if `id` is not pending.
    fn approve(&self, id: JobId, at: DateTime<Utc>) -> Option<(CropJob, Option<PathBuf>)>;

    /// Remove a job if it is currently in `state`.
    fn remove(&self, id: JobId, state: JobState) -> Option<CropJob>;

    /// Snapshot of one collection in insertion order.
    fn list(&self, state: JobState) -> Vec<CropJob>;

    /// Both collections captured under a single lock acquisition.
    fn snapshot(&self) -> StoreSnapshot;
}

/// Pending and approved jobs as of one instant, each in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub pending: Vec<CropJob>,
    pub approved: Vec<CropJob>,
}

#[derive(Default)]
struct Inner {
    jobs: HashMap<JobId, CropJob>,
    retired: HashSet<JobId>,
    next_sequence: u64,
}

/// Volatile [`JobStore`]; contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryJobStore {
    inner: Mutex<Inner>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // No critical section leaves the map half-updated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl JobStore for MemoryJobStore {
    fn insert(&self, job: NewJob) -> Result<CropJob, StoreError> {
        let mut inner = self.lock();
        if inner.jobs.contains_key(&job.id) || inner.retired.contains(&job.id) {
            return Err(StoreError::DuplicateId(job.id));
        }
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;
        let record = job.into_pending(sequence);
        inner.jobs.insert(record.id, record.clone());
        Ok(record)
    }

    fn get(&self, id: JobId) -> Option<CropJob> {
        self.lock().jobs.get(&id).cloned()
    }

    fn approve(&self, id: JobId, at: DateTime<Utc>) -> Option<(CropJob, Option<PathBuf>)> {
        let mut inner = self.lock();
        let job = inner
            .jobs
            .get_mut(&id)
            .filter(|job| job.state == JobState::Pending)?;
        job.state = JobState::Approved;
        job.approved_at = Some(at);
        let released = job.source_path.take();
        Some((job.clone(), released))
    }

    fn remove(&self, id: JobId, state: JobState) -> Option<CropJob> {
        let mut inner = self.lock();
        if inner.jobs.get(&id)?.state != state {
            return None;
        }
        let removed = inner.jobs.remove(&id)?;
        inner.retired.insert(id);
        Some(removed)
    }

    fn list(&self, state: JobState) -> Vec<CropJob> {
        let inner = self.lock();
        let mut jobs: Vec<CropJob> = inner
            .jobs
            .values()
            .filter(|job| job.state == state)
            .cloned()
            .collect();
        drop(inner);
        jobs.sort_by_key(|job| job.sequence);
        jobs
    }

    fn snapshot(&self) -> StoreSnapshot {
        let inner = self.lock();
        let (mut pending, mut approved): (Vec<CropJob>, Vec<CropJob>) = inner
            .jobs
            .values()
            .cloned()
            .partition(|job| job.state == JobState::Pending);
        drop(inner);
        pending.sort_by_key(|job| job.sequence);
        approved.sort_by_key(|job| job.sequence);
        StoreSnapshot { pending, approved }
    }
}
