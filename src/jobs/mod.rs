//! Crop jobs and the lifecycle that moves them between collections.
//!
//! ## Module Structure
//!
//! - [`job`] - The job record and its identifier
//! - [`store`] - Keyed, lock-protected storage for pending and approved jobs
//! - [`lifecycle`] - Ingest, approve, reject and delete, including file cleanup
//! - [`error`] - Error taxonomy shared by every transition

pub mod error;
pub mod job;
pub mod lifecycle;
pub mod store;

pub use error::{Action, CleanupIssue, ErrorKind, LifecycleError};
pub use job::{CropJob, JobId, JobState, NewJob};
pub use lifecycle::{LifecycleManager, LifecycleSettings, Upload};
pub use store::{JobStore, MemoryJobStore, StoreError, StoreSnapshot};
