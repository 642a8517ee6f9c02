//! The crop job record.

use crate::imaging::Dimensions;
use crate::policy::CropKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque job identifier, the only handle clients hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Which live collection a job belongs to.
///
/// Rejected and deleted jobs are removed from the store, so they have no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Approved,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Pending => f.write_str("pending"),
            JobState::Approved => f.write_str("approved"),
        }
    }
}

/// One submitted image from ingestion to its final disposition.
#[derive(Debug, Clone, PartialEq)]
pub struct CropJob {
    pub id: JobId,
    /// The stored upload. Taken (set to `None`) when approval consumes it.
    pub source_path: Option<PathBuf>,
    /// Client-declared filename, display only.
    pub original_name: String,
    pub derived_path: PathBuf,
    pub crop_kind: CropKind,
    /// Target box requested by the crop policy.
    pub target_dimensions: Dimensions,
    /// Intrinsic size of the uploaded image.
    pub source_dimensions: Dimensions,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub state: JobState,
    /// Insertion order, assigned by the store.
    pub sequence: u64,
}

/// Everything known about a job at ingestion, before the store accepts it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub id: JobId,
    pub source_path: PathBuf,
    pub original_name: String,
    pub derived_path: PathBuf,
    pub crop_kind: CropKind,
    pub target_dimensions: Dimensions,
    pub source_dimensions: Dimensions,
    pub created_at: DateTime<Utc>,
}

impl NewJob {
    /// The pending record for this job.
    pub fn into_pending(self, sequence: u64) -> CropJob {
        CropJob {
            id: self.id,
            source_path: Some(self.source_path),
            original_name: self.original_name,
            derived_path: self.derived_path,
            crop_kind: self.crop_kind,
            target_dimensions: self.target_dimensions,
            source_dimensions: self.source_dimensions,
            created_at: self.created_at,
            approved_at: None,
            state: JobState::Pending,
            sequence,
        }
    }
}
