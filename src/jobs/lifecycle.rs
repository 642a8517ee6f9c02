//! Crop job lifecycle: ingest, approve, reject, delete.
//!
//! ```text
//!             ingest                approve               delete
//!   upload ──────────▶ Pending ─────────────▶ Approved ──────────▶ (removed)
//!                         │
//!                         │ reject
//!                         ▼
//!                     (removed)
//! ```
//!
//! | Transition | Store effect | Files removed |
//! |---|---|---|
//! | ingest | insert Pending | none (both files created) |
//! | approve | Pending → Approved, `approved_at` set | source |
//! | reject | Pending record removed | source + derived |
//! | delete | Approved record removed | derived |
//!
//! Each transition is decided by one atomic store call; whichever caller
//! gets there first wins and later callers see [`LifecycleError::NotFound`].
//! File removal happens after the store call, outside its lock. If removal
//! fails the transition stays committed and [`LifecycleError::CleanupFailure`]
//! is returned.
//!
//! Ingest runs the image transform without touching the store and only
//! inserts once the derived file exists. A failed transform leaves no record
//! and no files behind.

use super::error::{Action, CleanupIssue, LifecycleError};
use super::job::{CropJob, JobId, JobState, NewJob};
use super::store::{JobStore, MemoryJobStore, StoreSnapshot};
use crate::config::ServiceConfig;
use crate::imaging::{self, ImageBackend, Quality, RustBackend, TransformOptions};
use crate::naming;
use crate::policy;
use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A decoded upload as delivered by the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub original_name: String,
    pub bytes: Vec<u8>,
    pub crop_type: String,
    pub custom_width: Option<String>,
    pub custom_height: Option<String>,
}

/// Where files live and how derived artifacts are encoded.
#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    pub uploads_dir: PathBuf,
    pub cropped_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub transform: TransformOptions,
}

impl LifecycleSettings {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            uploads_dir: config.storage.uploads_dir.clone(),
            cropped_dir: config.storage.cropped_dir.clone(),
            max_upload_bytes: config.server.max_upload_bytes,
            transform: TransformOptions {
                quality: Quality::new(config.output.quality),
                allow_upscale: config.output.allow_upscale,
            },
        }
    }
}

/// Owns every crop job transition. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct LifecycleManager {
    store: Arc<dyn JobStore>,
    backend: Arc<dyn ImageBackend>,
    settings: Arc<LifecycleSettings>,
}

impl LifecycleManager {
    pub fn new(
        store: Arc<dyn JobStore>,
        backend: Arc<dyn ImageBackend>,
        settings: LifecycleSettings,
    ) -> Self {
        Self {
            store,
            backend,
            settings: Arc::new(settings),
        }
    }

    /// Production wiring: in-memory store and the `image`-crate backend.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            Arc::new(MemoryJobStore::new()),
            Arc::new(RustBackend::new()),
            LifecycleSettings::from_config(config),
        )
    }

    pub fn settings(&self) -> &LifecycleSettings {
        &self.settings
    }

    /// Create the uploads and cropped directories if they do not exist.
    pub fn ensure_directories(&self) -> io::Result<()> {
        for dir in [&self.settings.uploads_dir, &self.settings.cropped_dir] {
            fs::create_dir_all(dir)?;
            debug!(dir = %dir.display(), "Storage directory ready");
        }
        Ok(())
    }

    /// Validate, store, transform and register an upload as a pending job.
    pub fn ingest(&self, upload: Upload) -> Result<CropJob, LifecycleError> {
        let spec = policy::resolve(
            &upload.crop_type,
            upload.custom_width.as_deref(),
            upload.custom_height.as_deref(),
        )?;
        self.check_upload_size(&upload.bytes)?;

        let id = JobId::new();
        let created_at = Utc::now();
        let source_path = self.settings.uploads_dir.join(naming::source_file_name(
            created_at.timestamp_millis(),
            &id,
            &upload.original_name,
        ));
        let derived_path = self
            .settings
            .cropped_dir
            .join(naming::derived_file_name(&id));

        fs::write(&source_path, &upload.bytes).map_err(|e| {
            LifecycleError::StorageFailure(format!(
                "writing upload {}: {e}",
                source_path.display()
            ))
        })?;

        let transformed = match imaging::transform(
            self.backend.as_ref(),
            &source_path,
            &derived_path,
            &spec,
            &self.settings.transform,
        ) {
            Ok(t) => t,
            Err(err) => {
                warn!(job_id = %id, error = %err, "Transform failed, discarding upload");
                discard_quietly(&[source_path.as_path(), derived_path.as_path()]);
                return Err(err.into());
            }
        };

        let new_job = NewJob {
            id,
            source_path: source_path.clone(),
            original_name: naming::display_name(&upload.original_name),
            derived_path: transformed.derived_path,
            crop_kind: spec.kind,
            target_dimensions: imaging::Dimensions::new(spec.width, spec.height),
            source_dimensions: transformed.source_dimensions,
            created_at,
        };
        let job = self.store.insert(new_job).map_err(|err| {
            discard_quietly(&[source_path.as_path(), derived_path.as_path()]);
            LifecycleError::StorageFailure(err.to_string())
        })?;

        info!(
            job_id = %job.id,
            crop_type = %job.crop_kind,
            width = spec.width,
            height = spec.height,
            fit = %spec.fit,
            source_width = job.source_dimensions.width,
            source_height = job.source_dimensions.height,
            "Crop job pending review"
        );
        Ok(job)
    }

    /// Pending → Approved. Deletes the source upload; keeps the derived file.
    pub fn approve(&self, id: JobId) -> Result<CropJob, LifecycleError> {
        let (job, released) = self
            .store
            .approve(id, Utc::now())
            .ok_or_else(|| LifecycleError::not_found(id))?;
        info!(job_id = %id, "Crop job approved");

        let paths: Vec<&Path> = released.as_deref().into_iter().collect();
        finish_cleanup(Action::Approve, id, &paths)?;
        Ok(job)
    }

    /// Remove a pending job along with its source and derived files.
    pub fn reject(&self, id: JobId) -> Result<CropJob, LifecycleError> {
        let job = self
            .store
            .remove(id, JobState::Pending)
            .ok_or_else(|| LifecycleError::not_found(id))?;
        info!(job_id = %id, "Crop job rejected");

        let mut paths: Vec<&Path> = job.source_path.as_deref().into_iter().collect();
        paths.push(&job.derived_path);
        finish_cleanup(Action::Reject, id, &paths)?;
        Ok(job)
    }

    /// Remove an approved job along with its derived file.
    pub fn delete(&self, id: JobId) -> Result<CropJob, LifecycleError> {
        let job = self
            .store
            .remove(id, JobState::Approved)
            .ok_or_else(|| LifecycleError::not_found(id))?;
        info!(job_id = %id, "Approved crop deleted");

        finish_cleanup(Action::Delete, id, &[job.derived_path.as_path()])?;
        Ok(job)
    }

    pub fn get(&self, id: JobId) -> Option<CropJob> {
        self.store.get(id)
    }

    pub fn list_pending(&self) -> Vec<CropJob> {
        self.store.list(JobState::Pending)
    }

    pub fn list_approved(&self) -> Vec<CropJob> {
        self.store.list(JobState::Approved)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    fn check_upload_size(&self, bytes: &[u8]) -> Result<(), LifecycleError> {
        if bytes.is_empty() {
            return Err(LifecycleError::InvalidUpload(
                "No image file uploaded".to_string(),
            ));
        }
        let limit = self.settings.max_upload_bytes;
        if bytes.len() > limit {
            return Err(LifecycleError::InvalidUpload(format!(
                "File too large: {} bytes exceeds the {} byte limit",
                bytes.len(),
                limit
            )));
        }
        Ok(())
    }
}

/// Remove every path, collecting failures instead of stopping at the first.
fn remove_all(paths: &[&Path]) -> Vec<CleanupIssue> {
    paths
        .iter()
        .filter_map(|path| {
            fs::remove_file(path).err().map(|error| CleanupIssue {
                path: path.to_path_buf(),
                error,
            })
        })
        .collect()
}

/// Remove the files a committed transition released.
fn finish_cleanup(action: Action, id: JobId, paths: &[&Path]) -> Result<(), LifecycleError> {
    let issues = remove_all(paths);
    if issues.is_empty() {
        return Ok(());
    }
    for issue in &issues {
        warn!(
            job_id = %id,
            action = %action,
            path = %issue.path.display(),
            error = %issue.error,
            "File cleanup failed after committed transition"
        );
    }
    Err(LifecycleError::CleanupFailure { action, id, issues })
}

/// Best-effort removal for files that never became part of a job.
fn discard_quietly(paths: &[&Path]) {
    for issue in remove_all(paths) {
        if issue.error.kind() != io::ErrorKind::NotFound {
            warn!(path = %issue.path.display(), error = %issue.error, "Could not discard file");
        }
    }
}
