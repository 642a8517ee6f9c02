//! JSON shapes exchanged with HTTP clients.
//!
//! Field names are camelCase on the wire. Internal paths never appear here;
//! a job's derived artifact is exposed only as its URL path under
//! [`CROPPED_URL_PREFIX`].

use crate::imaging::Dimensions;
use crate::jobs::CropJob;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// URL path segment under which derived artifacts are served.
pub const CROPPED_URL_PREFIX: &str = "cropped";

/// A crop job as listed by `/api/pending` and `/api/approved`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub id: String,
    pub original_name: String,
    pub crop_type: String,
    /// Target box from the crop policy.
    pub dimensions: Dimensions,
    pub original_dimensions: Dimensions,
    pub created_at: DateTime<Utc>,
    pub cropped_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

impl From<&CropJob> for JobView {
    fn from(job: &CropJob) -> Self {
        let file_name = job
            .derived_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            id: job.id.to_string(),
            original_name: job.original_name.clone(),
            crop_type: job.crop_kind.to_string(),
            dimensions: job.target_dimensions,
            original_dimensions: job.source_dimensions,
            created_at: job.created_at,
            cropped_path: format!("{CROPPED_URL_PREFIX}/{file_name}"),
            approved_at: job.approved_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub crop_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Body of every error response. `kind` is a stable machine-readable tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}
