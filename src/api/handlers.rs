//! Route handlers.
//!
//! Lifecycle calls do blocking file and image work, so every one of them runs
//! on the blocking pool. Ingest additionally holds a transform permit for the
//! duration of the call.

use super::AppState;
use super::error::ApiError;
use crate::jobs::{CropJob, JobId, LifecycleError, LifecycleManager, Upload};
use crate::policy::{self, ResizeSpec};
use crate::types::{ActionResponse, JobView, UploadResponse};
use axum::Json;
use axum::extract::{Multipart, Path, State};
use std::sync::Arc;

/// Multipart field carrying the image file.
const IMAGE_FIELD: &str = "image";

/// Run a blocking lifecycle call off the async runtime.
async fn run_blocking<T, F>(lifecycle: &LifecycleManager, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(LifecycleManager) -> Result<T, LifecycleError> + Send + 'static,
{
    let lifecycle = lifecycle.clone();
    tokio::task::spawn_blocking(move || f(lifecycle))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

fn parse_id(raw: &str) -> Result<JobId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::from(LifecycleError::not_found(raw)))
}

fn views(jobs: &[CropJob]) -> Vec<JobView> {
    jobs.iter().map(JobView::from).collect()
}

fn invalid_upload(err: axum::extract::multipart::MultipartError) -> ApiError {
    LifecycleError::InvalidUpload(format!("Malformed upload: {}", err.body_text())).into()
}

/// Collect the upload form. Unknown fields are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut upload = Upload::default();
    while let Some(field) = multipart.next_field().await.map_err(invalid_upload)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            IMAGE_FIELD => {
                upload.original_name = field.file_name().unwrap_or_default().to_string();
                upload.bytes = field.bytes().await.map_err(invalid_upload)?.to_vec();
            }
            "cropType" => upload.crop_type = field.text().await.map_err(invalid_upload)?,
            "customWidth" => {
                upload.custom_width = Some(field.text().await.map_err(invalid_upload)?)
            }
            "customHeight" => {
                upload.custom_height = Some(field.text().await.map_err(invalid_upload)?)
            }
            _ => {}
        }
    }
    Ok(upload)
}

/// `POST /upload`
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let upload = read_upload(multipart).await?;
    let permit = state
        .transform_permits
        .clone()
        .acquire_owned()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let job = run_blocking(&state.lifecycle, move |lifecycle| {
        let _permit = permit;
        lifecycle.ingest(upload)
    })
    .await?;

    Ok(Json(UploadResponse {
        success: true,
        crop_id: job.id.to_string(),
        message: "Image cropped successfully and pending approval".to_string(),
    }))
}

/// `GET /api/pending`
pub async fn list_pending(State(state): State<Arc<AppState>>) -> Json<Vec<JobView>> {
    Json(views(&state.lifecycle.list_pending()))
}

/// `GET /api/approved`
pub async fn list_approved(State(state): State<Arc<AppState>>) -> Json<Vec<JobView>> {
    Json(views(&state.lifecycle.list_approved()))
}

/// `GET /api/presets`
pub async fn list_presets() -> Json<Vec<ResizeSpec>> {
    Json(policy::presets())
}

/// `POST /api/approve/{id}`
pub async fn approve(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ActionResponse>, ApiError> {
    let id = parse_id(&raw_id)?;
    run_blocking(&state.lifecycle, move |lifecycle| lifecycle.approve(id)).await?;
    Ok(Json(ActionResponse::ok("Crop approved successfully")))
}

/// `POST /api/reject/{id}`
pub async fn reject(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ActionResponse>, ApiError> {
    let id = parse_id(&raw_id)?;
    run_blocking(&state.lifecycle, move |lifecycle| lifecycle.reject(id)).await?;
    Ok(Json(ActionResponse::ok("Crop rejected and files cleaned up")))
}

/// `DELETE /api/delete/{id}`
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ActionResponse>, ApiError> {
    let id = parse_id(&raw_id)?;
    run_blocking(&state.lifecycle, move |lifecycle| lifecycle.delete(id)).await?;
    Ok(Json(ActionResponse::ok("Approved crop deleted successfully")))
}
