//! HTTP surface: upload, review queues, and approve/reject/delete actions.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | POST | `/upload` | [`handlers::upload`] |
//! | GET | `/api/pending` | [`handlers::list_pending`] |
//! | GET | `/api/approved` | [`handlers::list_approved`] |
//! | GET | `/api/presets` | [`handlers::list_presets`] |
//! | POST | `/api/approve/{id}` | [`handlers::approve`] |
//! | POST | `/api/reject/{id}` | [`handlers::reject`] |
//! | DELETE | `/api/delete/{id}` | [`handlers::delete`] |
//! | GET | `/cropped/*` | derived artifacts, served from the cropped directory |

pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::config::{ServiceConfig, effective_transform_slots};
use crate::jobs::LifecycleManager;
use crate::types::CROPPED_URL_PREFIX;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Allowance for multipart boundaries and the small text fields.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared state handed to every handler.
pub struct AppState {
    pub lifecycle: LifecycleManager,
    /// Bounds how many transforms run at once.
    pub transform_permits: Arc<Semaphore>,
}

impl AppState {
    pub fn new(lifecycle: LifecycleManager, transform_slots: usize) -> Self {
        Self {
            lifecycle,
            transform_permits: Arc::new(Semaphore::new(transform_slots.max(1))),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            LifecycleManager::from_config(config),
            effective_transform_slots(&config.processing),
        )
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let settings = state.lifecycle.settings();
    let body_limit = settings.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    let cropped = ServeDir::new(&settings.cropped_dir);

    Router::new()
        .route("/upload", post(handlers::upload))
        .route("/api/pending", get(handlers::list_pending))
        .route("/api/approved", get(handlers::list_approved))
        .route("/api/presets", get(handlers::list_presets))
        .route("/api/approve/{id}", post(handlers::approve))
        .route("/api/reject/{id}", post(handlers::reject))
        .route("/api/delete/{id}", delete(handlers::delete))
        .nest_service(&format!("/{CROPPED_URL_PREFIX}"), cropped)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
