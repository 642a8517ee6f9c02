//! # Crop Review
//!
//! An image crop service with a human review step. Clients upload an image
//! and name a crop type; the service produces a resized JPEG and holds it as
//! a *pending* crop until a reviewer approves or rejects it.
//!
//! # Architecture: Policy → Transform → Lifecycle
//!
//! ```text
//! 1. Policy     crop type + custom fields  →  ResizeSpec      (pure)
//! 2. Transform  source file + ResizeSpec   →  cropped-<id>.jpg (image backend)
//! 3. Lifecycle  job record                 →  pending / approved / removed
//! ```
//!
//! The HTTP layer in [`api`] is a thin shell over [`jobs::LifecycleManager`];
//! all state transitions, file cleanup, and error classification live below it
//! and are testable without a server.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`policy`] | Crop type → target box and fit mode; custom dimension validation |
//! | [`imaging`] | Image backend trait, cover/bounded geometry, JPEG output |
//! | [`jobs`] | Job records, the in-memory store, and lifecycle transitions |
//! | [`naming`] | Stored file names for uploads and derived artifacts |
//! | [`types`] | JSON shapes returned to HTTP clients |
//! | [`api`] | axum router, handlers, and error responses |
//! | [`server`] | Listener startup and graceful shutdown |
//! | [`config`] | `crop-review.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Map, Two Views
//!
//! Pending and approved jobs are a single keyed map with a state tag. Approval
//! flips the tag under the store lock, so no reader can see a job in both
//! collections or in neither.
//!
//! ## Commit First, Clean Up After
//!
//! Every transition is decided inside the store lock; files are removed after
//! it is released. If removal fails the transition still stands and the caller
//! gets a `cleanup_failure` error naming the files left behind.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate (Lanczos3 resampling, JPEG
//! encoding). No system libraries are needed.
//!
//! ## Volatile State
//!
//! Jobs live in memory and are lost on restart. Files written by a previous
//! run are not adopted.

pub mod api;
pub mod config;
pub mod imaging;
pub mod jobs;
pub mod naming;
pub mod output;
pub mod policy;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
