//! Error taxonomy for the crop job lifecycle.

use super::job::JobId;
use crate::imaging::BackendError;
use crate::policy::CropSpecError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The lifecycle transition an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Approve,
    Reject,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Approve => f.write_str("approve"),
            Action::Reject => f.write_str("reject"),
            Action::Delete => f.write_str("delete"),
        }
    }
}

/// A file that could not be removed after a committed transition.
#[derive(Debug)]
pub struct CleanupIssue {
    pub path: PathBuf,
    pub error: io::Error,
}

impl fmt::Display for CleanupIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

fn join_issues(issues: &[CleanupIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error(transparent)]
    InvalidCropSpec(#[from] CropSpecError),
    #[error("{0}")]
    InvalidUpload(String),
    #[error("Failed to process image: {0}")]
    DecodeFailure(String),
    #[error("Failed to process image: {0}")]
    UnsupportedFormat(String),
    #[error("Storage error: {0}")]
    StorageFailure(String),
    /// Unknown id, or an id whose job was already removed or is in the other collection.
    #[error("Crop not found: {0}")]
    NotFound(String),
    /// The transition was committed; only file removal failed.
    #[error("{action} of crop {id} was applied, but file cleanup failed: {}", join_issues(.issues))]
    CleanupFailure {
        action: Action,
        id: JobId,
        issues: Vec<CleanupIssue>,
    },
}

/// Machine-readable error category, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCropSpec,
    InvalidUpload,
    DecodeFailure,
    UnsupportedFormat,
    StorageFailure,
    NotFound,
    CleanupFailure,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidCropSpec => "invalid_crop_spec",
            ErrorKind::InvalidUpload => "invalid_upload",
            ErrorKind::DecodeFailure => "decode_failure",
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::StorageFailure => "storage_failure",
            ErrorKind::NotFound => "not_found",
            ErrorKind::CleanupFailure => "cleanup_failure",
        }
    }
}

impl LifecycleError {
    pub fn not_found(id: impl fmt::Display) -> Self {
        LifecycleError::NotFound(id.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LifecycleError::InvalidCropSpec(_) => ErrorKind::InvalidCropSpec,
            LifecycleError::InvalidUpload(_) => ErrorKind::InvalidUpload,
            LifecycleError::DecodeFailure(_) => ErrorKind::DecodeFailure,
            LifecycleError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            LifecycleError::StorageFailure(_) => ErrorKind::StorageFailure,
            LifecycleError::NotFound(_) => ErrorKind::NotFound,
            LifecycleError::CleanupFailure { .. } => ErrorKind::CleanupFailure,
        }
    }

    /// Whether the caller sent something unusable (as opposed to a server fault).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidCropSpec | ErrorKind::InvalidUpload | ErrorKind::NotFound
        )
    }
}

impl From<BackendError> for LifecycleError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Decode(msg) => LifecycleError::DecodeFailure(msg),
            BackendError::UnsupportedFormat(msg) => LifecycleError::UnsupportedFormat(msg),
            BackendError::Io(e) => LifecycleError::StorageFailure(e.to_string()),
            BackendError::Encode(msg) => LifecycleError::StorageFailure(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_map_to_lifecycle_kinds() {
        let cases = [
            (BackendError::Decode("x".into()), ErrorKind::DecodeFailure),
            (
                BackendError::UnsupportedFormat("gif".into()),
                ErrorKind::UnsupportedFormat,
            ),
            (
                BackendError::Io(io::Error::other("disk full")),
                ErrorKind::StorageFailure,
            ),
            (BackendError::Encode("x".into()), ErrorKind::StorageFailure),
        ];
        for (backend, kind) in cases {
            assert_eq!(LifecycleError::from(backend).kind(), kind);
        }
    }

    #[test]
    fn crop_spec_error_keeps_its_message() {
        let err = LifecycleError::from(CropSpecError::MissingCustomDimensions);
        assert_eq!(err.kind(), ErrorKind::InvalidCropSpec);
        assert_eq!(err.to_string(), "Custom width and height are required");
        assert!(err.is_client_error());
    }

    #[test]
    fn cleanup_failure_message_lists_paths() {
        let id = JobId::new();
        let err = LifecycleError::CleanupFailure {
            action: Action::Reject,
            id,
            issues: vec![
                CleanupIssue {
                    path: "uploads/a.jpg".into(),
                    error: io::Error::from(io::ErrorKind::PermissionDenied),
                },
                CleanupIssue {
                    path: "cropped/b.jpg".into(),
                    error: io::Error::from(io::ErrorKind::NotFound),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with(&format!("reject of crop {id} was applied")));
        assert!(msg.contains("uploads/a.jpg"));
        assert!(msg.contains("cropped/b.jpg"));
        assert!(!err.is_client_error());
    }

    #[test]
    fn not_found_is_client_error() {
        let err = LifecycleError::not_found("abc");
        assert_eq!(err.kind().as_str(), "not_found");
        assert!(err.is_client_error());
    }
}
