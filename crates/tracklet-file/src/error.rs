//! Error types for the tracklet file crate (thiserror-based).

use thiserror::Error;

/// Errors that can occur while reading or writing tracklet files.
#[derive(Error, Debug)]
pub enum FileError {
    /// File I/O error (read, write, rename).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON syntax or shape error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed as JSON but is not a tracklet list.
    #[error("Invalid tracklet document: {reason}")]
    InvalidDocument { reason: String },

    /// Two records share a tracklet id.
    #[error("Duplicate tracklet id: {id}")]
    DuplicateTrackletId { id: String },

    /// An image name repeats within one tracklet.
    #[error("Duplicate image {name} in tracklet {tracklet_id}")]
    DuplicateImage { tracklet_id: String, name: String },

    /// The file path does not exist.
    #[error("Tracklet file not found: {path}")]
    NotFound { path: String },
}

/// Convenience Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = FileError::InvalidDocument {
            reason: "expected an array".into(),
        };
        assert!(err.to_string().contains("expected an array"));

        let err = FileError::DuplicateTrackletId { id: "4".into() };
        assert!(err.to_string().contains('4'));

        let err = FileError::DuplicateImage {
            tracklet_id: "2".into(),
            name: "2_a.jpg".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2_a.jpg") && msg.contains("tracklet 2"));

        let err = FileError::NotFound {
            path: "/tmp/missing.json".into(),
        };
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: FileError = io_err.into();
        assert!(matches!(err, FileError::Io(_)));
    }

    #[test]
    fn json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: FileError = json_err.into();
        assert!(matches!(err, FileError::Json(_)));
    }
}
