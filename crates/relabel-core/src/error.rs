//! Error types for relabel-core
//!
//! Three failure families, each with its own recovery policy: fetch
//! failures retain the previous snapshot and stay in the log, commit
//! failures block until the user sees them (their edit is not persisted),
//! playback failures surface non-blocking and return the controller to
//! idle. Transient network failures never crash the viewer; nothing retries
//! automatically — the user is the retry mechanism.

use thiserror::Error;

/// Row listing retrieval errors
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// Request could not be sent or the connection failed
    #[error("Request failed: {message}")]
    RequestFailed { message: String },

    /// Server answered with a non-success status
    #[error("Server returned status {status}")]
    Status { status: u16 },

    /// Response body did not decode as a row listing
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

/// Row update errors
#[derive(Error, Debug, Clone)]
pub enum CommitError {
    /// Request could not be sent or the connection failed
    #[error("Request failed: {message}")]
    RequestFailed { message: String },

    /// Server rejected the update
    #[error("Update rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Audio playback errors
#[derive(Error, Debug, Clone)]
pub enum PlaybackError {
    /// No audio output device available
    #[error("Audio output unavailable: {message}")]
    OutputUnavailable { message: String },

    /// Asset could not be retrieved from the media endpoint
    #[error("Media unavailable: {message}")]
    MediaUnavailable { message: String },

    /// Asset bytes did not decode as audio
    #[error("Decode failed: {message}")]
    DecodeFailed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Status { status: 503 };
        assert!(err.to_string().contains("503"));

        let err = CommitError::Rejected {
            status: 422,
            message: "bad row".to_string(),
        };
        assert!(err.to_string().contains("422"));
        assert!(err.to_string().contains("bad row"));

        let err = PlaybackError::DecodeFailed {
            message: "not audio".to_string(),
        };
        assert!(err.to_string().contains("not audio"));
    }
}
