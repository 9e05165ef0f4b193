use thiserror::Error;

use crate::chart::NoteId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Note already resolved: {0}")]
    AlreadyResolved(NoteId),

    #[error("Unknown note: {0}")]
    UnknownNote(NoteId),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Score submission failed: {0}")]
    NetworkSubmissionFailed(String),

    #[error("Leaderboard request failed: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Username is not set")]
    MissingUsername,

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Errors a running session recovers from locally
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::AlreadyResolved(_)
                | Error::StorageUnavailable(_)
                | Error::NetworkSubmissionFailed(_)
                | Error::Network(_)
        )
    }

    /// Failures of the leaderboard transport, as opposed to rejected data
    pub fn is_network(&self) -> bool {
        matches!(self, Error::NetworkSubmissionFailed(_) | Error::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.is_not_found());

        let other_io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err2 = Error::Io(other_io_err);
        assert!(!err2.is_not_found());
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::AlreadyResolved(NoteId::new("note_0")).is_recoverable());
        assert!(Error::StorageUnavailable("disk full".into()).is_recoverable());
        assert!(Error::NetworkSubmissionFailed("timeout".into()).is_recoverable());
        assert!(!Error::InvalidInput("lane 9".into()).is_recoverable());
        assert!(!Error::MissingUsername.is_recoverable());
        assert!(Error::Network("refused".into()).is_network());
        assert!(!Error::InvalidInput("limit".into()).is_network());
    }
}
