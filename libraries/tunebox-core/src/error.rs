/// Core error types for Tunebox
use crate::types::{PlaylistId, TrackId};
use thiserror::Error;

/// Result type alias using `LibraryError`
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Core error type for Tunebox
#[derive(Error, Debug)]
pub enum LibraryError {
    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Playlist not found, or not accessible to the user
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// A freshly allocated playlist id was already taken at commit
    #[error("Playlist id already allocated: {0}")]
    IdAllocationConflict(PlaylistId),

    /// Duplicate entry
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage-related errors (commit failures, connectivity, constraints)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LibraryError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error means the requested item no longer exists
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TrackNotFound(_) | Self::PlaylistNotFound(_))
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for LibraryError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
