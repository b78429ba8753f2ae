/// CLI error types
use thiserror::Error;
use tunebox_core::LibraryError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No user given (pass --user or set session.user_id)")]
    MissingUser,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<tunebox_storage::StorageError> for CliError {
    fn from(err: tunebox_storage::StorageError) -> Self {
        // Convert StorageError -> LibraryError -> CliError
        CliError::Library(err.into())
    }
}

impl CliError {
    /// Process exit code for the error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::MissingUser => 2,
            CliError::NotFound(_) => 3,
            CliError::Library(e) if e.is_not_found() => 3,
            CliError::Library(LibraryError::InvalidInput(_) | LibraryError::Duplicate(_)) => 4,
            _ => 1,
        }
    }
}
