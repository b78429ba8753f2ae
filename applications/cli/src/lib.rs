//! Tunebox CLI Library
//!
//! Command-line front end over the Tunebox playlist core: browse the
//! catalog, manage playlists and toggle favorites for one user.
//!
//! This library exposes the core components for testing purposes.

pub mod commands;
pub mod config;
pub mod error;

// Re-export commonly used types for convenience
pub use commands::{resolve_identity, Command, Session};
pub use config::CliConfig;
pub use error::{CliError, Result};
