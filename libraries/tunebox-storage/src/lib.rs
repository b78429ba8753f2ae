//! Tunebox Storage
//!
//! `SQLite` implementation of the Tunebox store contracts.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each entity owns its own queries (`artists`, `albums`,
//!   `tracks`, `playlists`)
//! - **Unit of Work**: Playlist mutations are committed in one transaction
//! - **Application-Allocated Ids**: Playlist ids come from
//!   `PlaylistStore::next_playlist_id`, guarded by the primary key at commit
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tunebox_core::{PlaylistManager, UserId};
//! use tunebox_storage::{create_pool, run_migrations, LocalStorageContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://tunebox.db").await?;
//! run_migrations(&pool).await?;
//!
//! let storage = Arc::new(LocalStorageContext::new(pool));
//! let mut manager = PlaylistManager::new(storage);
//! manager.load_playlists(&UserId::new("u1")).await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod albums;
pub mod artists;
pub mod playlists;
pub mod tracks;

pub use context::LocalStorageContext;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    tracing::debug!("Migrations applied");
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://tunebox.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    tracing::info!(url = %database_url, "Database pool ready");

    Ok(pool)
}
