//! Tunebox Core
//!
//! Per-user music library view: catalog browsing, user playlists and the
//! single "Favorites" playlist each user gets on their first favorite.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Artist`, `Album`, `Track`, `Playlist` and their projections
//! - **Store Contracts**: `PlaylistStore` and `CatalogStore`, implemented by
//!   `tunebox-storage`
//! - **Services**: `Catalog` for browsing, `PlaylistManager` for mutations,
//!   `PlaylistViewCache` mirroring a session's playlists
//! - **Error Handling**: Unified `LibraryError` and `Result` types
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tunebox_core::{PlaylistManager, PlaylistStore, UserId};
//!
//! # async fn example<S: PlaylistStore>(store: Arc<S>) -> tunebox_core::Result<()> {
//! let user = UserId::new("u1");
//! let mut manager = PlaylistManager::new(store);
//! manager.subscribe(|| println!("playlists changed"));
//!
//! manager.load_playlists(&user).await?;
//! manager.toggle_favorite(42, &user).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod identity;
pub mod manager;
pub mod storage;
pub mod types;
pub mod view_cache;

// Re-export commonly used types
pub use catalog::Catalog;
pub use error::{LibraryError, Result};
pub use identity::{Claim, Identity};
pub use manager::{PlaylistManager, MAX_ID_ALLOCATION_ATTEMPTS};
pub use storage::{CatalogStore, Mutation, PlaylistStore, UnitOfWork};
pub use view_cache::{PlaylistViewCache, SubscriptionId};

pub use types::{
    Album, AlbumId, Artist, ArtistId, Playlist, PlaylistDetail, PlaylistId, PlaylistTrack,
    PlaylistView, Track, TrackDetail, TrackId, UserId, UserPlaylist, FAVORITES_PLAYLIST_NAME,
    PLACEHOLDER,
};
