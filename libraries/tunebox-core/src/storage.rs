//! Store contracts consumed by the catalog and the playlist manager
//!
//! Any storage engine can sit behind these traits; the SQLite one lives in
//! `tunebox-storage`.

use crate::error::Result;
use crate::types::{
    Album, Artist, ArtistId, Playlist, PlaylistDetail, PlaylistId, Track, TrackDetail, TrackId,
    UserId,
};
use async_trait::async_trait;
use std::collections::HashSet;

/// A pending change recorded in a [`UnitOfWork`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Insert a playlist, its owner link and its seed tracks
    CreatePlaylist { playlist: Playlist, owner: UserId },
    /// Add a track to a playlist; no-op if already present
    AddTrack {
        playlist_id: PlaylistId,
        track_id: TrackId,
    },
    /// Remove a track from a playlist; no-op if absent
    RemoveTrack {
        playlist_id: PlaylistId,
        track_id: TrackId,
    },
}

/// Mutations of one logical operation, committed atomically by
/// [`PlaylistStore::persist`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitOfWork {
    mutations: Vec<Mutation>,
}

impl UnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mutation: Mutation) {
        self.mutations.push(mutation);
    }

    pub fn with(mut self, mutation: Mutation) -> Self {
        self.push(mutation);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn into_mutations(self) -> Vec<Mutation> {
        self.mutations
    }
}

/// Persistence contract of the playlist manager
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Named playlists linked to the user, tracks loaded
    async fn find_playlists_for_user(&self, user_id: &UserId) -> Result<Vec<Playlist>>;

    /// Get track by ID
    async fn find_track(&self, id: TrackId) -> Result<Option<Track>>;

    /// Playlist with the given id, if linked to the user
    async fn find_user_playlist_by_id(
        &self,
        user_id: &UserId,
        id: PlaylistId,
    ) -> Result<Option<Playlist>>;

    /// First playlist with the given name linked to the user
    async fn find_user_playlist_by_name(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<Option<Playlist>>;

    /// Playlist with album and artist data joined onto its tracks,
    /// regardless of which users it is linked to
    async fn find_playlist_detail(&self, id: PlaylistId) -> Result<Option<PlaylistDetail>>;

    /// Reserve an identifier for a new playlist
    ///
    /// Never below the current maximum plus one, and never handed out twice
    /// by the same store. Another writer on the same database can still take
    /// it first, which `persist` reports as
    /// [`LibraryError::IdAllocationConflict`](crate::LibraryError::IdAllocationConflict).
    async fn next_playlist_id(&self) -> Result<PlaylistId>;

    /// Commit all mutations in one transaction; nothing is written on error
    async fn persist(&self, work: UnitOfWork) -> Result<()>;
}

/// Read-only catalog queries
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Get artist by ID (albums not loaded)
    async fn get_artist(&self, id: ArtistId) -> Result<Option<Artist>>;

    /// Get all artists with their albums
    async fn list_artists(&self) -> Result<Vec<Artist>>;

    /// Get albums by artist
    async fn list_albums_by_artist(&self, artist_id: ArtistId) -> Result<Vec<Album>>;

    /// Tracks whose album belongs to the artist
    async fn find_tracks_by_artist(&self, artist_id: ArtistId) -> Result<Vec<TrackDetail>>;

    /// Tracks in the user's favorites playlist
    async fn favorite_track_ids(&self, user_id: &UserId) -> Result<HashSet<TrackId>>;
}
