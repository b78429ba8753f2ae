use crate::{albums, artists, playlists, tracks};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tunebox_core::{
    Album, Artist, ArtistId, CatalogStore, Playlist, PlaylistDetail, PlaylistId, PlaylistStore,
    Result, Track, TrackDetail, TrackId, UnitOfWork, UserId,
};

/// Local storage context using `SQLite`
///
/// Clones share the pool and the playlist id reservation, so every session
/// of one process should use clones of the same context.
#[derive(Clone)]
pub struct LocalStorageContext {
    pool: SqlitePool,
    last_reserved_playlist_id: Arc<AtomicI64>,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            last_reserved_playlist_id: Arc::new(AtomicI64::new(0)),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PlaylistStore for LocalStorageContext {
    async fn find_playlists_for_user(&self, user_id: &UserId) -> Result<Vec<Playlist>> {
        playlists::get_for_user(&self.pool, user_id).await
    }

    async fn find_track(&self, id: TrackId) -> Result<Option<Track>> {
        tracks::get_by_id(&self.pool, id).await
    }

    async fn find_user_playlist_by_id(
        &self,
        user_id: &UserId,
        id: PlaylistId,
    ) -> Result<Option<Playlist>> {
        playlists::get_user_playlist_by_id(&self.pool, user_id, id).await
    }

    async fn find_user_playlist_by_name(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<Option<Playlist>> {
        playlists::get_user_playlist_by_name(&self.pool, user_id, name).await
    }

    async fn find_playlist_detail(&self, id: PlaylistId) -> Result<Option<PlaylistDetail>> {
        playlists::get_detail(&self.pool, id).await
    }

    async fn next_playlist_id(&self) -> Result<PlaylistId> {
        let max_id = playlists::max_id(&self.pool).await?;

        // Reserved ids stay taken even if their commit never happens
        let previous = self
            .last_reserved_playlist_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(last.max(max_id) + 1)
            })
            .unwrap_or_else(|last| last);

        Ok(previous.max(max_id) + 1)
    }

    async fn persist(&self, work: UnitOfWork) -> Result<()> {
        playlists::persist(&self.pool, work).await
    }
}

#[async_trait]
impl CatalogStore for LocalStorageContext {
    async fn get_artist(&self, id: ArtistId) -> Result<Option<Artist>> {
        artists::get_by_id(&self.pool, id).await
    }

    async fn list_artists(&self) -> Result<Vec<Artist>> {
        artists::get_all(&self.pool).await
    }

    async fn list_albums_by_artist(&self, artist_id: ArtistId) -> Result<Vec<Album>> {
        albums::get_by_artist(&self.pool, artist_id).await
    }

    async fn find_tracks_by_artist(&self, artist_id: ArtistId) -> Result<Vec<TrackDetail>> {
        tracks::get_by_artist(&self.pool, artist_id).await
    }

    async fn favorite_track_ids(&self, user_id: &UserId) -> Result<HashSet<TrackId>> {
        playlists::favorite_track_ids(&self.pool, user_id).await
    }
}
