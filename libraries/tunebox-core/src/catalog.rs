//! Catalog browsing with per-viewer favorite flags

use crate::error::Result;
use crate::storage::CatalogStore;
use crate::types::{Album, Artist, ArtistId, PlaylistTrack, UserId};
use std::collections::HashSet;
use std::sync::Arc;

/// Read-only access to artists, albums and tracks
pub struct Catalog<S> {
    store: Arc<S>,
}

impl<S> Clone for Catalog<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CatalogStore> Catalog<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Missing ids yield `None`, not an error
    pub async fn get_artist(&self, artist_id: ArtistId) -> Result<Option<Artist>> {
        self.store.get_artist(artist_id).await
    }

    /// All artists, albums included
    pub async fn list_artists(&self) -> Result<Vec<Artist>> {
        self.store.list_artists().await
    }

    pub async fn list_albums_by_artist(&self, artist_id: ArtistId) -> Result<Vec<Album>> {
        self.store.list_albums_by_artist(artist_id).await
    }

    /// Tracks on the artist's albums, flagged against the viewer's favorites.
    /// Without a viewer every flag is false.
    pub async fn list_tracks_by_artist(
        &self,
        artist_id: ArtistId,
        viewer: Option<&UserId>,
    ) -> Result<Vec<PlaylistTrack>> {
        let details = self.store.find_tracks_by_artist(artist_id).await?;

        let favorites = match viewer {
            Some(user_id) if !details.is_empty() => self.store.favorite_track_ids(user_id).await?,
            _ => HashSet::new(),
        };

        Ok(details
            .into_iter()
            .map(|detail| {
                let is_favorite = favorites.contains(&detail.track_id);
                PlaylistTrack::from_detail(detail, is_favorite)
            })
            .collect())
    }
}
