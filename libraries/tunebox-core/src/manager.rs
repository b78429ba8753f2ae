//! Playlist and favorites management for one user session
//!
//! Every operation reads from the store, commits one [`UnitOfWork`], and only
//! then updates the session's [`PlaylistViewCache`]. A failed commit leaves the
//! cache untouched.

use crate::error::{LibraryError, Result};
use crate::storage::{Mutation, PlaylistStore, UnitOfWork};
use crate::types::{
    Playlist, PlaylistId, PlaylistTrack, PlaylistView, Track, TrackId, UserId,
    FAVORITES_PLAYLIST_NAME, PLACEHOLDER,
};
use crate::view_cache::{PlaylistViewCache, SubscriptionId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How many ids are tried before a creation gives up
pub const MAX_ID_ALLOCATION_ATTEMPTS: usize = 3;

pub struct PlaylistManager<S> {
    store: Arc<S>,
    cache: PlaylistViewCache,
}

impl<S: PlaylistStore> PlaylistManager<S> {
    /// Create a manager with an empty cache
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            cache: PlaylistViewCache::new(),
        }
    }

    pub fn cache(&self) -> &PlaylistViewCache {
        &self.cache
    }

    /// Listen for changes to the session's playlists
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.cache.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.cache.unsubscribe(id)
    }

    /// Rebuild the cache from the user's named playlists
    pub async fn load_playlists(&mut self, user_id: &UserId) -> Result<&[Playlist]> {
        let playlists = self.store.find_playlists_for_user(user_id).await?;
        debug!(user = %user_id, count = playlists.len(), "Loaded playlists");
        self.cache.set_all(playlists);
        Ok(self.cache.playlists())
    }

    /// Create a named playlist owned by the user, seeded with one track
    pub async fn create_playlist(
        &mut self,
        name: &str,
        user_id: &UserId,
        seed_track_id: TrackId,
    ) -> Result<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::invalid_input("Playlist name must not be empty"));
        }
        if name == FAVORITES_PLAYLIST_NAME {
            return Err(LibraryError::invalid_input(format!(
                "\"{}\" is reserved",
                FAVORITES_PLAYLIST_NAME
            )));
        }

        let track = self.require_track(seed_track_id).await?;
        let playlist = self
            .create_with_fresh_id(user_id, |id| Playlist::new(id, name, vec![track.clone()]))
            .await?;

        info!(
            user = %user_id,
            playlist_id = playlist.id,
            name = %name,
            "Created playlist"
        );
        self.cache.add(playlist.clone());
        Ok(playlist)
    }

    /// Add a track to one of the user's playlists; adding twice is a no-op
    pub async fn add_track(
        &mut self,
        playlist_id: PlaylistId,
        user_id: &UserId,
        track_id: TrackId,
    ) -> Result<Playlist> {
        let mut playlist = self
            .store
            .find_user_playlist_by_id(user_id, playlist_id)
            .await?
            .ok_or(LibraryError::PlaylistNotFound(playlist_id))?;
        let track = self.require_track(track_id).await?;

        let mut work = UnitOfWork::new();
        if playlist.insert_track(track) {
            work.push(Mutation::AddTrack {
                playlist_id,
                track_id,
            });
        } else {
            debug!(playlist_id, track_id, "Track already in playlist");
        }

        self.store.persist(work).await?;
        self.sync_cache(&playlist);
        Ok(playlist)
    }

    /// Remove a track from one of the user's playlists
    ///
    /// The favorites playlist is not reachable through here; it only changes
    /// through [`toggle_favorite`](Self::toggle_favorite). Removing an absent
    /// track is a no-op.
    pub async fn remove_track(
        &mut self,
        playlist_id: PlaylistId,
        user_id: &UserId,
        track_id: TrackId,
    ) -> Result<Track> {
        let mut playlist = self
            .store
            .find_user_playlist_by_id(user_id, playlist_id)
            .await?
            .filter(|p| !p.is_favorites())
            .ok_or(LibraryError::PlaylistNotFound(playlist_id))?;
        let track = self.require_track(track_id).await?;

        let mut work = UnitOfWork::new();
        if playlist.remove_track(track_id) {
            work.push(Mutation::RemoveTrack {
                playlist_id,
                track_id,
            });
        } else {
            debug!(playlist_id, track_id, "Track not in playlist");
        }

        self.store.persist(work).await?;
        self.sync_cache(&playlist);
        Ok(track)
    }

    /// Playlist with album, artist and favorite data for the viewer
    pub async fn get_playlist(
        &self,
        playlist_id: PlaylistId,
        viewer: &UserId,
    ) -> Result<Option<PlaylistView>> {
        let Some(detail) = self.store.find_playlist_detail(playlist_id).await? else {
            return Ok(None);
        };
        let favorites = self.favorite_track_ids(viewer).await?;

        Ok(Some(PlaylistView {
            id: detail.id,
            name: detail.name.unwrap_or_else(|| PLACEHOLDER.to_string()),
            tracks: detail
                .tracks
                .into_iter()
                .map(|track| {
                    let is_favorite = favorites.contains(&track.track_id);
                    PlaylistTrack::from_detail(track, is_favorite)
                })
                .collect(),
        }))
    }

    /// Flip the favorite state of a track for the user
    ///
    /// Returns false without touching anything if the track does not exist.
    /// The favorites playlist is created on the first favorite and kept
    /// afterwards, even when emptied.
    pub async fn toggle_favorite(&mut self, track_id: TrackId, user_id: &UserId) -> Result<bool> {
        let Some(track) = self.store.find_track(track_id).await? else {
            debug!(track_id, "Ignoring favorite toggle for unknown track");
            return Ok(false);
        };

        match self.favorites(user_id).await? {
            None => {
                let playlist = self
                    .create_with_fresh_id(user_id, |id| {
                        Playlist::new(id, FAVORITES_PLAYLIST_NAME, vec![track.clone()])
                    })
                    .await?;
                info!(
                    user = %user_id,
                    track_id,
                    playlist_id = playlist.id,
                    "Created favorites playlist"
                );
                self.cache.add(playlist);
            }
            Some(mut favorites) => {
                let playlist_id = favorites.id;
                let (mutation, favorited) = if favorites.remove_track(track_id) {
                    (
                        Mutation::RemoveTrack {
                            playlist_id,
                            track_id,
                        },
                        false,
                    )
                } else {
                    favorites.insert_track(track);
                    (
                        Mutation::AddTrack {
                            playlist_id,
                            track_id,
                        },
                        true,
                    )
                };

                self.store.persist(UnitOfWork::new().with(mutation)).await?;
                info!(user = %user_id, track_id, favorited, "Toggled favorite");
                self.sync_cache(&favorites);
            }
        }

        Ok(true)
    }

    /// Whether the track is in the user's favorites playlist
    pub async fn is_favorite(&self, track_id: TrackId, user_id: &UserId) -> Result<bool> {
        Ok(self
            .favorites(user_id)
            .await?
            .is_some_and(|p| p.contains_track(track_id)))
    }

    async fn favorites(&self, user_id: &UserId) -> Result<Option<Playlist>> {
        self.store
            .find_user_playlist_by_name(user_id, FAVORITES_PLAYLIST_NAME)
            .await
    }

    async fn favorite_track_ids(&self, user_id: &UserId) -> Result<HashSet<TrackId>> {
        Ok(self
            .favorites(user_id)
            .await?
            .map(|p| p.track_ids().collect())
            .unwrap_or_default())
    }

    async fn require_track(&self, track_id: TrackId) -> Result<Track> {
        self.store
            .find_track(track_id)
            .await?
            .ok_or(LibraryError::TrackNotFound(track_id))
    }

    /// Allocate an id, build the playlist and commit it with its owner link,
    /// re-allocating when the id turns out to be taken
    async fn create_with_fresh_id<F>(&self, owner: &UserId, build: F) -> Result<Playlist>
    where
        F: Fn(PlaylistId) -> Playlist,
    {
        for attempt in 1..=MAX_ID_ALLOCATION_ATTEMPTS {
            let id = self.store.next_playlist_id().await?;
            let playlist = build(id);
            let work = UnitOfWork::new().with(Mutation::CreatePlaylist {
                playlist: playlist.clone(),
                owner: owner.clone(),
            });

            match self.store.persist(work).await {
                Ok(()) => return Ok(playlist),
                Err(LibraryError::IdAllocationConflict(taken)) => {
                    warn!(playlist_id = taken, attempt, "Playlist id already taken");
                }
                Err(e) => return Err(e),
            }
        }

        Err(LibraryError::storage(format!(
            "Could not allocate a playlist id after {} attempts",
            MAX_ID_ALLOCATION_ATTEMPTS
        )))
    }

    // Unnamed playlists are never listed, so they stay out of the cache
    fn sync_cache(&mut self, playlist: &Playlist) {
        if playlist.name.is_some() {
            self.cache.update(playlist.clone());
        }
    }
}
