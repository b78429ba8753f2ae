/// Playlist domain types
use super::{PlaylistId, PlaylistTrack, Track, TrackDetail, TrackId, UserId, PLACEHOLDER};
use serde::{Deserialize, Serialize};

/// Reserved name of the per-user favorites playlist
pub const FAVORITES_PLAYLIST_NAME: &str = "Favorites";

/// Playlist with its track set
///
/// Track membership is set-like: a track appears at most once, in insertion
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier (global across users)
    pub id: PlaylistId,

    /// Display name; system playlists may have none
    pub name: Option<String>,

    /// Tracks in the playlist
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Playlist {
    /// Create a playlist seeded with a set of tracks
    pub fn new(id: PlaylistId, name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let mut playlist = Self {
            id,
            name: Some(name.into()),
            tracks: Vec::with_capacity(tracks.len()),
        };
        for track in tracks {
            playlist.insert_track(track);
        }
        playlist
    }

    /// Whether this is the reserved favorites playlist
    pub fn is_favorites(&self) -> bool {
        self.name.as_deref() == Some(FAVORITES_PLAYLIST_NAME)
    }

    /// Name for display, falling back to the placeholder
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn contains_track(&self, track_id: TrackId) -> bool {
        self.tracks.iter().any(|t| t.id == track_id)
    }

    /// Add a track unless already present. Returns true if the set changed.
    pub fn insert_track(&mut self, track: Track) -> bool {
        if self.contains_track(track.id) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Remove a track if present. Returns true if the set changed.
    pub fn remove_track(&mut self, track_id: TrackId) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| t.id != track_id);
        self.tracks.len() != before
    }

    pub fn track_ids(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.tracks.iter().map(|t| t.id)
    }
}

/// Link granting a user access to a playlist
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserPlaylist {
    pub user_id: UserId,
    pub playlist_id: PlaylistId,
}

/// Playlist with joined track rows, as read from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistDetail {
    pub id: PlaylistId,
    pub name: Option<String>,
    pub tracks: Vec<TrackDetail>,
}

/// Playlist projected for a specific viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistView {
    pub id: PlaylistId,
    pub name: String,
    pub tracks: Vec<PlaylistTrack>,
}

impl PlaylistView {
    pub fn track(&self, track_id: TrackId) -> Option<&PlaylistTrack> {
        self.tracks.iter().find(|t| t.track_id == track_id)
    }
}
