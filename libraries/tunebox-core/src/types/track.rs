//! Track types and the per-viewer track projection

use super::{AlbumId, TrackId, PLACEHOLDER};
use serde::{Deserialize, Serialize};

/// A track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    /// Tracks may exist without an album
    pub album_id: Option<AlbumId>,
}

/// Track row joined with its album and artist, as read from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDetail {
    pub track_id: TrackId,
    pub track_name: String,
    pub album_title: Option<String>,
    pub artist_name: Option<String>,
}

/// Track as presented to a specific viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub track_id: TrackId,
    pub track_name: String,
    pub album_title: String,
    pub artist_name: String,
    pub is_favorite: bool,
}

impl PlaylistTrack {
    /// Project a store row, substituting the placeholder for missing names
    pub fn from_detail(detail: TrackDetail, is_favorite: bool) -> Self {
        Self {
            track_id: detail.track_id,
            track_name: detail.track_name,
            album_title: detail
                .album_title
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            artist_name: detail
                .artist_name
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            is_favorite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_uses_placeholder_for_missing_album_and_artist() {
        let detail = TrackDetail {
            track_id: 3,
            track_name: "Loose Track".to_string(),
            album_title: None,
            artist_name: None,
        };

        let track = PlaylistTrack::from_detail(detail, true);
        assert_eq!(track.album_title, "-");
        assert_eq!(track.artist_name, "-");
        assert!(track.is_favorite);
    }

    #[test]
    fn projection_keeps_present_names() {
        let detail = TrackDetail {
            track_id: 1,
            track_name: "For Those About To Rock".to_string(),
            album_title: Some("For Those About To Rock We Salute You".to_string()),
            artist_name: Some("AC/DC".to_string()),
        };

        let track = PlaylistTrack::from_detail(detail, false);
        assert_eq!(track.album_title, "For Those About To Rock We Salute You");
        assert_eq!(track.artist_name, "AC/DC");
        assert!(!track.is_favorite);
    }
}
