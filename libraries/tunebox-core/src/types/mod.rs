mod album;
mod artist;
mod ids;
mod playlist;
mod track;

/// Stand-in for names that are missing in the catalog
pub const PLACEHOLDER: &str = "-";

pub use album::Album;
pub use artist::Artist;
pub use ids::{AlbumId, ArtistId, PlaylistId, TrackId, UserId};
pub use playlist::{
    Playlist, PlaylistDetail, PlaylistView, UserPlaylist, FAVORITES_PLAYLIST_NAME,
};
pub use track::{PlaylistTrack, Track, TrackDetail};
