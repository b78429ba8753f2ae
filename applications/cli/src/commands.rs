//! Subcommands and their execution against one session

use crate::config::CliConfig;
use crate::error::{CliError, Result};
use clap::Subcommand;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;
use tunebox_core::{
    Album, Artist, ArtistId, Catalog, Claim, Identity, Playlist, PlaylistId, PlaylistManager,
    PlaylistTrack, PlaylistView, TrackId, UserId,
};
use tunebox_storage::LocalStorageContext;

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List all artists with their albums
    Artists,
    /// Show one artist
    Artist {
        /// Artist ID
        id: ArtistId,
    },
    /// List an artist's albums
    Albums {
        /// Artist ID
        artist: ArtistId,
    },
    /// List an artist's tracks, flagging the user's favorites
    Tracks {
        /// Artist ID
        artist: ArtistId,
    },
    /// List the user's playlists
    Playlists,
    /// Show a playlist with album, artist and favorite columns
    Show {
        /// Playlist ID
        playlist: PlaylistId,
    },
    /// Create a playlist seeded with one track
    Create {
        /// Playlist name
        name: String,
        /// Seed track ID
        track: TrackId,
    },
    /// Add a track to a playlist
    Add {
        /// Playlist ID
        playlist: PlaylistId,
        /// Track ID
        track: TrackId,
    },
    /// Remove a track from a playlist
    Remove {
        /// Playlist ID
        playlist: PlaylistId,
        /// Track ID
        track: TrackId,
    },
    /// Mark or unmark a track as favorite
    Favorite {
        /// Track ID
        track: TrackId,
    },
}

/// Caller identity from `--user`, falling back to the configured session user
pub fn resolve_identity(user: Option<&str>, config: &CliConfig) -> Identity {
    match user.or(config.session.user_id.as_deref()) {
        Some(user_id) => Identity::authenticated(vec![Claim::name_identifier(user_id)]),
        None => Identity::anonymous(),
    }
}

/// Everything a command needs: the catalog, the caller's playlist manager
/// and who the caller is
pub struct Session {
    catalog: Catalog<LocalStorageContext>,
    manager: PlaylistManager<LocalStorageContext>,
    identity: Identity,
    json: bool,
}

#[derive(Serialize)]
struct Favorited {
    track_id: TrackId,
    is_favorite: bool,
}

impl Session {
    pub fn new(storage: Arc<LocalStorageContext>, identity: Identity, json: bool) -> Self {
        Self {
            catalog: Catalog::new(Arc::clone(&storage)),
            manager: PlaylistManager::new(storage),
            identity,
            json,
        }
    }

    fn viewer(&self) -> Option<UserId> {
        if self.identity.is_authenticated() {
            self.identity.user_id()
        } else {
            None
        }
    }

    fn require_user(&self) -> Result<UserId> {
        self.viewer().ok_or(CliError::MissingUser)
    }

    /// Run a command and render its output
    pub async fn execute(&mut self, command: Command) -> Result<String> {
        tracing::debug!(?command, "Executing command");

        match command {
            Command::Artists => {
                let artists = self.catalog.list_artists().await?;
                self.render(artists.as_slice(), render_artists)
            }
            Command::Artist { id } => {
                let artist = self
                    .catalog
                    .get_artist(id)
                    .await?
                    .ok_or_else(|| CliError::NotFound(format!("artist {}", id)))?;
                self.render(&artist, |a| render_artists(std::slice::from_ref(a)))
            }
            Command::Albums { artist } => {
                let albums = self.catalog.list_albums_by_artist(artist).await?;
                self.render(albums.as_slice(), render_albums)
            }
            Command::Tracks { artist } => {
                let viewer = self.viewer();
                let tracks = self
                    .catalog
                    .list_tracks_by_artist(artist, viewer.as_ref())
                    .await?;
                self.render(tracks.as_slice(), render_tracks)
            }
            Command::Playlists => {
                let user_id = self.require_user()?;
                let playlists = self.manager.load_playlists(&user_id).await?.to_vec();
                self.render(playlists.as_slice(), render_playlists)
            }
            Command::Show { playlist } => {
                let user_id = self.require_user()?;
                let view = self
                    .manager
                    .get_playlist(playlist, &user_id)
                    .await?
                    .ok_or_else(|| CliError::NotFound(format!("playlist {}", playlist)))?;
                self.render(&view, render_view)
            }
            Command::Create { name, track } => {
                let user_id = self.require_user()?;
                let playlist = self.manager.create_playlist(&name, &user_id, track).await?;
                self.render(&playlist, |p| render_playlists(std::slice::from_ref(p)))
            }
            Command::Add { playlist, track } => {
                let user_id = self.require_user()?;
                let playlist = self.manager.add_track(playlist, &user_id, track).await?;
                self.render(&playlist, |p| render_playlists(std::slice::from_ref(p)))
            }
            Command::Remove { playlist, track } => {
                let user_id = self.require_user()?;
                let removed = self.manager.remove_track(playlist, &user_id, track).await?;
                self.render(&removed, |t| format!("Removed {}\t{}\n", t.id, t.name))
            }
            Command::Favorite { track } => {
                let user_id = self.require_user()?;
                if !self.manager.toggle_favorite(track, &user_id).await? {
                    return Err(CliError::NotFound(format!("track {}", track)));
                }
                let favorited = Favorited {
                    track_id: track,
                    is_favorite: self.manager.is_favorite(track, &user_id).await?,
                };
                self.render(&favorited, |f| {
                    if f.is_favorite {
                        format!("Track {} added to favorites\n", f.track_id)
                    } else {
                        format!("Track {} removed from favorites\n", f.track_id)
                    }
                })
            }
        }
    }

    fn render<T, F>(&self, value: &T, text: F) -> Result<String>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&T) -> String,
    {
        if self.json {
            let mut out = serde_json::to_string_pretty(value)?;
            out.push('\n');
            Ok(out)
        } else {
            Ok(text(value))
        }
    }
}

fn render_artists(artists: &[Artist]) -> String {
    let mut out = String::new();
    for artist in artists {
        let _ = writeln!(out, "{}\t{}", artist.id, artist.display_name());
        for album in &artist.albums {
            let _ = writeln!(out, "\t{}\t{}", album.id, album.title);
        }
    }
    out
}

fn render_albums(albums: &[Album]) -> String {
    let mut out = String::new();
    for album in albums {
        let _ = writeln!(out, "{}\t{}", album.id, album.title);
    }
    out
}

fn render_tracks(tracks: &[PlaylistTrack]) -> String {
    let mut out = String::new();
    for track in tracks {
        let _ = writeln!(
            out,
            "{}{}\t{}\t{}\t{}",
            if track.is_favorite { "*" } else { " " },
            track.track_id,
            track.track_name,
            track.album_title,
            track.artist_name
        );
    }
    out
}

fn render_playlists(playlists: &[Playlist]) -> String {
    let mut out = String::new();
    for playlist in playlists {
        let _ = writeln!(
            out,
            "{}\t{}\t{} tracks",
            playlist.id,
            playlist.display_name(),
            playlist.tracks.len()
        );
    }
    out
}

fn render_view(view: &PlaylistView) -> String {
    let mut out = format!("{}\t{}\n", view.id, view.name);
    out.push_str(&render_tracks(&view.tracks));
    out
}
