use crate::tracks;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use std::collections::{HashMap, HashSet};
use tunebox_core::{
    LibraryError, Mutation, Playlist, PlaylistDetail, PlaylistId, Result, TrackId, UnitOfWork,
    UserId, FAVORITES_PLAYLIST_NAME,
};

fn from_row(row: &SqliteRow) -> Playlist {
    Playlist {
        id: row.get("id"),
        name: row.get("name"),
        tracks: Vec::new(),
    }
}

/// Named playlists linked to the user, with tracks
pub async fn get_for_user(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT p.id, p.name
        FROM playlists p
        INNER JOIN user_playlists up ON up.playlist_id = p.id
        WHERE up.user_id = ? AND p.name IS NOT NULL
        ORDER BY p.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let track_rows = sqlx::query(
        r#"
        SELECT pt.playlist_id, t.id, t.name, t.album_id
        FROM user_playlists up
        INNER JOIN playlists p ON p.id = up.playlist_id
        INNER JOIN playlist_tracks pt ON pt.playlist_id = p.id
        INNER JOIN tracks t ON t.id = pt.track_id
        WHERE up.user_id = ? AND p.name IS NOT NULL
        ORDER BY pt.rowid
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut tracks_by_playlist: HashMap<PlaylistId, Vec<_>> = HashMap::new();
    for row in &track_rows {
        tracks_by_playlist
            .entry(row.get("playlist_id"))
            .or_default()
            .push(tracks::from_row(row));
    }

    Ok(rows
        .iter()
        .map(|row| {
            let mut playlist = from_row(row);
            playlist.tracks = tracks_by_playlist.remove(&playlist.id).unwrap_or_default();
            playlist
        })
        .collect())
}

/// Playlist by ID, only if linked to the user
pub async fn get_user_playlist_by_id(
    pool: &SqlitePool,
    user_id: &UserId,
    id: PlaylistId,
) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        r#"
        SELECT p.id, p.name
        FROM playlists p
        INNER JOIN user_playlists up ON up.playlist_id = p.id
        WHERE up.user_id = ? AND p.id = ?
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    with_tracks(pool, row.as_ref().map(from_row)).await
}

/// First playlist with the given name linked to the user
pub async fn get_user_playlist_by_name(
    pool: &SqlitePool,
    user_id: &UserId,
    name: &str,
) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        r#"
        SELECT p.id, p.name
        FROM playlists p
        INNER JOIN user_playlists up ON up.playlist_id = p.id
        WHERE up.user_id = ? AND p.name = ?
        ORDER BY p.id
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    with_tracks(pool, row.as_ref().map(from_row)).await
}

/// Playlist with album and artist names joined onto its tracks
pub async fn get_detail(pool: &SqlitePool, id: PlaylistId) -> Result<Option<PlaylistDetail>> {
    let Some(row) = sqlx::query("SELECT id, name FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let track_rows = sqlx::query(
        r#"
        SELECT
            t.id AS track_id, t.name AS track_name,
            al.title AS album_title,
            ar.name AS artist_name
        FROM playlist_tracks pt
        INNER JOIN tracks t ON t.id = pt.track_id
        LEFT JOIN albums al ON al.id = t.album_id
        LEFT JOIN artists ar ON ar.id = al.artist_id
        WHERE pt.playlist_id = ?
        ORDER BY pt.rowid
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(PlaylistDetail {
        id: row.get("id"),
        name: row.get("name"),
        tracks: track_rows.iter().map(tracks::detail_from_row).collect(),
    }))
}

/// Tracks in the user's favorites playlist
pub async fn favorite_track_ids(pool: &SqlitePool, user_id: &UserId) -> Result<HashSet<TrackId>> {
    let rows = sqlx::query(
        r#"
        SELECT DISTINCT pt.track_id
        FROM user_playlists up
        INNER JOIN playlists p ON p.id = up.playlist_id
        INNER JOIN playlist_tracks pt ON pt.playlist_id = p.id
        WHERE up.user_id = ? AND p.name = ?
        "#,
    )
    .bind(user_id)
    .bind(FAVORITES_PLAYLIST_NAME)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get("track_id")).collect())
}

/// Highest playlist id in use, 0 for an empty table
pub async fn max_id(pool: &SqlitePool) -> Result<PlaylistId> {
    let row = sqlx::query("SELECT COALESCE(MAX(id), 0) AS max_id FROM playlists")
        .fetch_one(pool)
        .await?;

    Ok(row.get("max_id"))
}

/// Commit a unit of work in a single transaction
pub async fn persist(pool: &SqlitePool, work: UnitOfWork) -> Result<()> {
    if work.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    for mutation in work.into_mutations() {
        match mutation {
            Mutation::CreatePlaylist { playlist, owner } => {
                insert(&mut tx, &playlist, &owner).await?;
            }
            Mutation::AddTrack {
                playlist_id,
                track_id,
            } => {
                add_track(&mut tx, playlist_id, track_id).await?;
            }
            Mutation::RemoveTrack {
                playlist_id,
                track_id,
            } => {
                sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?")
                    .bind(playlist_id)
                    .bind(track_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }
    }

    tx.commit().await?;

    Ok(())
}

// Helper functions

async fn with_tracks(pool: &SqlitePool, playlist: Option<Playlist>) -> Result<Option<Playlist>> {
    let Some(mut playlist) = playlist else {
        return Ok(None);
    };

    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name, t.album_id
        FROM playlist_tracks pt
        INNER JOIN tracks t ON t.id = pt.track_id
        WHERE pt.playlist_id = ?
        ORDER BY pt.rowid
        "#,
    )
    .bind(playlist.id)
    .fetch_all(pool)
    .await?;

    playlist.tracks = rows.iter().map(tracks::from_row).collect();
    Ok(Some(playlist))
}

async fn insert(conn: &mut SqliteConnection, playlist: &Playlist, owner: &UserId) -> Result<()> {
    if playlist.is_favorites() && has_favorites(conn, owner).await? {
        return Err(LibraryError::Duplicate(format!(
            "user {} already has a {} playlist",
            owner, FAVORITES_PLAYLIST_NAME
        )));
    }

    sqlx::query("INSERT INTO playlists (id, name) VALUES (?, ?)")
        .bind(playlist.id)
        .bind(&playlist.name)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return LibraryError::IdAllocationConflict(playlist.id);
                }
            }
            LibraryError::from(e)
        })?;

    sqlx::query("INSERT INTO user_playlists (user_id, playlist_id) VALUES (?, ?)")
        .bind(owner)
        .bind(playlist.id)
        .execute(&mut *conn)
        .await?;

    for track_id in playlist.track_ids() {
        add_track(conn, playlist.id, track_id).await?;
    }

    Ok(())
}

async fn add_track(
    conn: &mut SqliteConnection,
    playlist_id: PlaylistId,
    track_id: TrackId,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO playlist_tracks (playlist_id, track_id)
        VALUES (?, ?)
        ON CONFLICT(playlist_id, track_id) DO NOTHING
        "#,
    )
    .bind(playlist_id)
    .bind(track_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn has_favorites(conn: &mut SqliteConnection, user_id: &UserId) -> Result<bool> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS count
        FROM user_playlists up
        INNER JOIN playlists p ON p.id = up.playlist_id
        WHERE up.user_id = ? AND p.name = ?
        "#,
    )
    .bind(user_id)
    .bind(FAVORITES_PLAYLIST_NAME)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.get::<i64, _>("count") > 0)
}
