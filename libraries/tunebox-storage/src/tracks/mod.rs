use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tunebox_core::{ArtistId, Result, Track, TrackDetail, TrackId};

pub(crate) fn from_row(row: &SqliteRow) -> Track {
    Track {
        id: row.get("id"),
        name: row.get("name"),
        album_id: row.get("album_id"),
    }
}

pub(crate) fn detail_from_row(row: &SqliteRow) -> TrackDetail {
    TrackDetail {
        track_id: row.get("track_id"),
        track_name: row.get("track_name"),
        album_title: row.get("album_title"),
        artist_name: row.get("artist_name"),
    }
}

pub async fn get_by_id(pool: &SqlitePool, id: TrackId) -> Result<Option<Track>> {
    let row = sqlx::query("SELECT id, name, album_id FROM tracks WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(from_row))
}

/// Tracks on albums by the artist, with album and artist names joined
pub async fn get_by_artist(pool: &SqlitePool, artist_id: ArtistId) -> Result<Vec<TrackDetail>> {
    let rows = sqlx::query(
        r#"
        SELECT
            t.id AS track_id, t.name AS track_name,
            al.title AS album_title,
            ar.name AS artist_name
        FROM tracks t
        INNER JOIN albums al ON t.album_id = al.id
        LEFT JOIN artists ar ON al.artist_id = ar.id
        WHERE al.artist_id = ?
        ORDER BY al.title, t.id
        "#,
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(detail_from_row).collect())
}
