use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tunebox_core::{Album, ArtistId, Result};

fn from_row(row: &SqliteRow) -> Album {
    Album {
        id: row.get("id"),
        title: row.get("title"),
        artist_id: row.get("artist_id"),
    }
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Album>> {
    let rows = sqlx::query("SELECT id, title, artist_id FROM albums ORDER BY title, id")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(from_row).collect())
}

pub async fn get_by_artist(pool: &SqlitePool, artist_id: ArtistId) -> Result<Vec<Album>> {
    let rows = sqlx::query(
        "SELECT id, title, artist_id
         FROM albums
         WHERE artist_id = ?
         ORDER BY title, id",
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect())
}
