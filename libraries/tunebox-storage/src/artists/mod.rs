use crate::albums;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::collections::HashMap;
use tunebox_core::{Artist, ArtistId, Result};

fn from_row(row: &SqliteRow) -> Artist {
    Artist {
        id: row.get("id"),
        name: row.get("name"),
        albums: Vec::new(),
    }
}

/// Get all artists with their albums
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Artist>> {
    let rows = sqlx::query("SELECT id, name FROM artists ORDER BY name, id")
        .fetch_all(pool)
        .await?;

    let mut by_artist: HashMap<ArtistId, Vec<_>> = HashMap::new();
    for album in albums::get_all(pool).await? {
        by_artist.entry(album.artist_id).or_default().push(album);
    }

    Ok(rows
        .iter()
        .map(|row| {
            let mut artist = from_row(row);
            artist.albums = by_artist.remove(&artist.id).unwrap_or_default();
            artist
        })
        .collect())
}

/// Get artist by ID (albums not loaded)
pub async fn get_by_id(pool: &SqlitePool, id: ArtistId) -> Result<Option<Artist>> {
    let row = sqlx::query("SELECT id, name FROM artists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(from_row))
}
