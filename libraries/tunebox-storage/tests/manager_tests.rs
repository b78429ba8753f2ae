//! End-to-end tests for playlist management over SQLite
//!
//! Drives `PlaylistManager` against a real database:
//! - Explicit creation, add and remove with set semantics
//! - Favorite toggling and lazy creation of the favorites playlist
//! - Cache updates and change notifications
//! - Id allocation across sessions sharing one store


use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use test_helpers::*;
use tunebox_core::{LibraryError, PlaylistManager, PlaylistStore, UserId, FAVORITES_PLAYLIST_NAME};

#[tokio::test]
async fn test_create_playlist_uses_next_id_and_seed_track() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let library = seed_library(pool).await;
    let u1 = UserId::new("u1");
    create_test_playlist(pool, 18, Some("Classical"), &UserId::new("u9")).await;

    let mut manager = PlaylistManager::new(test_db.storage());
    let seed = library.album_tracks[0];
    let playlist = manager.create_playlist("Road Trip", &u1, seed).await.unwrap();

    assert_eq!(playlist.id, 19);
    assert_eq!(playlist.name.as_deref(), Some("Road Trip"));
    assert!(playlist.track_ids().eq([seed]));
    assert_eq!(manager.cache().playlists(), &[playlist.clone()]);

    let stored = test_db
        .storage()
        .find_user_playlist_by_id(&u1, 19)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, playlist);
}

#[tokio::test]
async fn test_create_playlist_with_missing_track_creates_nothing() {
    let test_db = TestDb::new().await;
    let u1 = UserId::new("u1");

    let mut manager = PlaylistManager::new(test_db.storage());
    let err = manager.create_playlist("Road Trip", &u1, 999).await.unwrap_err();

    assert!(matches!(err, LibraryError::TrackNotFound(999)));
    assert!(manager.cache().is_empty());
    assert!(test_db
        .storage()
        .find_playlists_for_user(&u1)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_add_track_twice_keeps_one_copy() {
    let test_db = TestDb::new().await;
    let library = seed_library(test_db.pool()).await;
    let u1 = UserId::new("u1");

    let mut manager = PlaylistManager::new(test_db.storage());
    let playlist = manager
        .create_playlist("Road Trip", &u1, library.album_tracks[0])
        .await
        .unwrap();

    let added = library.album_tracks[1];
    let first = manager.add_track(playlist.id, &u1, added).await.unwrap();
    let second = manager.add_track(playlist.id, &u1, added).await.unwrap();

    assert_eq!(first.tracks.len(), 2);
    assert_eq!(second, first);
    assert_eq!(manager.cache().get(playlist.id), Some(&second));
}

#[tokio::test]
async fn test_add_track_requires_ownership_and_existing_track() {
    let test_db = TestDb::new().await;
    let library = seed_library(test_db.pool()).await;
    let owner = UserId::new("owner");
    let stranger = UserId::new("stranger");

    let mut manager = PlaylistManager::new(test_db.storage());
    let playlist = manager
        .create_playlist("Mine", &owner, library.album_tracks[0])
        .await
        .unwrap();

    let err = manager
        .add_track(playlist.id, &stranger, library.album_tracks[1])
        .await
        .unwrap_err();
    assert!(matches!(err, LibraryError::PlaylistNotFound(id) if id == playlist.id));

    let err = manager.add_track(playlist.id, &owner, 999).await.unwrap_err();
    assert!(matches!(err, LibraryError::TrackNotFound(999)));
}

#[tokio::test]
async fn test_remove_track_and_remove_absent_track() {
    let test_db = TestDb::new().await;
    let library = seed_library(test_db.pool()).await;
    let u1 = UserId::new("u1");

    let mut manager = PlaylistManager::new(test_db.storage());
    let seed = library.album_tracks[0];
    let playlist = manager.create_playlist("Road Trip", &u1, seed).await.unwrap();

    let removed = manager.remove_track(playlist.id, &u1, seed).await.unwrap();
    assert_eq!(removed.id, seed);

    // Absent track: still succeeds
    let again = manager.remove_track(playlist.id, &u1, seed).await.unwrap();
    assert_eq!(again.id, seed);

    let cached = manager.cache().get(playlist.id).unwrap();
    assert!(cached.tracks.is_empty());

    let err = manager.remove_track(playlist.id, &u1, 999).await.unwrap_err();
    assert!(matches!(err, LibraryError::TrackNotFound(999)));
}

#[tokio::test]
async fn test_toggle_favorite_round_trip() {
    let test_db = TestDb::new().await;
    let library = seed_library(test_db.pool()).await;
    let u1 = UserId::new("u1");
    let track_id = library.album_tracks[2];

    let mut manager = PlaylistManager::new(test_db.storage());
    assert!(!manager.is_favorite(track_id, &u1).await.unwrap());

    assert!(manager.toggle_favorite(track_id, &u1).await.unwrap());
    assert!(manager.is_favorite(track_id, &u1).await.unwrap());

    let favorites = test_db
        .storage()
        .find_user_playlist_by_name(&u1, FAVORITES_PLAYLIST_NAME)
        .await
        .unwrap()
        .unwrap();
    let view = manager.get_playlist(favorites.id, &u1).await.unwrap().unwrap();
    assert_eq!(view.name, FAVORITES_PLAYLIST_NAME);
    assert!(view.track(track_id).unwrap().is_favorite);

    assert!(manager.toggle_favorite(track_id, &u1).await.unwrap());
    assert!(!manager.is_favorite(track_id, &u1).await.unwrap());

    // Emptied, but kept
    let view = manager.get_playlist(favorites.id, &u1).await.unwrap().unwrap();
    assert!(view.track(track_id).is_none());
    assert_eq!(
        count_user_playlists_named(test_db.pool(), &u1, FAVORITES_PLAYLIST_NAME).await,
        1
    );
}

#[tokio::test]
async fn test_favorites_created_lazily_and_only_once() {
    let test_db = TestDb::new().await;
    let library = seed_library(test_db.pool()).await;
    let u1 = UserId::new("u1");

    let mut manager = PlaylistManager::new(test_db.storage());
    manager
        .create_playlist("Road Trip", &u1, library.album_tracks[0])
        .await
        .unwrap();
    assert_eq!(
        count_user_playlists_named(test_db.pool(), &u1, FAVORITES_PLAYLIST_NAME).await,
        0
    );

    for track_id in library
        .album_tracks
        .iter()
        .copied()
        .chain([library.loose_track, library.album_tracks[0]])
    {
        assert!(manager.toggle_favorite(track_id, &u1).await.unwrap());
    }

    assert_eq!(
        count_user_playlists_named(test_db.pool(), &u1, FAVORITES_PLAYLIST_NAME).await,
        1
    );

    let favorites = manager
        .cache()
        .playlists()
        .iter()
        .find(|p| p.is_favorites())
        .unwrap();
    let mut expected = library.album_tracks[1..].to_vec();
    expected.push(library.loose_track);
    assert!(favorites.track_ids().eq(expected));
}

#[tokio::test]
async fn test_toggle_unknown_track_returns_false() {
    let test_db = TestDb::new().await;
    let u1 = UserId::new("u1");

    let mut manager = PlaylistManager::new(test_db.storage());
    assert!(!manager.toggle_favorite(42, &u1).await.unwrap());
    assert_eq!(
        count_user_playlists_named(test_db.pool(), &u1, FAVORITES_PLAYLIST_NAME).await,
        0
    );
}

#[tokio::test]
async fn test_remove_track_cannot_touch_favorites() {
    let test_db = TestDb::new().await;
    let library = seed_library(test_db.pool()).await;
    let u1 = UserId::new("u1");
    let track_id = library.album_tracks[0];

    let mut manager = PlaylistManager::new(test_db.storage());
    manager.toggle_favorite(track_id, &u1).await.unwrap();
    let favorites_id = manager
        .cache()
        .playlists()
        .iter()
        .find(|p| p.is_favorites())
        .map(|p| p.id)
        .unwrap();

    let err = manager
        .remove_track(favorites_id, &u1, track_id)
        .await
        .unwrap_err();

    assert!(matches!(err, LibraryError::PlaylistNotFound(id) if id == favorites_id));
    assert!(manager.is_favorite(track_id, &u1).await.unwrap());
}

#[tokio::test]
async fn test_get_playlist_uses_placeholders_and_viewer_flags() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let library = seed_library(pool).await;
    let u1 = UserId::new("u1");
    let u2 = UserId::new("u2");

    let mut manager = PlaylistManager::new(test_db.storage());
    let playlist = manager
        .create_playlist("Mixed", &u1, library.loose_track)
        .await
        .unwrap();
    manager
        .add_track(playlist.id, &u1, library.album_tracks[0])
        .await
        .unwrap();

    let mut other = PlaylistManager::new(test_db.storage());
    other.toggle_favorite(library.loose_track, &u2).await.unwrap();

    let as_u1 = manager.get_playlist(playlist.id, &u1).await.unwrap().unwrap();
    let loose = as_u1.track(library.loose_track).unwrap();
    assert_eq!(loose.album_title, "-");
    assert_eq!(loose.artist_name, "-");
    assert!(!loose.is_favorite);
    let on_album = as_u1.track(library.album_tracks[0]).unwrap();
    assert_eq!(on_album.album_title, "Let There Be Rock");
    assert_eq!(on_album.artist_name, "AC/DC");

    // Any viewer may read it; flags follow the viewer
    let as_u2 = other.get_playlist(playlist.id, &u2).await.unwrap().unwrap();
    assert!(as_u2.track(library.loose_track).unwrap().is_favorite);

    // Unnamed playlists display the placeholder
    create_test_playlist(pool, 500, None, &u1).await;
    let unnamed = manager.get_playlist(500, &u1).await.unwrap().unwrap();
    assert_eq!(unnamed.name, "-");

    assert!(manager.get_playlist(404, &u1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_load_playlists_refreshes_cache_and_notifies() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let library = seed_library(pool).await;
    let u1 = UserId::new("u1");
    create_test_playlist(pool, 1, Some("Music"), &u1).await;
    create_test_playlist(pool, 2, None, &u1).await;

    let mut manager = PlaylistManager::new(test_db.storage());
    let notified = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&notified);
    let subscription = manager.subscribe(move || {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let loaded = manager.load_playlists(&u1).await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(notified.load(Ordering::SeqCst), 1);

    manager
        .add_track(1, &u1, library.album_tracks[0])
        .await
        .unwrap();
    manager.toggle_favorite(library.album_tracks[0], &u1).await.unwrap();
    assert_eq!(notified.load(Ordering::SeqCst), 3);
    assert_eq!(manager.cache().len(), 2);

    // Unnamed playlists are not mirrored
    manager.add_track(2, &u1, library.album_tracks[0]).await.unwrap();
    assert_eq!(notified.load(Ordering::SeqCst), 3);

    assert!(manager.unsubscribe(subscription));
    manager.load_playlists(&u1).await.unwrap();
    assert_eq!(notified.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_sessions_sharing_a_store_get_distinct_ids() {
    let test_db = TestDb::new().await;
    let library = seed_library(test_db.pool()).await;
    let storage = test_db.storage();
    let seed = library.album_tracks[0];

    let alice = UserId::new("alice");
    let bob = UserId::new("bob");
    let mut first = PlaylistManager::new(Arc::clone(&storage));
    let mut second = PlaylistManager::new(Arc::clone(&storage));

    // Reserving ids without committing must not hand them out twice
    let reserved = storage.next_playlist_id().await.unwrap();

    let mut ids = vec![reserved];
    for n in 0..3 {
        let name = format!("Mix {}", n);
        ids.push(first.create_playlist(&name, &alice, seed).await.unwrap().id);
        ids.push(second.create_playlist(&name, &bob, seed).await.unwrap().id);
    }
    first.toggle_favorite(seed, &alice).await.unwrap();
    second.toggle_favorite(seed, &bob).await.unwrap();
    ids.extend(first.cache().playlists().iter().map(|p| p.id));
    ids.extend(second.cache().playlists().iter().map(|p| p.id));

    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 9);
    assert_eq!(ids[0], reserved);

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM playlists")
        .fetch_one(test_db.pool())
        .await
        .unwrap();
    assert_eq!(total, 8);
}
