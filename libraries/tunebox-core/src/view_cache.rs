//! In-memory mirror of a session's playlists
//!
//! Each mutation synchronously notifies every listener, in subscription
//! order. Notifications carry no payload; listeners re-read
//! [`PlaylistViewCache::playlists`]. One cache belongs to one session and all
//! mutations need `&mut self`, so there is a single writer.

use crate::types::{Playlist, PlaylistId};
use std::collections::BTreeMap;
use std::fmt;

/// Token returned by [`PlaylistViewCache::subscribe`]
pub type SubscriptionId = u64;

type Listener = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
pub struct PlaylistViewCache {
    playlists: Vec<Playlist>,
    listeners: BTreeMap<SubscriptionId, Listener>,
    next_subscription: SubscriptionId,
}

impl PlaylistViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current playlists, in insertion order
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn get(&self, id: PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Replace the whole collection
    pub fn set_all(&mut self, playlists: Vec<Playlist>) {
        self.playlists = playlists;
        self.notify();
    }

    pub fn add(&mut self, playlist: Playlist) {
        self.playlists.push(playlist);
        self.notify();
    }

    /// Remove the entry with the same id. Returns whether one was removed.
    pub fn remove(&mut self, playlist: &Playlist) -> bool {
        let before = self.playlists.len();
        self.playlists.retain(|p| p.id != playlist.id);
        let removed = self.playlists.len() != before;
        self.notify();
        removed
    }

    /// Replace the entry with the same id, appending when there is none
    pub fn update(&mut self, playlist: Playlist) {
        match self.playlists.iter_mut().find(|p| p.id == playlist.id) {
            Some(existing) => *existing = playlist,
            None => self.playlists.push(playlist),
        }
        self.notify();
    }

    /// Register a change listener
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.insert(id, Box::new(listener));
        id
    }

    /// Returns false if the token was unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    fn notify(&self) {
        for listener in self.listeners.values() {
            listener();
        }
    }
}

impl fmt::Debug for PlaylistViewCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaylistViewCache")
            .field("playlists", &self.playlists)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn playlist(id: PlaylistId, name: &str) -> Playlist {
        Playlist::new(id, name, vec![])
    }

    fn counting(cache: &mut PlaylistViewCache) -> (Arc<AtomicUsize>, SubscriptionId) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let id = cache.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (count, id)
    }

    #[test]
    fn every_mutation_notifies() {
        let mut cache = PlaylistViewCache::new();
        let (count, _) = counting(&mut cache);

        cache.set_all(vec![playlist(1, "A")]);
        cache.add(playlist(2, "B"));
        cache.update(playlist(2, "B2"));
        cache.remove(&playlist(1, "A"));

        assert_eq!(count.load(Ordering::SeqCst), 4);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(2).and_then(|p| p.name.as_deref()), Some("B2"));
    }

    #[test]
    fn update_replaces_in_place_or_appends() {
        let mut cache = PlaylistViewCache::new();
        cache.set_all(vec![playlist(1, "A"), playlist(2, "B")]);

        cache.update(playlist(1, "A2"));
        cache.update(playlist(3, "C"));

        let names: Vec<_> = cache.playlists().iter().map(|p| p.display_name()).collect();
        assert_eq!(names, vec!["A2", "B", "C"]);
    }

    #[test]
    fn remove_matches_by_id() {
        let mut cache = PlaylistViewCache::new();
        cache.add(playlist(1, "A"));

        assert!(cache.remove(&playlist(1, "renamed elsewhere")));
        assert!(!cache.remove(&playlist(1, "A")));
        assert!(cache.is_empty());
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let mut cache = PlaylistViewCache::new();
        let (count, id) = counting(&mut cache);

        cache.add(playlist(1, "A"));
        assert!(cache.unsubscribe(id));
        assert!(!cache.unsubscribe(id));
        cache.add(playlist(2, "B"));

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listeners_fire_in_subscription_order() {
        let mut cache = PlaylistViewCache::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            cache.subscribe(move || order.lock().unwrap().push(tag));
        }
        cache.add(playlist(1, "A"));

        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }
}
