use crate::{
    bs::TrackId,
    storage::{PlaylistMap, Storage},
};

/// Named, user-ordered lists of track IDs. Every mutation is persisted.
///
/// Names are unique and iterate in sorted order. A playlist may hold IDs
/// that are no longer in the library; those are filtered out at display time.
#[derive(Debug)]
pub struct PlaylistStore {
    playlists: PlaylistMap,
    storage: Storage,
}
impl PlaylistStore {
    pub const MAX_NAME_LEN: usize = 60;

    pub fn new(playlists: PlaylistMap, storage: Storage) -> Self {
        Self { playlists, storage }
    }

    pub fn load(storage: Storage) -> Self {
        Self::new(storage.load_playlists(), storage)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.playlists.keys().map(|name| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&[TrackId]> {
        self.playlists.get(name).map(|ids| ids.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.playlists.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Appends `track_id` to `name`. No-op if the playlist is unknown or
    /// already holds the track.
    pub fn add(&mut self, track_id: &TrackId, name: &str) -> bool {
        let Some(ids) = self.playlists.get_mut(name) else {
            tracing::debug!("can't add {track_id} to unknown playlist {name:?}");
            return false;
        };
        if ids.contains(track_id) {
            return false;
        }
        ids.push(track_id.clone());
        self.save();
        true
    }

    /// Removes `track_id` from `name`. No-op if either is unknown.
    pub fn remove(&mut self, track_id: &TrackId, name: &str) -> bool {
        let Some(ids) = self.playlists.get_mut(name) else {
            return false;
        };
        let Some(index) = ids.iter().position(|id| id == track_id) else {
            return false;
        };
        ids.remove(index);
        self.save();
        true
    }

    /// Creates an empty playlist. The name is trimmed and truncated; blank
    /// or existing names are rejected. Returns the name actually created.
    pub fn create(&mut self, name: &str) -> Option<String> {
        let name: String = name.trim().chars().take(Self::MAX_NAME_LEN).collect();
        let name = name.trim_end().to_string();
        if name.is_empty() || self.playlists.contains_key(&name) {
            return None;
        }
        tracing::info!("created playlist {name:?}");
        self.playlists.insert(name.clone(), vec![]);
        self.save();
        Some(name)
    }

    pub fn delete(&mut self, name: &str) -> bool {
        if self.playlists.remove(name).is_none() {
            return false;
        }
        tracing::info!("deleted playlist {name:?}");
        self.save();
        true
    }

    pub fn save(&self) {
        self.storage.save_playlists(&self.playlists);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::default_playlists;

    fn store() -> PlaylistStore {
        PlaylistStore::new(default_playlists(), Storage::in_memory())
    }

    #[test]
    fn add_is_idempotent() {
        let mut playlists = store();
        let id = TrackId::from("a");
        assert!(playlists.add(&id, "Chill"));
        assert!(!playlists.add(&id, "Chill"));
        assert_eq!(playlists.get("Chill").unwrap(), [id.clone()]);
        assert!(!playlists.add(&id, "Nope"));
    }

    #[test]
    fn remove_of_absent_track_is_a_no_op() {
        let mut playlists = store();
        assert!(!playlists.remove(&TrackId::from("a"), "Chill"));
        assert!(!playlists.remove(&TrackId::from("a"), "Nope"));
        assert_eq!(playlists.len(), 3);
    }

    #[test]
    fn create_trims_and_rejects_duplicates() {
        let mut playlists = store();
        assert_eq!(playlists.create("  Road Trip "), Some("Road Trip".to_string()));
        assert_eq!(playlists.create("Road Trip"), None);
        assert_eq!(playlists.create("   "), None);

        let long = "x".repeat(100);
        let truncated = playlists.create(&long).unwrap();
        assert_eq!(truncated.len(), PlaylistStore::MAX_NAME_LEN);
        assert_eq!(
            playlists.names().collect::<Vec<_>>(),
            ["Chill", "Liked Songs", "My Playlist", "Road Trip", truncated.as_str()]
        );
    }

    #[test]
    fn mutations_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        let mut playlists = PlaylistStore::load(storage.clone());
        playlists.add(&TrackId::from("a"), "Liked Songs");
        playlists.delete("Chill");

        let reloaded = PlaylistStore::load(storage);
        assert_eq!(reloaded.get("Liked Songs").unwrap(), [TrackId::from("a")]);
        assert!(!reloaded.contains("Chill"));
    }
}
