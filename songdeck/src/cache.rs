//! Local song collection
//!
//! Single-writer cache: the collection is only ever replaced as a whole, so a
//! snapshot handed to a reader never changes underneath it.
//!
//! The cache also counts optimistic mutations (the epoch). A list refresh
//! started before an optimistic mutation is considered superseded and must
//! not overwrite the cache when it completes.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use songdeck_common::Song;

/// Immutable view of the collection
pub type Snapshot = Arc<Vec<Song>>;

#[derive(Debug, Default)]
struct CacheInner {
    songs: Snapshot,
    epoch: u64,
}

#[derive(Debug, Default)]
pub struct SongCache {
    inner: RwLock<CacheInner>,
}

impl SongCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_songs(songs: Vec<Song>) -> Self {
        Self {
            inner: RwLock::new(CacheInner {
                songs: Arc::new(songs),
                epoch: 0,
            }),
        }
    }

    // No invariant is left half-applied under the lock, so a poisoned lock is still usable
    fn read(&self) -> RwLockReadGuard<'_, CacheInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.read().songs)
    }

    /// Number of optimistic mutations applied so far
    pub fn epoch(&self) -> u64 {
        self.read().epoch
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().songs.iter().any(|s| s.id == id)
    }

    /// Replace the whole collection
    pub fn replace(&self, songs: Vec<Song>) -> Snapshot {
        let songs = Arc::new(songs);
        self.write().songs = Arc::clone(&songs);
        songs
    }

    /// Overwrite the collection with a previously captured snapshot
    pub fn restore(&self, snapshot: Snapshot) {
        self.write().songs = snapshot;
    }

    /// Replace the collection with a list result fetched since `epoch`
    ///
    /// Returns `Err` with the current snapshot when an optimistic mutation
    /// happened in the meantime; the fetched songs are then discarded.
    pub fn replace_if_current(&self, epoch: u64, songs: Vec<Song>) -> Result<Snapshot, Snapshot> {
        let mut inner = self.write();
        if inner.epoch != epoch {
            return Err(Arc::clone(&inner.songs));
        }
        inner.songs = Arc::new(songs);
        Ok(Arc::clone(&inner.songs))
    }

    /// Append a committed song; an existing record with the same id is replaced in place
    pub fn upsert(&self, song: Song) -> Snapshot {
        let mut inner = self.write();
        let mut songs = Vec::clone(&inner.songs);
        match songs.iter_mut().find(|s| s.id == song.id) {
            Some(existing) => *existing = song,
            None => songs.push(song),
        }
        inner.songs = Arc::new(songs);
        Arc::clone(&inner.songs)
    }

    /// Replace the record with the same id; `false` when no such record exists
    pub fn replace_song(&self, song: Song) -> bool {
        let mut inner = self.write();
        let Some(index) = inner.songs.iter().position(|s| s.id == song.id) else {
            return false;
        };
        let mut songs = Vec::clone(&inner.songs);
        songs[index] = song;
        inner.songs = Arc::new(songs);
        true
    }

    /// Remove `id` ahead of remote confirmation
    ///
    /// Returns the pre-image and whether a record was removed. The epoch is
    /// advanced even when `id` is absent, superseding in-flight list refreshes.
    pub fn remove_optimistically(&self, id: &str) -> (Snapshot, bool) {
        let mut inner = self.write();
        inner.epoch += 1;

        let previous = Arc::clone(&inner.songs);
        if !previous.iter().any(|s| s.id == id) {
            return (previous, false);
        }

        let remaining: Vec<Song> = previous.iter().filter(|s| s.id != id).cloned().collect();
        inner.songs = Arc::new(remaining);
        (previous, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn songs() -> Vec<Song> {
        vec![Song::new("1", "A", "X"), Song::new("2", "B", "Y")]
    }

    #[test]
    fn test_snapshot_is_not_affected_by_later_writes() {
        let cache = SongCache::with_songs(songs());
        let before = cache.snapshot();

        cache.upsert(Song::new("3", "C", "Z"));

        assert_eq!(before.len(), 2);
        assert_eq!(cache.snapshot().len(), 3);
    }

    #[test]
    fn test_upsert_keeps_ids_unique() {
        let cache = SongCache::with_songs(songs());
        cache.upsert(Song::new("2", "B2", "Y2"));

        let current = cache.snapshot();
        assert_eq!(current.len(), 2);
        assert_eq!(current[1].name, "B2");
    }

    #[test]
    fn test_replace_song() {
        let cache = SongCache::with_songs(songs());

        assert!(cache.replace_song(Song::new("1", "A2", "X2")));
        assert!(!cache.replace_song(Song::new("9", "?", "?")));

        let current = cache.snapshot();
        assert_eq!(current[0], Song::new("1", "A2", "X2"));
        assert_eq!(current[1], Song::new("2", "B", "Y"));
    }

    #[test]
    fn test_remove_optimistically_returns_pre_image() {
        let cache = SongCache::with_songs(songs());

        let (previous, removed) = cache.remove_optimistically("1");
        assert!(removed);
        assert_eq!(previous.len(), 2);
        assert_eq!(*cache.snapshot(), vec![Song::new("2", "B", "Y")]);

        cache.restore(previous);
        assert_eq!(*cache.snapshot(), songs());
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let cache = SongCache::with_songs(songs());
        let before = cache.snapshot();

        let (_, removed) = cache.remove_optimistically("9");

        assert!(!removed);
        assert!(Arc::ptr_eq(&before, &cache.snapshot()));
        assert_eq!(cache.epoch(), 1);
    }

    #[test]
    fn test_list_result_superseded_by_optimistic_mutation() {
        let cache = SongCache::with_songs(songs());
        let epoch = cache.epoch();

        cache.remove_optimistically("1");

        let current = cache.replace_if_current(epoch, songs()).unwrap_err();
        assert_eq!(*current, vec![Song::new("2", "B", "Y")]);

        let epoch = cache.epoch();
        assert!(cache.replace_if_current(epoch, Vec::new()).is_ok());
        assert!(cache.snapshot().is_empty());
    }
}
