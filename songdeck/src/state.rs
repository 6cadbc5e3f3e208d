//! Client state shared with presentation code
//!
//! Loading flag, load status, in-flight mutation tracking, display language and the
//! notification broadcaster.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use tokio::sync::broadcast;

use songdeck_common::{Language, Notification, NotificationKind};

/// Notifications buffered per subscriber before the oldest are dropped
const NOTIFICATION_CAPACITY: usize = 64;

/// Outcome of the most recent collection load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// No load has completed yet
    #[default]
    NotLoaded,
    Loaded,
    /// The last load failed and the collection was emptied
    Unavailable,
}

pub struct ClientState {
    loads_in_flight: AtomicUsize,
    load_status: RwLock<LoadStatus>,
    adds_in_flight: AtomicUsize,
    /// Pending delete count per song id
    deletes_in_flight: Mutex<HashMap<String, usize>>,
    language: RwLock<Language>,
    notification_tx: broadcast::Sender<Notification>,
}

impl ClientState {
    pub fn new(language: Language) -> Self {
        let (notification_tx, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            loads_in_flight: AtomicUsize::new(0),
            load_status: RwLock::new(LoadStatus::NotLoaded),
            adds_in_flight: AtomicUsize::new(0),
            deletes_in_flight: Mutex::new(HashMap::new()),
            language: RwLock::new(language),
            notification_tx,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loads_in_flight.load(Ordering::SeqCst) > 0
    }

    pub(crate) fn track_load(&self) -> LoadGuard<'_> {
        self.loads_in_flight.fetch_add(1, Ordering::SeqCst);
        LoadGuard { state: self }
    }

    pub fn load_status(&self) -> LoadStatus {
        *self.load_status.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_load_status(&self, status: LoadStatus) {
        *self.load_status.write().unwrap_or_else(PoisonError::into_inner) = status;
    }

    pub fn is_adding(&self) -> bool {
        self.adds_in_flight.load(Ordering::SeqCst) > 0
    }

    pub(crate) fn track_add(&self) -> AddGuard<'_> {
        self.adds_in_flight.fetch_add(1, Ordering::SeqCst);
        AddGuard { state: self }
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.deletes_in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    pub(crate) fn track_delete(&self, id: &str) -> DeleteGuard<'_> {
        *self
            .deletes_in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id.to_string())
            .or_insert(0) += 1;
        DeleteGuard {
            state: self,
            id: id.to_string(),
        }
    }

    pub fn language(&self) -> Language {
        *self.language.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_language(&self, language: Language) {
        *self.language.write().unwrap_or_else(PoisonError::into_inner) = language;
    }

    /// Broadcast a notification in the current language
    pub(crate) fn notify(&self, kind: NotificationKind, song_id: Option<String>) {
        let notification = Notification::new(kind, song_id, self.language());
        // Ignore send errors (no subscribers is OK)
        let _ = self.notification_tx.send(notification);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notification_tx.subscribe()
    }
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

/// Marks a collection load as in flight until dropped
pub(crate) struct LoadGuard<'a> {
    state: &'a ClientState,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.state.loads_in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Marks an add as in flight until dropped
pub(crate) struct AddGuard<'a> {
    state: &'a ClientState,
}

impl Drop for AddGuard<'_> {
    fn drop(&mut self) {
        self.state.adds_in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Marks a delete of `id` as in flight until dropped
pub(crate) struct DeleteGuard<'a> {
    state: &'a ClientState,
    id: String,
}

impl Drop for DeleteGuard<'_> {
    fn drop(&mut self) {
        let mut pending = self
            .state
            .deletes_in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(count) = pending.get_mut(&self.id) {
            *count -= 1;
            if *count == 0 {
                pending.remove(&self.id);
            }
        }
    }
}
