//! Song catalog client
//!
//! Keeps the local song collection in step with the Catalog API:
//! - `list` replaces the collection, degrading to empty on failure
//! - `add` / `edit` touch the collection only after the API confirms
//! - `delete` removes locally first and rolls back if the API refuses
//!
//! Every add/edit/delete outcome is broadcast as a [`Notification`].

use tracing::{debug, info, warn};

use songdeck_common::config::ClientConfig;
use songdeck_common::forms::Validate;
use songdeck_common::{Language, Notification, NotificationKind, Song, SongFormData};
use tokio::sync::broadcast;

use crate::api::{CatalogApi, HttpCatalogApi};
use crate::cache::{Snapshot, SongCache};
use crate::error::{ApiError, CatalogError, Operation};
use crate::mutation::PendingDelete;
use crate::state::{ClientState, LoadStatus};

pub struct CatalogClient<A = HttpCatalogApi> {
    api: A,
    cache: SongCache,
    state: ClientState,
}

impl CatalogClient<HttpCatalogApi> {
    /// HTTP client for the configured Catalog API
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let api = HttpCatalogApi::from_config(config)?;
        Ok(Self::new(api, config.language))
    }
}

impl<A: CatalogApi> CatalogClient<A> {
    pub fn new(api: A, language: Language) -> Self {
        Self::with_songs(api, language, Vec::new())
    }

    /// Client whose collection starts from `songs`
    pub fn with_songs(api: A, language: Language, songs: Vec<Song>) -> Self {
        Self {
            api,
            cache: SongCache::with_songs(songs),
            state: ClientState::new(language),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Current collection
    pub fn songs(&self) -> Snapshot {
        self.cache.snapshot()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Distinguishes an empty library from a failed load
    pub fn load_status(&self) -> LoadStatus {
        self.state.load_status()
    }

    pub fn is_adding(&self) -> bool {
        self.state.is_adding()
    }

    /// True while a delete of `id` awaits the API
    pub fn is_deleting(&self, id: &str) -> bool {
        self.state.is_deleting(id)
    }

    pub fn language(&self) -> Language {
        self.state.language()
    }

    pub fn set_language(&self, language: Language) {
        self.state.set_language(language);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.state.subscribe()
    }

    /// Fetch the full collection
    ///
    /// Never fails: a failed load empties the collection and sets
    /// [`LoadStatus::Unavailable`]. A result that arrives after an optimistic
    /// delete was applied is discarded and the current collection returned.
    pub async fn list(&self) -> Snapshot {
        let _loading = self.state.track_load();
        let epoch = self.cache.epoch();

        let (songs, status) = match self.api.list_songs().await {
            Ok(songs) => {
                info!(count = songs.len(), "Song catalog loaded");
                (songs, LoadStatus::Loaded)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load song catalog, showing empty library");
                (Vec::new(), LoadStatus::Unavailable)
            }
        };

        match self.cache.replace_if_current(epoch, songs) {
            Ok(snapshot) => {
                self.state.set_load_status(status);
                snapshot
            }
            Err(current) => {
                debug!("Song catalog load superseded by optimistic delete, result discarded");
                current
            }
        }
    }

    /// Create a song and append the API's record to the collection
    pub async fn add(&self, data: &SongFormData) -> Result<Song, CatalogError> {
        data.validate()?;
        let _adding = self.state.track_add();

        match self.api.create_song(data).await {
            Ok(song) => {
                self.cache.upsert(song.clone());
                info!(id = %song.id, name = %song.name, "Song added");
                self.state.notify(NotificationKind::Added, Some(song.id.clone()));
                Ok(song)
            }
            Err(e) => {
                warn!(error = %e, name = %data.name, "Failed to add song");
                self.state.notify(NotificationKind::AddFailed, None);
                Err(CatalogError::failed(Operation::Add, e))
            }
        }
    }

    /// Update a song and replace the local record with the API's version
    pub async fn edit(&self, song: &Song) -> Result<Song, CatalogError> {
        song.validate()?;

        match self.api.update_song(song).await {
            Ok(updated) => {
                if !self.cache.replace_song(updated.clone()) {
                    debug!(id = %updated.id, "Edited song is not in the local collection");
                }
                info!(id = %updated.id, name = %updated.name, "Song edited");
                self.state.notify(NotificationKind::Edited, Some(updated.id.clone()));
                Ok(updated)
            }
            Err(e) => {
                warn!(error = %e, id = %song.id, "Failed to edit song");
                self.state.notify(NotificationKind::EditFailed, Some(song.id.clone()));
                Err(CatalogError::failed(Operation::Edit, e))
            }
        }
    }

    /// Delete a song, removing it locally before the API answers
    ///
    /// On failure the collection captured at removal time is restored.
    pub async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        let _deleting = self.state.track_delete(id);
        let pending = PendingDelete::begin(&self.cache, id);
        debug!(id = %id, removed = pending.removed_locally(), "Optimistic delete applied");

        match self.api.delete_song(id).await {
            Ok(()) => {
                pending.commit();
                info!(id = %id, "Song deleted");
                self.state.notify(NotificationKind::Deleted, Some(id.to_string()));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, id = %id, "Failed to delete song");
                pending.roll_back(&self.cache);
                self.state.notify(NotificationKind::DeleteFailed, Some(id.to_string()));
                Err(CatalogError::failed(Operation::Delete, e))
            }
        }
    }
}
