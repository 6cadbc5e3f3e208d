//! Notification events emitted by the catalog client
//!
//! Every add/edit/delete outcome produces exactly one notification. The
//! message is already localized so presentation code can show it verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::i18n::{Language, MessageKey};

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    Added,
    Edited,
    Deleted,
    AddFailed,
    EditFailed,
    DeleteFailed,
}

impl NotificationKind {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            NotificationKind::AddFailed | NotificationKind::EditFailed | NotificationKind::DeleteFailed
        )
    }

    pub fn message_key(&self) -> MessageKey {
        match self {
            NotificationKind::Added => MessageKey::SongAdded,
            NotificationKind::Edited => MessageKey::SongEdited,
            NotificationKind::Deleted => MessageKey::SongDeleted,
            NotificationKind::AddFailed => MessageKey::FailedToAdd,
            NotificationKind::EditFailed => MessageKey::FailedToEdit,
            NotificationKind::DeleteFailed => MessageKey::FailedToDelete,
        }
    }
}

/// Toast-style message for the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Song the notification refers to (absent for failed adds)
    pub song_id: Option<String>,
    /// Localized text
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, song_id: Option<String>, language: Language) -> Self {
        Self {
            kind,
            song_id,
            message: kind.message_key().text(language).to_string(),
            timestamp: Utc::now(),
        }
    }
}
