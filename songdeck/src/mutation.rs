//! Optimistic delete state machine
//!
//! ```text
//! idle ──begin──▶ pending ──commit────▶ committed
//!                    │
//!                    └─────roll_back──▶ rolled-back
//! ```
//!
//! `PendingDelete` holds the pre-image captured when the local removal was
//! applied. Resolving consumes it, so a mutation resolves at most once.

use tracing::warn;

use crate::cache::{Snapshot, SongCache};

/// Observable phase of a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Idle,
    Pending,
    Committed,
    RolledBack,
}

/// Delete applied locally, awaiting the Catalog API
#[derive(Debug)]
#[must_use = "a pending delete must be committed or rolled back"]
pub struct PendingDelete {
    id: String,
    previous: Snapshot,
    removed: bool,
}

impl PendingDelete {
    /// Apply the optimistic removal
    pub fn begin(cache: &SongCache, id: &str) -> Self {
        let (previous, removed) = cache.remove_optimistically(id);
        Self {
            id: id.to_string(),
            previous,
            removed,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the record was present locally when the delete began
    pub fn removed_locally(&self) -> bool {
        self.removed
    }

    pub fn phase(&self) -> MutationPhase {
        MutationPhase::Pending
    }

    /// Remote delete confirmed; the local removal stands
    pub fn commit(self) -> MutationPhase {
        MutationPhase::Committed
    }

    /// Remote delete failed; restore the pre-image verbatim
    ///
    /// Mutations that landed after `begin` are overwritten.
    pub fn roll_back(self, cache: &SongCache) -> MutationPhase {
        warn!(
            id = %self.id,
            restored = self.previous.len(),
            "Rolling back optimistic delete"
        );
        cache.restore(self.previous);
        MutationPhase::RolledBack
    }
}
