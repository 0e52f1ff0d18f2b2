//! Snapshot-based undo/redo history.
//!
//! The history is content-agnostic: it stores serialized [`DesignDoc`]
//! snapshots and never aliases the live document, so a later edit can
//! never retroactively mutate an undo state.

use crate::doc::DesignDoc;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Default maximum number of retained snapshots.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// History errors.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// An immutable snapshot of a committed document state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Full serialized document.
    pub doc_json: String,
}

impl HistoryEntry {
    fn capture(doc: &DesignDoc) -> Result<Self, HistoryError> {
        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            doc_json: doc.to_json().map_err(HistoryError::Serialize)?,
        })
    }
}

/// Two bounded stacks of snapshots.
///
/// The top of `past` is always the current state, so undo needs at least
/// two entries. Pushing a new commit after an undo invalidates `future`.
#[derive(Debug, Default)]
pub struct History {
    past: Vec<HistoryEntry>,
    future: Vec<HistoryEntry>,
    max_entries: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Record a committed document state.
    ///
    /// Clears the redo stack and evicts the oldest entry once the cap
    /// is exceeded.
    pub fn commit(&mut self, doc: &DesignDoc) -> Result<(), HistoryError> {
        let entry = HistoryEntry::capture(doc)?;
        self.past.push(entry);
        self.future.clear();
        if self.past.len() > self.max_entries {
            self.past.remove(0);
        }
        Ok(())
    }

    /// Step back to the previous committed state.
    ///
    /// Returns `None` when there is no prior state. A snapshot that fails
    /// to deserialize rejects the operation and leaves both stacks
    /// untouched.
    pub fn undo(&mut self) -> Option<DesignDoc> {
        if self.past.len() <= 1 {
            return None;
        }
        // Validate the target snapshot before touching the stacks
        let target = &self.past[self.past.len() - 2];
        let doc = match DesignDoc::from_json(&target.doc_json) {
            Ok(doc) => doc,
            Err(err) => {
                log::warn!("undo rejected, malformed snapshot {}: {err}", target.id);
                return None;
            }
        };
        let current = self.past.pop()?;
        self.future.push(current);
        Some(doc)
    }

    /// Step forward to a state previously undone.
    pub fn redo(&mut self) -> Option<DesignDoc> {
        let target = self.future.last()?;
        let doc = match DesignDoc::from_json(&target.doc_json) {
            Ok(doc) => doc,
            Err(err) => {
                log::warn!("redo rejected, malformed snapshot {}: {err}", target.id);
                return None;
            }
        };
        let entry = self.future.pop()?;
        self.past.push(entry);
        Some(doc)
    }

    pub fn can_undo(&self) -> bool {
        self.past.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of retained past snapshots (including the current state).
    pub fn len(&self) -> usize {
        self.past.len()
    }

    pub fn is_empty(&self) -> bool {
        self.past.is_empty()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}
