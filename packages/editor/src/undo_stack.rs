//! # Undo/Redo Stack
//!
//! Patch-based history over the whole [`DocumentState`].
//!
//! ## Design
//!
//! - Each entry stores a forward patch and its exact inverse, computed by
//!   diffing serialized snapshots taken before and after a change
//! - Undo applies the inverse and moves the entry to the redo stack
//! - Redo applies the forward patch and moves it back
//! - Recording a new entry clears the redo stack
//! - The undo stack is bounded; the oldest entry is evicted first
//!
//! Replay is all or nothing. The patch is applied to a serialized copy,
//! decoded and validated before the live state is replaced. If any step
//! fails, neither the state nor the stacks change.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! let before = doc.clone();
//! mutation.apply(&mut doc)?;
//! stack.record(HistoryEntry::between(&before, &doc)?);
//!
//! stack.undo(&mut doc)?;
//! stack.redo(&mut doc)?;
//! ```

use designer_document::{DocumentState, IntegrityError};
use designer_patch::{diff, Changeset, Patch, PatchError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{debug, error};

/// Default number of undo levels
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Failed to capture document state: {0}")]
    Capture(#[source] serde_json::Error),

    #[error("Patch did not apply: {0}")]
    Patch(#[from] PatchError),

    #[error("Patched state could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Patched state is inconsistent: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("Cannot replay history while an interaction is active")]
    InteractionActive,
}

/// One undoable step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub changes: Changeset,

    /// Optional description of this step ("Delete element", "Drag")
    pub description: Option<String>,
}

impl HistoryEntry {
    pub fn new(changes: Changeset) -> Self {
        Self {
            changes,
            description: None,
        }
    }

    /// Diff two serialized snapshots
    pub fn from_snapshots(before: &Value, after: &Value) -> Self {
        Self::new(diff(before, after))
    }

    /// Diff two document states
    pub fn between(before: &DocumentState, after: &DocumentState) -> Result<Self, HistoryError> {
        Ok(Self::from_snapshots(&capture(before)?, &capture(after)?))
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn forward(&self) -> &Patch {
        &self.changes.forward
    }

    pub fn inverse(&self) -> &Patch {
        &self.changes.inverse
    }
}

/// Serialize a document into the value tree patches operate on
pub fn capture(doc: &DocumentState) -> Result<Value, HistoryError> {
    serde_json::to_value(doc).map_err(HistoryError::Capture)
}

/// Produce the state `patch` leads to, without touching `doc`
fn replay(doc: &DocumentState, patch: &Patch) -> Result<DocumentState, HistoryError> {
    let patched = patch.apply_to(&capture(doc)?)?;
    let mut next: DocumentState = serde_json::from_value(patched).map_err(HistoryError::Decode)?;

    // Selection is not historical and may name an element this step removed
    if next.prune_selection() {
        debug!("cleared selection of an element removed by replay");
    }

    next.validate()?;
    Ok(next)
}

/// Undo/redo stacks for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Applied entries (most recent last)
    undo_stack: VecDeque<HistoryEntry>,

    /// Undone entries (most recent last)
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Push an entry onto the undo stack
    ///
    /// Empty entries are ignored. Returns true when the entry was kept.
    pub fn record(&mut self, entry: HistoryEntry) -> bool {
        if entry.is_empty() {
            return false;
        }

        debug!(
            ops = entry.forward().len(),
            description = entry.description.as_deref().unwrap_or(""),
            "recorded history entry"
        );
        self.undo_stack.push_back(entry);

        // Trim if exceeded max levels
        if self.max_levels > 0 {
            while self.undo_stack.len() > self.max_levels {
                self.undo_stack.pop_front();
            }
        }

        // New action invalidates the redo future
        self.redo_stack.clear();
        true
    }

    /// Undo the most recent entry
    ///
    /// Returns `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self, doc: &mut DocumentState) -> Result<bool, HistoryError> {
        let Some(entry) = self.undo_stack.back() else {
            return Ok(false);
        };

        let restored = replay(doc, entry.inverse()).inspect_err(|e| {
            error!(error = %e, description = ?entry.description, "undo failed, state left unchanged");
        })?;
        *doc = restored;

        if let Some(entry) = self.undo_stack.pop_back() {
            self.redo_stack.push(entry);
        }
        Ok(true)
    }

    /// Redo the most recently undone entry
    pub fn redo(&mut self, doc: &mut DocumentState) -> Result<bool, HistoryError> {
        let Some(entry) = self.redo_stack.last() else {
            return Ok(false);
        };

        let restored = replay(doc, entry.forward()).inspect_err(|e| {
            error!(error = %e, description = ?entry.description, "redo failed, state left unchanged");
        })?;
        *doc = restored;

        if let Some(entry) = self.redo_stack.pop() {
            self.undo_stack.push_back(entry);
        }
        Ok(true)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .back()
            .and_then(|entry| entry.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|entry| entry.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
