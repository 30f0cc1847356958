//! # Interaction Coordinator
//!
//! Collapses one pointer gesture (drag, resize) into a single history entry.
//!
//! ```text
//!   idle ──begin()──► active ──finish()──► idle   (one entry, if anything changed)
//!                        │
//!                        └────cancel()───► idle   (state rolled back, nothing recorded)
//! ```
//!
//! While active, the session mutates state directly without recording. The
//! coordinator owns the snapshot taken at `begin` and diffs it against the
//! live state at `finish`.

use crate::undo_stack::{HistoryEntry, HistoryError};
use designer_document::DocumentState;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InteractionError {
    #[error("An interaction is already active")]
    AlreadyActive,

    #[error("No interaction is active")]
    NotActive,

    #[error("Failed to capture interaction: {0}")]
    Capture(#[from] HistoryError),
}

/// Document state captured when a gesture starts
#[derive(Debug, Clone)]
pub struct InteractionSnapshot {
    state: DocumentState,
    started_at: Instant,
    label: Option<String>,
}

impl InteractionSnapshot {
    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[derive(Debug, Default)]
pub struct InteractionCoordinator {
    active: Option<InteractionSnapshot>,
}

impl InteractionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn snapshot(&self) -> Option<&InteractionSnapshot> {
        self.active.as_ref()
    }

    /// Start a gesture, capturing `doc`
    ///
    /// Only one gesture may run at a time; a second `begin` is rejected and
    /// leaves the running gesture untouched.
    pub fn begin(
        &mut self,
        doc: &DocumentState,
        label: Option<String>,
    ) -> Result<(), InteractionError> {
        if self.active.is_some() {
            return Err(InteractionError::AlreadyActive);
        }

        self.active = Some(InteractionSnapshot {
            state: doc.clone(),
            started_at: Instant::now(),
            label,
        });
        Ok(())
    }

    /// End the gesture and compute the entry that covers it
    ///
    /// Returns `None` when the gesture changed nothing. Selection is aligned
    /// with the live state before diffing, so picking a different element
    /// never lands in history. A selection cleared because the gesture
    /// deleted the selected element is kept, as it is for a plain delete.
    pub fn finish(&mut self, doc: &DocumentState) -> Result<Option<HistoryEntry>, InteractionError> {
        let snapshot = self.active.take().ok_or(InteractionError::NotActive)?;

        let mut before = snapshot.state;
        let selection_survived = before
            .selected_element_id
            .as_ref()
            .map_or(true, |selected| doc.contains(selected));
        if selection_survived {
            before.selected_element_id = doc.selected_element_id.clone();
        }

        let mut entry = HistoryEntry::between(&before, doc)?;
        if entry.is_empty() {
            return Ok(None);
        }

        if let Some(label) = snapshot.label {
            entry = entry.with_description(label);
        }
        Ok(Some(entry))
    }

    /// Abandon the gesture, handing back the state captured at `begin`
    pub fn cancel(&mut self) -> Result<DocumentState, InteractionError> {
        self.active
            .take()
            .map(|snapshot| snapshot.state)
            .ok_or(InteractionError::NotActive)
    }

    /// True when a gesture has been running for at least `timeout`
    pub fn is_stalled(&self, timeout: Duration) -> bool {
        self.active
            .as_ref()
            .is_some_and(|snapshot| snapshot.elapsed() >= timeout)
    }
}
