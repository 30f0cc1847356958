//! # Edit Session
//!
//! The editing context a host application owns: document state, UI state,
//! history and the gesture coordinator, behind one `&mut self` API.
//!
//! Every tree operation goes through [`EditSession::apply`]:
//!
//! - **Recording**: the whole state is captured before and after the
//!   mutation and the diff is pushed as one history entry
//! - **Replaying**: the mutation writes straight to state (during a gesture);
//!   the coordinator records the gesture as a whole when it ends
//!
//! Rejected operations leave state untouched, emit a `warn` diagnostic and
//! return the reason as an error value.

use crate::config::{EditorConfig, StallPolicy};
use crate::interaction::{InteractionCoordinator, InteractionError};
use crate::mode::RecordMode;
use crate::mutations::{DropPosition, Mutation, MutationError};
use crate::undo_stack::{capture, HistoryEntry, HistoryError, UndoStack};
use crate::EditorError;
use designer_document::{DocumentState, Element, ElementId, ElementTable, IdGenerator, Style};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Single-user editing session
#[derive(Debug)]
pub struct EditSession {
    document: DocumentState,

    /// Collapsed rows in the layers panel (never undoable)
    ///
    /// During a gesture this may still name elements the gesture deleted.
    collapsed_layers: BTreeSet<ElementId>,

    history: UndoStack,
    interaction: InteractionCoordinator,
    mode: RecordMode,
    ids: IdGenerator,
    config: EditorConfig,

    /// Increments on every applied mutation, undo, redo and rollback
    version: u64,
}

impl EditSession {
    /// Create an empty session with default configuration
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            document: DocumentState::new(),
            collapsed_layers: BTreeSet::new(),
            history: UndoStack::with_max_levels(config.history_limit),
            interaction: InteractionCoordinator::new(),
            mode: RecordMode::Recording,
            ids: IdGenerator::new(&config.document_name),
            config,
            version: 0,
        }
    }

    /// Create a session configured from `designer.config.json` in `dir`
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config = EditorConfig::load(dir)?;
        debug!(history_limit = config.history_limit, document = %config.document_name, "opened session");
        Ok(Self::with_config(config))
    }

    /// Apply a tree mutation, recording it unless a gesture is active
    pub fn apply(&mut self, mutation: Mutation) -> Result<(), EditorError> {
        if self.mode.is_recording() {
            let before = capture(&self.document)?;
            mutation
                .apply(&mut self.document)
                .map_err(|e| Self::rejected(&mutation, e))?;
            let after = capture(&self.document)?;

            let entry =
                HistoryEntry::from_snapshots(&before, &after).with_description(mutation.name());
            self.history.record(entry);

            // A cancelled gesture may bring deleted elements back, so flags
            // are only pruned once the gesture is over
            self.prune_collapsed();
        } else {
            mutation
                .apply(&mut self.document)
                .map_err(|e| Self::rejected(&mutation, e))?;
        }

        self.version += 1;
        debug!(mutation = mutation.name(), mode = ?self.mode, version = self.version, "applied mutation");
        Ok(())
    }

    fn prune_collapsed(&mut self) {
        self.collapsed_layers
            .retain(|id| self.document.contains(id));
    }

    fn rejected(mutation: &Mutation, error: MutationError) -> EditorError {
        warn!(mutation = mutation.name(), %error, "rejected mutation");
        error.into()
    }

    /// Insert `element` under `parent_id` (root when `None`) at `index`
    pub fn add_element(
        &mut self,
        element: Element,
        parent_id: Option<&ElementId>,
        index: Option<usize>,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::AddElement {
            element,
            parent_id: parent_id.cloned(),
            index,
        })
    }

    /// Mint a fresh id and add a new element with it
    pub fn create_element(
        &mut self,
        name: impl Into<String>,
        style: Style,
        parent_id: Option<&ElementId>,
        index: Option<usize>,
    ) -> Result<ElementId, EditorError> {
        let mut id = self.ids.new_id();
        while self.document.contains(&id) {
            id = self.ids.new_id();
        }

        let element = Element::new(id.clone(), name).with_style(style);
        self.add_element(element, parent_id, index)?;
        Ok(id)
    }

    pub fn delete_element(&mut self, element_id: &ElementId) -> Result<(), EditorError> {
        self.apply(Mutation::DeleteElement {
            element_id: element_id.clone(),
        })
    }

    pub fn update_element_style(
        &mut self,
        element_id: &ElementId,
        style: Style,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::UpdateElementStyle {
            element_id: element_id.clone(),
            style,
        })
    }

    pub fn update_element_name(
        &mut self,
        element_id: &ElementId,
        name: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::UpdateElementName {
            element_id: element_id.clone(),
            name: name.into(),
        })
    }

    pub fn set_parent(
        &mut self,
        element_id: &ElementId,
        new_parent_id: Option<&ElementId>,
        index: Option<usize>,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::SetParent {
            element_id: element_id.clone(),
            new_parent_id: new_parent_id.cloned(),
            index,
        })
    }

    pub fn reorder_siblings(
        &mut self,
        parent_id: Option<&ElementId>,
        dragged_id: &ElementId,
        target_id: &ElementId,
        position: DropPosition,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::ReorderSiblings {
            parent_id: parent_id.cloned(),
            dragged_id: dragged_id.clone(),
            target_id: target_id.clone(),
            position,
        })
    }

    /// Update selection (never recorded in history)
    pub fn select_element(&mut self, element_id: Option<&ElementId>) -> Result<(), EditorError> {
        if let Some(id) = element_id {
            if !self.document.contains(id) {
                warn!(element = %id, "cannot select unknown element");
                return Err(MutationError::NodeNotFound(id.clone()).into());
            }
        }

        self.document.selected_element_id = element_id.cloned();
        Ok(())
    }

    /// Flip the collapsed flag of a layer, returning the new value
    pub fn toggle_layer_collapse(&mut self, element_id: &ElementId) -> Result<bool, EditorError> {
        if !self.document.contains(element_id) {
            warn!(element = %element_id, "cannot collapse unknown element");
            return Err(MutationError::NodeNotFound(element_id.clone()).into());
        }

        if self.collapsed_layers.remove(element_id) {
            Ok(false)
        } else {
            self.collapsed_layers.insert(element_id.clone());
            Ok(true)
        }
    }

    /// Begin a gesture: until it ends, mutations are not recorded one by one
    pub fn start_interaction(&mut self) -> Result<(), EditorError> {
        self.begin_interaction(None)
    }

    /// Like [`Self::start_interaction`], naming the resulting history entry
    pub fn start_interaction_with_label(
        &mut self,
        label: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.begin_interaction(Some(label.into()))
    }

    #[instrument(skip(self))]
    fn begin_interaction(&mut self, label: Option<String>) -> Result<(), EditorError> {
        self.interaction
            .begin(&self.document, label)
            .inspect_err(|e| warn!(error = %e, "rejected interaction start"))?;

        self.mode = RecordMode::Replaying;
        debug!("interaction started");
        Ok(())
    }

    /// End the gesture, recording at most one entry for all of it
    ///
    /// Returns true when an entry was recorded.
    #[instrument(skip(self))]
    pub fn end_interaction(&mut self) -> Result<bool, EditorError> {
        if !self.interaction.is_active() {
            warn!("end_interaction called with no active interaction");
            return Err(InteractionError::NotActive.into());
        }

        let label = self
            .interaction
            .snapshot()
            .and_then(|snapshot| snapshot.label())
            .map(str::to_owned);

        self.mode = RecordMode::Recording;
        let entry = self.interaction.finish(&self.document)?;
        self.prune_collapsed();

        let recorded = match entry {
            Some(entry) => self.history.record(entry),
            None => false,
        };
        debug!(recorded, label = label.as_deref().unwrap_or(""), "interaction ended");
        Ok(recorded)
    }

    /// Abandon the gesture and roll back to the state it started from
    ///
    /// Nothing is recorded. The live selection is kept if it is still valid.
    #[instrument(skip(self))]
    pub fn cancel_interaction(&mut self) -> Result<(), EditorError> {
        let mut restored = self
            .interaction
            .cancel()
            .inspect_err(|e| warn!(error = %e, "rejected interaction cancel"))?;
        self.mode = RecordMode::Recording;

        restored.selected_element_id = self.document.selected_element_id.take();
        restored.prune_selection();
        self.document = restored;

        self.prune_collapsed();
        self.version += 1;
        debug!("interaction cancelled");
        Ok(())
    }

    /// End an active gesture from outside (focus loss, window blur)
    ///
    /// Follows the configured [`StallPolicy`]. Returns false when idle.
    pub fn interrupt_interaction(&mut self) -> Result<bool, EditorError> {
        if !self.interaction.is_active() {
            return Ok(false);
        }

        match self.config.stalled_interaction {
            StallPolicy::Commit => {
                self.end_interaction()?;
            }
            StallPolicy::Discard => self.cancel_interaction()?,
        }
        Ok(true)
    }

    /// Interrupt the gesture if it has outlived the configured timeout
    pub fn expire_stalled_interaction(&mut self) -> Result<bool, EditorError> {
        let Some(timeout) = self.config.interaction_timeout() else {
            return Ok(false);
        };

        if !self.interaction.is_stalled(timeout) {
            return Ok(false);
        }

        warn!(timeout_ms = timeout.as_millis() as u64, "interaction stalled");
        self.interrupt_interaction()
    }

    /// Undo the most recent entry; `Ok(false)` when there is nothing to undo
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        self.ensure_idle()?;

        let undone = self.with_mode(RecordMode::Replaying, |session| {
            session.history.undo(&mut session.document)
        })?;
        self.after_replay(undone);
        Ok(undone)
    }

    /// Redo the most recently undone entry
    #[instrument(skip(self))]
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        self.ensure_idle()?;

        let redone = self.with_mode(RecordMode::Replaying, |session| {
            session.history.redo(&mut session.document)
        })?;
        self.after_replay(redone);
        Ok(redone)
    }

    fn ensure_idle(&self) -> Result<(), EditorError> {
        if self.interaction.is_active() {
            warn!("history replay requested during an active interaction");
            return Err(HistoryError::InteractionActive.into());
        }
        Ok(())
    }

    fn after_replay(&mut self, changed: bool) {
        if changed {
            self.prune_collapsed();
            self.version += 1;
        }
    }

    /// Run `f` in `mode`, restoring the previous mode on every exit path
    fn with_mode<R>(&mut self, mode: RecordMode, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.mode, mode);
        let result = f(self);
        self.mode = previous;
        result
    }

    /// Drop all undo/redo history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn document(&self) -> &DocumentState {
        &self.document
    }

    pub fn elements(&self) -> &ElementTable {
        &self.document.elements
    }

    pub fn element(&self, element_id: &ElementId) -> Option<&Element> {
        self.document.get(element_id)
    }

    pub fn root_element_order(&self) -> &[ElementId] {
        &self.document.root_element_order
    }

    pub fn selected_element_id(&self) -> Option<&ElementId> {
        self.document.selected_element_id.as_ref()
    }

    pub fn collapsed_layers(&self) -> &BTreeSet<ElementId> {
        &self.collapsed_layers
    }

    pub fn is_collapsed(&self, element_id: &ElementId) -> bool {
        self.collapsed_layers.contains(element_id) && self.document.contains(element_id)
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_levels(&self) -> usize {
        self.history.undo_levels()
    }

    pub fn redo_levels(&self) -> usize {
        self.history.redo_levels()
    }

    pub fn mode(&self) -> RecordMode {
        self.mode
    }

    pub fn is_interacting(&self) -> bool {
        self.interaction.is_active()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use designer_document::style;

    #[test]
    fn test_session_creation() {
        let session = EditSession::new();

        assert!(session.elements().is_empty());
        assert!(session.root_element_order().is_empty());
        assert_eq!(session.selected_element_id(), None);
        assert_eq!(session.mode(), RecordMode::Recording);
        assert!(!session.can_undo());
        assert_eq!(session.version(), 0);
    }

    #[test]
    fn test_open_reads_config_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(crate::DEFAULT_CONFIG_NAME),
            r#"{ "historyLimit": 3, "documentName": "landing" }"#,
        )
        .unwrap();

        let mut session = EditSession::open(dir.path()).unwrap();
        assert_eq!(session.history().max_levels(), 3);

        let id = session.create_element("A", Style::new(), None, None).unwrap();
        let seed = designer_document::get_document_seed("landing");
        assert_eq!(id.as_str(), format!("{}-1", seed));
    }

    #[test]
    fn test_open_rejects_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(crate::DEFAULT_CONFIG_NAME), "{ nope").unwrap();

        assert!(matches!(
            EditSession::open(dir.path()),
            Err(EditorError::Config(_))
        ));
    }

    #[test]
    fn test_create_element_mints_sequential_ids() {
        let mut session = EditSession::new();

        let a = session.create_element("Frame", Style::new(), None, None).unwrap();
        let b = session.create_element("Text", Style::new(), Some(&a), None).unwrap();

        assert!(a.as_str().ends_with("-1"));
        assert!(b.as_str().ends_with("-2"));
        assert_eq!(session.element(&b).unwrap().parent_id.as_ref(), Some(&a));
        assert_eq!(session.undo_levels(), 2);
    }

    #[test]
    fn test_create_element_skips_taken_ids() {
        let mut session = EditSession::new();
        let taken = IdGenerator::new("untitled").new_id();
        session.add_element(Element::new(taken.clone(), "Manual"), None, None).unwrap();

        let minted = session.create_element("Auto", Style::new(), None, None).unwrap();
        assert_ne!(minted, taken);
    }

    #[test]
    fn test_rejected_mutation_records_nothing() {
        let mut session = EditSession::new();
        let result = session.delete_element(&"ghost".into());

        assert!(matches!(
            result,
            Err(EditorError::Mutation(MutationError::NodeNotFound(_)))
        ));
        assert!(!session.can_undo());
        assert_eq!(session.version(), 0);
    }

    #[test]
    fn test_select_and_collapse_are_not_history() {
        let mut session = EditSession::new();
        let a = session.create_element("A", Style::new(), None, None).unwrap();

        session.select_element(Some(&a)).unwrap();
        assert!(session.toggle_layer_collapse(&a).unwrap());
        assert!(session.is_collapsed(&a));
        assert_eq!(session.undo_levels(), 1);

        assert!(!session.toggle_layer_collapse(&a).unwrap());
        assert!(session.select_element(Some(&"ghost".into())).is_err());
        assert_eq!(session.selected_element_id(), Some(&a));
    }

    #[test]
    fn test_delete_forgets_collapsed_state() {
        let mut session = EditSession::new();
        let a = session.create_element("A", Style::new(), None, None).unwrap();
        session.toggle_layer_collapse(&a).unwrap();

        session.delete_element(&a).unwrap();
        assert!(session.collapsed_layers().is_empty());
    }

    #[test]
    fn test_cancelled_gesture_keeps_collapsed_state() {
        let mut session = EditSession::new();
        let a = session.create_element("A", Style::new(), None, None).unwrap();
        session.toggle_layer_collapse(&a).unwrap();

        session.start_interaction().unwrap();
        session.delete_element(&a).unwrap();
        assert!(!session.is_collapsed(&a));
        session.cancel_interaction().unwrap();

        assert!(session.element(&a).is_some());
        assert!(session.is_collapsed(&a));
    }

    #[test]
    fn test_committed_gesture_forgets_deleted_collapsed_state() {
        let mut session = EditSession::new();
        let a = session.create_element("A", Style::new(), None, None).unwrap();
        session.toggle_layer_collapse(&a).unwrap();

        session.start_interaction().unwrap();
        session.delete_element(&a).unwrap();
        session.end_interaction().unwrap();

        assert!(session.collapsed_layers().is_empty());
    }

    #[test]
    fn test_mode_follows_interaction() {
        let mut session = EditSession::new();
        let a = session
            .create_element("A", style([("left", "0px")]), None, None)
            .unwrap();

        session.start_interaction().unwrap();
        assert_eq!(session.mode(), RecordMode::Replaying);
        session.update_element_style(&a, style([("left", "5px")])).unwrap();
        assert_eq!(session.undo_levels(), 1);

        assert!(session.end_interaction().unwrap());
        assert_eq!(session.mode(), RecordMode::Recording);
        assert_eq!(session.undo_levels(), 2);
    }

    #[test]
    fn test_mode_restored_after_failed_undo_guard() {
        let mut session = EditSession::new();
        session.create_element("A", Style::new(), None, None).unwrap();

        session.start_interaction().unwrap();
        assert!(matches!(
            session.undo(),
            Err(EditorError::History(HistoryError::InteractionActive))
        ));
        assert_eq!(session.mode(), RecordMode::Replaying);

        session.end_interaction().unwrap();
        assert!(session.undo().unwrap());
        assert_eq!(session.mode(), RecordMode::Recording);
    }
}
