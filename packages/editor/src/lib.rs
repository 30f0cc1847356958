//! # Designer Editor
//!
//! State-management core of the visual document editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI collaborators (canvas, layers panel)     │
//! └─────────────────────────────────────────────┘
//!                     ↓ operations
//! ┌─────────────────────────────────────────────┐
//! │ EditSession                                 │
//! │  - Tree mutations with validation           │
//! │  - RecordMode: Recording / Replaying        │
//! │  - InteractionCoordinator (gestures)        │
//! │  - UndoStack (patch-based history)          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: DocumentState (element arena)     │
//! │ patch: structural diff / apply              │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **All or nothing**: a mutation is validated before it writes; a
//!    rejected one leaves state exactly as it was
//! 2. **History is diffs**: every recorded step is a forward patch plus its
//!    inverse, computed from whole-state snapshots
//! 3. **One gesture, one step**: mutations issued during a drag or resize
//!    collapse into a single entry
//! 4. **Selection is not history**: selecting never creates an undo step
//!
//! ## Usage
//!
//! ```rust
//! use designer_editor::{DropPosition, EditSession};
//! use designer_document::style;
//!
//! let mut session = EditSession::new();
//! let frame = session.create_element("Frame", style([("left", "0px")]), None, None)?;
//!
//! // A drag: many updates, one undo step
//! session.start_interaction()?;
//! for x in [10, 20, 30] {
//!     session.update_element_style(&frame, style([("left", format!("{}px", x))]))?;
//! }
//! session.end_interaction()?;
//!
//! session.undo()?;
//! let left = session.element(&frame).and_then(|e| e.style_value("left"));
//! assert_eq!(left.and_then(|v| v.as_text()), Some("0px"));
//! # Ok::<(), designer_editor::EditorError>(())
//! ```

mod config;
mod errors;
mod interaction;
mod mode;
mod mutations;
mod session;
mod undo_stack;

pub use config::{ConfigError, EditorConfig, StallPolicy, DEFAULT_CONFIG_NAME};
pub use errors::EditorError;
pub use interaction::{InteractionCoordinator, InteractionError, InteractionSnapshot};
pub use mode::RecordMode;
pub use mutations::{DropPosition, Mutation, MutationError};
pub use session::EditSession;
pub use undo_stack::{capture, HistoryEntry, HistoryError, UndoStack, DEFAULT_HISTORY_LIMIT};

// Re-export common types for convenience
pub use designer_document::{DocumentState, Element, ElementId, Style, StyleValue};
