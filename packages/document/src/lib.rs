//! # Designer Document
//!
//! The canonical document model for the designer editing core.
//!
//! ## Layout
//!
//! ```text
//! DocumentState
//!  ├─ elements: ElementTable   (id → Element, the only owner)
//!  ├─ root_element_order       (ids with no parent, in paint order)
//!  └─ selected_element_id
//! ```
//!
//! Elements form an arena: `parent_id` and `children` are id references,
//! never owning pointers. Structural queries (descendants, ancestors,
//! cycle checks, integrity validation) are derived on demand in [`tree`].
//!
//! This crate does not mutate trees on its own; the editor crate's
//! mutations are the single writer.

mod element;
mod error;
mod id_generator;
mod state;
mod table;
pub mod tree;

pub use element::{style, Element, ElementId, Style, StyleValue};
pub use error::IntegrityError;
pub use id_generator::{get_document_seed, IdGenerator};
pub use state::DocumentState;
pub use table::ElementTable;
pub use tree::Ancestors;
