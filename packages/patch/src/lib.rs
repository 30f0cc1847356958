//! # Designer Patch
//!
//! A minimal structural version-control primitive over `serde_json::Value`.
//!
//! ```text
//! before ──diff──► Changeset { forward, inverse }
//!
//! forward.apply(before) == after
//! inverse.apply(after)  == before
//! ```
//!
//! The crate knows nothing about documents or elements. Anything that
//! serializes to JSON can be diffed, patched and rolled back.
//!
//! ## Usage
//!
//! ```rust
//! use designer_patch::diff;
//! use serde_json::json;
//!
//! let before = json!({ "order": ["a", "b"] });
//! let after = json!({ "order": ["b", "a"] });
//!
//! let changes = diff(&before, &after);
//! assert_eq!(changes.forward.apply_to(&before).unwrap(), after);
//! assert_eq!(changes.inverse.apply_to(&after).unwrap(), before);
//! ```

mod diff;
mod error;
mod patch;
mod path;

pub use diff::{diff, Changeset};
pub use error::PatchError;
pub use patch::{Patch, PatchOp};
pub use path::{Path, PathSegment};
