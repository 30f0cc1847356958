use crate::ElementId;
use thiserror::Error;

/// A broken structural invariant found by [`crate::DocumentState::validate`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrityError {
    #[error("Element {0} is keyed under a different id")]
    KeyMismatch(ElementId),

    #[error("Root order references unknown element {0}")]
    UnknownRoot(ElementId),

    #[error("Element {0} appears in root order but has a parent")]
    RootHasParent(ElementId),

    #[error("Root element {0} is missing from root order")]
    MissingFromRootOrder(ElementId),

    #[error("Element {0} appears more than once in its container")]
    DuplicateEntry(ElementId),

    #[error("Element {child} references missing parent {parent}")]
    MissingParent { child: ElementId, parent: ElementId },

    #[error("Element {parent} lists unknown child {child}")]
    UnknownChild { parent: ElementId, child: ElementId },

    #[error("Element {child} is listed by {parent} but points at {actual:?}")]
    ParentMismatch {
        parent: ElementId,
        child: ElementId,
        actual: Option<ElementId>,
    },

    #[error("Element {child} is missing from the children of {parent}")]
    MissingFromParent { parent: ElementId, child: ElementId },

    #[error("Cycle through element {0}")]
    Cycle(ElementId),

    #[error("Selection references unknown element {0}")]
    DanglingSelection(ElementId),
}
