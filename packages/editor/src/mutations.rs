//! # Tree Mutations
//!
//! Structural operations on the document tree.
//!
//! ## Design Principles
//!
//! 1. **All or nothing**: every mutation validates against the current state
//!    before touching it, so a rejected mutation leaves state unchanged
//! 2. **Acyclic**: reparenting is refused when the new parent sits inside the
//!    moved subtree
//! 3. **One container**: an element lives in exactly one ordered list, the
//!    root order or its parent's `children`
//!
//! ## Mutation Semantics
//!
//! ### AddElement
//! - Inserts a fresh leaf; index clamps to append
//! - Fails if the id is taken or the parent is not live
//!
//! ### DeleteElement
//! - Removes the element and its whole subtree
//! - Clears the selection if it pointed anywhere inside that subtree
//!
//! ### SetParent
//! - Detach, relink, insert at index (or append)
//! - Fails on self-parenting and cycles
//!
//! ### ReorderSiblings
//! - Moves one id before/after another within the same list
//! - Target index is recomputed after the dragged id is removed

use designer_document::{DocumentState, Element, ElementId, Style};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Where a dragged sibling lands relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DropPosition {
    Before,
    After,
}

/// Structural edits to the document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mutation {
    /// Insert a new leaf element under `parent_id` (root when `None`)
    AddElement {
        element: Element,
        parent_id: Option<ElementId>,
        index: Option<usize>,
    },

    /// Remove an element and all of its descendants
    DeleteElement { element_id: ElementId },

    /// Shallow-merge style properties (last write wins per key)
    UpdateElementStyle { element_id: ElementId, style: Style },

    /// Replace the display name verbatim
    UpdateElementName { element_id: ElementId, name: String },

    /// Move an element to a new container
    SetParent {
        element_id: ElementId,
        new_parent_id: Option<ElementId>,
        index: Option<usize>,
    },

    /// Reorder within one container (root order when `parent_id` is `None`)
    ReorderSiblings {
        parent_id: Option<ElementId>,
        dragged_id: ElementId,
        target_id: ElementId,
        position: DropPosition,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(ElementId),

    #[error("Parent not found: {0}")]
    ParentNotFound(ElementId),

    #[error("Element id already in use: {0}")]
    DuplicateId(ElementId),

    #[error("Element {0} cannot be its own parent")]
    SelfParent(ElementId),

    #[error("Would create cycle: {parent} is inside the subtree of {child}")]
    CycleDetected { child: ElementId, parent: ElementId },

    #[error("{0} is not in the addressed sibling list")]
    NotASibling(ElementId),

    #[error("Invalid style value for {property}")]
    InvalidStyleValue { property: String },

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

impl Mutation {
    /// Stable, human-readable label (used as the history description)
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddElement { .. } => "Add element",
            Mutation::DeleteElement { .. } => "Delete element",
            Mutation::UpdateElementStyle { .. } => "Update style",
            Mutation::UpdateElementName { .. } => "Rename element",
            Mutation::SetParent { .. } => "Move element",
            Mutation::ReorderSiblings { .. } => "Reorder layers",
        }
    }

    /// Apply mutation with validation
    ///
    /// Nothing is written unless validation passes.
    pub fn apply(&self, doc: &mut DocumentState) -> Result<(), MutationError> {
        self.validate(doc)?;

        match self {
            Mutation::AddElement { element, parent_id, index } => {
                Self::apply_add(doc, element, parent_id.as_ref(), *index)
            }

            Mutation::DeleteElement { element_id } => Self::apply_delete(doc, element_id),

            Mutation::UpdateElementStyle { element_id, style } => {
                Self::apply_update_style(doc, element_id, style)
            }

            Mutation::UpdateElementName { element_id, name } => {
                Self::apply_update_name(doc, element_id, name)
            }

            Mutation::SetParent { element_id, new_parent_id, index } => {
                Self::apply_set_parent(doc, element_id, new_parent_id.as_ref(), *index)
            }

            Mutation::ReorderSiblings { parent_id, dragged_id, target_id, position } => {
                Self::apply_reorder(doc, parent_id.as_ref(), dragged_id, target_id, *position)
            }
        }
    }

    fn apply_add(
        doc: &mut DocumentState,
        element: &Element,
        parent_id: Option<&ElementId>,
        index: Option<usize>,
    ) -> Result<(), MutationError> {
        let container = doc
            .container_mut(parent_id)
            .ok_or_else(|| Self::parent_not_found(parent_id))?;
        insert_clamped(container, element.id.clone(), index);

        let mut element = element.clone();
        element.parent_id = parent_id.cloned();
        doc.elements.insert(element);
        Ok(())
    }

    fn apply_delete(doc: &mut DocumentState, element_id: &ElementId) -> Result<(), MutationError> {
        let parent_id = doc
            .get(element_id)
            .ok_or_else(|| MutationError::NodeNotFound(element_id.clone()))?
            .parent_id
            .clone();

        // Everything that goes, computed before anything is written
        let mut doomed: BTreeSet<ElementId> =
            doc.get_all_descendant_ids(element_id).into_iter().collect();
        doomed.insert(element_id.clone());

        let container = doc
            .container_mut(parent_id.as_ref())
            .ok_or_else(|| Self::parent_not_found(parent_id.as_ref()))?;
        container.retain(|id| id != element_id);

        if doc
            .selected_element_id
            .as_ref()
            .is_some_and(|selected| doomed.contains(selected))
        {
            doc.selected_element_id = None;
        }

        for id in &doomed {
            doc.elements.remove(id);
        }
        Ok(())
    }

    fn apply_update_style(
        doc: &mut DocumentState,
        element_id: &ElementId,
        style: &Style,
    ) -> Result<(), MutationError> {
        let element = doc
            .get_mut(element_id)
            .ok_or_else(|| MutationError::NodeNotFound(element_id.clone()))?;

        for (property, value) in style {
            element.style.insert(property.clone(), value.clone());
        }
        Ok(())
    }

    fn apply_update_name(
        doc: &mut DocumentState,
        element_id: &ElementId,
        name: &str,
    ) -> Result<(), MutationError> {
        let element = doc
            .get_mut(element_id)
            .ok_or_else(|| MutationError::NodeNotFound(element_id.clone()))?;
        element.name = name.to_string();
        Ok(())
    }

    fn apply_set_parent(
        doc: &mut DocumentState,
        element_id: &ElementId,
        new_parent_id: Option<&ElementId>,
        index: Option<usize>,
    ) -> Result<(), MutationError> {
        let old_parent_id = doc
            .get(element_id)
            .ok_or_else(|| MutationError::NodeNotFound(element_id.clone()))?
            .parent_id
            .clone();

        if let Some(new_parent_id) = new_parent_id {
            if !doc.contains(new_parent_id) {
                return Err(MutationError::ParentNotFound(new_parent_id.clone()));
            }
        }

        // Detach from the old container
        let old_container = doc
            .container_mut(old_parent_id.as_ref())
            .ok_or_else(|| Self::parent_not_found(old_parent_id.as_ref()))?;
        old_container.retain(|id| id != element_id);

        // Insert into the new one
        let new_container = doc
            .container_mut(new_parent_id)
            .ok_or_else(|| Self::parent_not_found(new_parent_id))?;
        insert_clamped(new_container, element_id.clone(), index);

        let element = doc
            .get_mut(element_id)
            .ok_or_else(|| MutationError::NodeNotFound(element_id.clone()))?;
        element.parent_id = new_parent_id.cloned();
        Ok(())
    }

    fn apply_reorder(
        doc: &mut DocumentState,
        parent_id: Option<&ElementId>,
        dragged_id: &ElementId,
        target_id: &ElementId,
        position: DropPosition,
    ) -> Result<(), MutationError> {
        if dragged_id == target_id {
            return Ok(());
        }

        let list = doc
            .container_mut(parent_id)
            .ok_or_else(|| Self::parent_not_found(parent_id))?;

        let from = list
            .iter()
            .position(|id| id == dragged_id)
            .ok_or_else(|| MutationError::NotASibling(dragged_id.clone()))?;
        let dragged = list.remove(from);

        // Indices shifted: look the target up again in the shortened list
        let target = list
            .iter()
            .position(|id| id == target_id)
            .ok_or_else(|| MutationError::NotASibling(target_id.clone()))?;

        let at = match position {
            DropPosition::Before => target,
            DropPosition::After => target + 1,
        };
        list.insert(at, dragged);
        Ok(())
    }

    fn parent_not_found(parent_id: Option<&ElementId>) -> MutationError {
        match parent_id {
            Some(id) => MutationError::ParentNotFound(id.clone()),
            None => MutationError::InvalidStructure("root order unavailable".to_string()),
        }
    }

    /// Validate without applying
    pub fn validate(&self, doc: &DocumentState) -> Result<(), MutationError> {
        match self {
            Mutation::AddElement { element, parent_id, .. } => {
                if doc.contains(&element.id) {
                    return Err(MutationError::DuplicateId(element.id.clone()));
                }

                if !element.children.is_empty() {
                    return Err(MutationError::InvalidStructure(format!(
                        "new element {} must not carry children",
                        element.id
                    )));
                }

                Self::validate_style(&element.style)?;

                if let Some(parent_id) = parent_id {
                    if !doc.contains(parent_id) {
                        return Err(MutationError::ParentNotFound(parent_id.clone()));
                    }
                }

                Ok(())
            }

            Mutation::DeleteElement { element_id } => {
                Self::validate_attached(doc, element_id)
            }

            Mutation::UpdateElementStyle { element_id, style } => {
                if !doc.contains(element_id) {
                    return Err(MutationError::NodeNotFound(element_id.clone()));
                }
                Self::validate_style(style)
            }

            Mutation::UpdateElementName { element_id, .. } => {
                if !doc.contains(element_id) {
                    return Err(MutationError::NodeNotFound(element_id.clone()));
                }
                Ok(())
            }

            Mutation::SetParent { element_id, new_parent_id, .. } => {
                Self::validate_attached(doc, element_id)?;

                if let Some(new_parent_id) = new_parent_id {
                    if new_parent_id == element_id {
                        return Err(MutationError::SelfParent(element_id.clone()));
                    }

                    if !doc.contains(new_parent_id) {
                        return Err(MutationError::ParentNotFound(new_parent_id.clone()));
                    }

                    if doc.would_create_cycle(element_id, new_parent_id) {
                        return Err(MutationError::CycleDetected {
                            child: element_id.clone(),
                            parent: new_parent_id.clone(),
                        });
                    }
                }

                Ok(())
            }

            Mutation::ReorderSiblings { parent_id, dragged_id, target_id, .. } => {
                let list = doc
                    .container(parent_id.as_ref())
                    .ok_or_else(|| Self::parent_not_found(parent_id.as_ref()))?;

                for id in [dragged_id, target_id] {
                    if !list.contains(id) {
                        return Err(MutationError::NotASibling(id.clone()));
                    }
                }

                Ok(())
            }
        }
    }

    /// The element exists and its container actually lists it
    fn validate_attached(doc: &DocumentState, element_id: &ElementId) -> Result<(), MutationError> {
        let element = doc
            .get(element_id)
            .ok_or_else(|| MutationError::NodeNotFound(element_id.clone()))?;

        let listed = doc
            .container(element.parent_id.as_ref())
            .is_some_and(|list| list.contains(element_id));

        if !listed {
            return Err(MutationError::InvalidStructure(format!(
                "{} is missing from its container",
                element_id
            )));
        }
        Ok(())
    }

    fn validate_style(style: &Style) -> Result<(), MutationError> {
        match style.iter().find(|(_, value)| !value.is_valid()) {
            Some((property, _)) => Err(MutationError::InvalidStyleValue {
                property: property.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Insert at `index`, appending when it is absent or past the end
fn insert_clamped(list: &mut Vec<ElementId>, id: ElementId, index: Option<usize>) {
    let at = index.map_or(list.len(), |i| i.min(list.len()));
    list.insert(at, id);
}
