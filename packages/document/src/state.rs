//! # Document State
//!
//! The canonical editable document: element table, root order and selection.
//!
//! Every element lives in exactly one *container*: either the root order
//! (when `parent_id` is `None`) or the `children` list of its parent.
//! Containers are addressed by `Option<&ElementId>`, where `None` means root.

use crate::{Element, ElementId, ElementTable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentState {
    pub elements: ElementTable,

    /// Top-level elements in paint / layer-panel order
    pub root_element_order: Vec<ElementId>,

    pub selected_element_id: Option<ElementId>,
}

impl DocumentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains(id)
    }

    /// Ordered children of a live element
    pub fn children_of(&self, id: &ElementId) -> Option<&[ElementId]> {
        self.elements.get(id).map(|e| e.children.as_slice())
    }

    pub fn is_root(&self, id: &ElementId) -> bool {
        self.elements.get(id).is_some_and(Element::is_root)
    }

    /// The ordered list identified by `parent` (root order for `None`)
    ///
    /// Returns `None` when `parent` names an element that is not live.
    pub fn container(&self, parent: Option<&ElementId>) -> Option<&[ElementId]> {
        match parent {
            None => Some(self.root_element_order.as_slice()),
            Some(id) => self.children_of(id),
        }
    }

    pub fn container_mut(&mut self, parent: Option<&ElementId>) -> Option<&mut Vec<ElementId>> {
        match parent {
            None => Some(&mut self.root_element_order),
            Some(id) => self.elements.get_mut(id).map(|e| &mut e.children),
        }
    }

    /// Position of `id` within the container it claims to belong to
    pub fn index_in_container(&self, id: &ElementId) -> Option<usize> {
        let element = self.elements.get(id)?;
        self.container(element.parent_id.as_ref())?
            .iter()
            .position(|c| c == id)
    }

    /// Clear the selection if it no longer names a live element
    ///
    /// Returns true when the selection was cleared.
    pub fn prune_selection(&mut self) -> bool {
        match &self.selected_element_id {
            Some(id) if !self.elements.contains(id) => {
                self.selected_element_id = None;
                true
            }
            _ => false,
        }
    }
}
