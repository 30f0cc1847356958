//! # Tree Index
//!
//! Structural queries derived from the element table on every call.
//! Nothing here is cached, so results can never go stale after a mutation.
//!
//! Walks are bounded by the table size: they terminate even if a corrupt
//! state (e.g. one decoded from a bad patch) contains a cycle.

use crate::{DocumentState, ElementId, IntegrityError};
use std::collections::BTreeSet;

/// Iterator over the ancestors of an element, nearest first
pub struct Ancestors<'a> {
    doc: &'a DocumentState,
    next: Option<&'a ElementId>,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = self
            .doc
            .elements
            .get(current)
            .and_then(|e| e.parent_id.as_ref());
        Some(current)
    }
}

impl DocumentState {
    /// Depth-first, pre-order walk over `children` (excludes `id` itself)
    pub fn get_all_descendant_ids(&self, id: &ElementId) -> Vec<ElementId> {
        let mut descendants = Vec::new();
        let mut seen: BTreeSet<&ElementId> = BTreeSet::from([id]);

        let mut stack: Vec<&ElementId> = match self.elements.get(id) {
            Some(element) => element.children.iter().rev().collect(),
            None => return descendants,
        };

        while let Some(next) = stack.pop() {
            if !seen.insert(next) {
                continue;
            }
            descendants.push(next.clone());
            if let Some(element) = self.elements.get(next) {
                stack.extend(element.children.iter().rev());
            }
        }

        descendants
    }

    /// Walk `parent_id` links upward from `id` (excludes `id` itself)
    pub fn ancestors<'a>(&'a self, id: &ElementId) -> Ancestors<'a> {
        Ancestors {
            doc: self,
            next: self.elements.get(id).and_then(|e| e.parent_id.as_ref()),
            remaining: self.elements.len(),
        }
    }

    /// True when `ancestor` appears on the parent chain of `id`
    pub fn is_descendant_of(&self, id: &ElementId, ancestor: &ElementId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Would making `new_parent` the parent of `child` close a loop?
    pub fn would_create_cycle(&self, child: &ElementId, new_parent: &ElementId) -> bool {
        child == new_parent || self.is_descendant_of(new_parent, child)
    }

    /// Number of ancestors (0 for roots)
    pub fn depth(&self, id: &ElementId) -> usize {
        self.ancestors(id).count()
    }

    /// Check every structural invariant of the document
    pub fn validate(&self) -> Result<(), IntegrityError> {
        for (key, element) in self.elements.iter() {
            if key != &element.id {
                return Err(IntegrityError::KeyMismatch(key.clone()));
            }
        }

        let mut roots = BTreeSet::new();
        for id in &self.root_element_order {
            let element = self
                .elements
                .get(id)
                .ok_or_else(|| IntegrityError::UnknownRoot(id.clone()))?;
            if element.parent_id.is_some() {
                return Err(IntegrityError::RootHasParent(id.clone()));
            }
            if !roots.insert(id) {
                return Err(IntegrityError::DuplicateEntry(id.clone()));
            }
        }

        for element in self.elements.values() {
            match &element.parent_id {
                None if !roots.contains(&element.id) => {
                    return Err(IntegrityError::MissingFromRootOrder(element.id.clone()));
                }
                None => {}
                Some(parent_id) => {
                    let parent = self.elements.get(parent_id).ok_or_else(|| {
                        IntegrityError::MissingParent {
                            child: element.id.clone(),
                            parent: parent_id.clone(),
                        }
                    })?;
                    if !parent.children.contains(&element.id) {
                        return Err(IntegrityError::MissingFromParent {
                            parent: parent_id.clone(),
                            child: element.id.clone(),
                        });
                    }
                }
            }

            let mut seen = BTreeSet::new();
            for child_id in &element.children {
                if !seen.insert(child_id) {
                    return Err(IntegrityError::DuplicateEntry(child_id.clone()));
                }
                let child = self.elements.get(child_id).ok_or_else(|| {
                    IntegrityError::UnknownChild {
                        parent: element.id.clone(),
                        child: child_id.clone(),
                    }
                })?;
                if child.parent_id.as_ref() != Some(&element.id) {
                    return Err(IntegrityError::ParentMismatch {
                        parent: element.id.clone(),
                        child: child_id.clone(),
                        actual: child.parent_id.clone(),
                    });
                }
            }
        }

        // A chain longer than the table can only be a loop
        let limit = self.elements.len();
        for id in self.elements.ids() {
            let mut current = self.elements.get(id).and_then(|e| e.parent_id.as_ref());
            let mut steps = 0;
            while let Some(parent) = current {
                steps += 1;
                if steps > limit || parent == id {
                    return Err(IntegrityError::Cycle(id.clone()));
                }
                current = self.elements.get(parent).and_then(|e| e.parent_id.as_ref());
            }
        }

        if let Some(selected) = &self.selected_element_id {
            if !self.elements.contains(selected) {
                return Err(IntegrityError::DanglingSelection(selected.clone()));
            }
        }

        Ok(())
    }
}
