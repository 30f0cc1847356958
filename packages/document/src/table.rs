//! # Element Table
//!
//! Flat arena of element records keyed by id. Parent and child links are
//! stored as ids on the records themselves; the table is the only owner.

use crate::{Element, ElementId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementTable {
    rows: BTreeMap<ElementId, Element>,
}

impl ElementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.rows.get(id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.rows.get_mut(id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.rows.contains_key(id)
    }

    /// Insert a record, returning the one it replaced (if any)
    pub fn insert(&mut self, element: Element) -> Option<Element> {
        self.rows.insert(element.id.clone(), element)
    }

    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        self.rows.remove(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ElementId> {
        self.rows.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ElementId, &Element)> {
        self.rows.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &Element> {
        self.rows.values()
    }
}

impl FromIterator<Element> for ElementTable {
    fn from_iter<T: IntoIterator<Item = Element>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut table = ElementTable::new();
        assert!(table.is_empty());

        table.insert(Element::new("a", "Frame"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&"a".into()).map(|e| e.name.as_str()), Some("Frame"));

        let removed = table.remove(&"a".into());
        assert!(removed.is_some());
        assert!(!table.contains(&"a".into()));
    }

    #[test]
    fn test_serializes_as_id_keyed_map() {
        let table: ElementTable = [Element::new("b", "B"), Element::new("a", "A")]
            .into_iter()
            .collect();

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["a"]["name"], "A");
        assert_eq!(json["b"]["name"], "B");
    }
}
