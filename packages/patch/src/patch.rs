//! # Patch Operations
//!
//! A closed set of primitive structural edits:
//!
//! - **Set**: write a value at a path (insert a key, replace an array slot,
//!   or replace the whole value for the root path)
//! - **Remove**: delete an object key or array slot
//! - **Splice**: remove `remove` items at `index` of an array, then insert
//!   `insert` there
//!
//! Application is strict. Every intermediate segment must exist, keys
//! removed must be present, indices must be in range. A patch that does not
//! fit the value it is applied to fails instead of guessing.

use crate::{Path, PathSegment, PatchError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PatchOp {
    Set {
        path: Path,
        value: Value,
    },

    Remove {
        path: Path,
    },

    Splice {
        path: Path,
        index: usize,
        remove: usize,
        insert: Vec<Value>,
    },
}

impl PatchOp {
    pub fn path(&self) -> &Path {
        match self {
            PatchOp::Set { path, .. } | PatchOp::Remove { path } | PatchOp::Splice { path, .. } => {
                path
            }
        }
    }

    /// Apply this single operation in place
    pub fn apply(&self, target: &mut Value) -> Result<(), PatchError> {
        match self {
            PatchOp::Set { path, value } => {
                let Some((parent, last)) = path.split_last() else {
                    *target = value.clone();
                    return Ok(());
                };

                match (resolve_mut(target, parent, path)?, last) {
                    (Value::Object(map), PathSegment::Key(key)) => {
                        map.insert(key.clone(), value.clone());
                    }
                    (Value::Array(items), PathSegment::Index(index)) => {
                        let len = items.len();
                        let slot = items.get_mut(*index).ok_or_else(|| PatchError::OutOfBounds {
                            path: path.clone(),
                            index: *index,
                            len,
                        })?;
                        *slot = value.clone();
                    }
                    _ => return Err(PatchError::NotAContainer(path.clone())),
                }
                Ok(())
            }

            PatchOp::Remove { path } => {
                let (parent, last) = path.split_last().ok_or(PatchError::RemoveRoot)?;

                match (resolve_mut(target, parent, path)?, last) {
                    (Value::Object(map), PathSegment::Key(key)) => {
                        map.remove(key)
                            .ok_or_else(|| PatchError::MissingPath(path.clone()))?;
                    }
                    (Value::Array(items), PathSegment::Index(index)) => {
                        if *index >= items.len() {
                            return Err(PatchError::OutOfBounds {
                                path: path.clone(),
                                index: *index,
                                len: items.len(),
                            });
                        }
                        items.remove(*index);
                    }
                    _ => return Err(PatchError::NotAContainer(path.clone())),
                }
                Ok(())
            }

            PatchOp::Splice { path, index, remove, insert } => {
                let items = resolve_mut(target, path.segments(), path)?
                    .as_array_mut()
                    .ok_or_else(|| PatchError::NotAnArray(path.clone()))?;

                let len = items.len();
                let end = index
                    .checked_add(*remove)
                    .filter(|end| *index <= len && *end <= len)
                    .ok_or_else(|| PatchError::OutOfBounds {
                        path: path.clone(),
                        index: *index,
                        len,
                    })?;

                items.splice(*index..end, insert.iter().cloned());
                Ok(())
            }
        }
    }
}

/// Walk `segments` from the root of `current`
fn resolve_mut<'a>(
    mut current: &'a mut Value,
    segments: &[PathSegment],
    full: &Path,
) -> Result<&'a mut Value, PatchError> {
    for segment in segments {
        current = match (current, segment) {
            (Value::Object(map), PathSegment::Key(key)) => map
                .get_mut(key)
                .ok_or_else(|| PatchError::MissingPath(full.clone()))?,
            (Value::Array(items), PathSegment::Index(index)) => items
                .get_mut(*index)
                .ok_or_else(|| PatchError::MissingPath(full.clone()))?,
            _ => return Err(PatchError::NotAContainer(full.clone())),
        };
    }
    Ok(current)
}

/// Ordered list of operations, applied first to last
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch {
    ops: Vec<PatchOp>,
}

impl Patch {
    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply in place
    ///
    /// Stops at the first failing operation, so `target` may be left
    /// partially patched. Use [`Patch::apply_to`] for all-or-nothing.
    pub fn apply(&self, target: &mut Value) -> Result<(), PatchError> {
        for op in &self.ops {
            op.apply(target)?;
        }
        Ok(())
    }

    /// Apply to a copy of `source`, leaving `source` untouched
    pub fn apply_to(&self, source: &Value) -> Result<Value, PatchError> {
        let mut patched = source.clone();
        self.apply(&mut patched)?;
        Ok(patched)
    }
}

impl From<Vec<PatchOp>> for Patch {
    fn from(ops: Vec<PatchOp>) -> Self {
        Self { ops }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(segments: &[&str]) -> Path {
        segments.iter().copied().collect()
    }

    #[test]
    fn test_set_inserts_and_replaces() {
        let mut value = json!({ "style": { "left": "0px" } });

        PatchOp::Set { path: path(&["style", "left"]), value: json!("10px") }
            .apply(&mut value)
            .unwrap();
        PatchOp::Set { path: path(&["style", "top"]), value: json!(4) }
            .apply(&mut value)
            .unwrap();

        assert_eq!(value, json!({ "style": { "left": "10px", "top": 4 } }));
    }

    #[test]
    fn test_set_requires_existing_parent() {
        let mut value = json!({});
        let err = PatchOp::Set { path: path(&["missing", "key"]), value: json!(1) }
            .apply(&mut value)
            .unwrap_err();
        assert_eq!(err, PatchError::MissingPath(path(&["missing", "key"])));
    }

    #[test]
    fn test_set_root_replaces_everything() {
        let mut value = json!({ "a": 1 });
        PatchOp::Set { path: Path::root(), value: json!([1, 2]) }
            .apply(&mut value)
            .unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn test_remove_missing_key_fails() {
        let mut value = json!({ "a": 1 });
        assert!(PatchOp::Remove { path: path(&["b"]) }.apply(&mut value).is_err());
        assert_eq!(
            PatchOp::Remove { path: Path::root() }.apply(&mut value),
            Err(PatchError::RemoveRoot)
        );
        PatchOp::Remove { path: path(&["a"]) }.apply(&mut value).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_splice() {
        let mut value = json!({ "order": ["a", "b", "c"] });
        PatchOp::Splice {
            path: path(&["order"]),
            index: 1,
            remove: 1,
            insert: vec![json!("x"), json!("y")],
        }
        .apply(&mut value)
        .unwrap();
        assert_eq!(value, json!({ "order": ["a", "x", "y", "c"] }));
    }

    #[test]
    fn test_splice_out_of_bounds() {
        let mut value = json!(["a"]);
        let err = PatchOp::Splice { path: Path::root(), index: 1, remove: 1, insert: vec![] }
            .apply(&mut value)
            .unwrap_err();
        assert!(matches!(err, PatchError::OutOfBounds { index: 1, len: 1, .. }));

        let err = PatchOp::Splice { path: Path::root(), index: 0, remove: usize::MAX, insert: vec![] }
            .apply(&mut value)
            .unwrap_err();
        assert!(matches!(err, PatchError::OutOfBounds { .. }));
    }

    #[test]
    fn test_splice_on_object_fails() {
        let mut value = json!({ "order": {} });
        let err = PatchOp::Splice { path: path(&["order"]), index: 0, remove: 0, insert: vec![] }
            .apply(&mut value)
            .unwrap_err();
        assert_eq!(err, PatchError::NotAnArray(path(&["order"])));
    }

    #[test]
    fn test_apply_to_leaves_source_untouched_on_failure() {
        let source = json!({ "a": 1 });
        let patch = Patch::from(vec![
            PatchOp::Set { path: path(&["a"]), value: json!(2) },
            PatchOp::Remove { path: path(&["nope"]) },
        ]);

        assert!(patch.apply_to(&source).is_err());
        assert_eq!(source, json!({ "a": 1 }));
    }

    #[test]
    fn test_patch_serialization() {
        let patch = Patch::from(vec![PatchOp::Remove { path: Path::root().join("a").join(0usize) }]);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, json!([{ "op": "remove", "path": ["a", 0] }]));

        let back: Patch = serde_json::from_value(json).unwrap();
        assert_eq!(back, patch);
    }
}
