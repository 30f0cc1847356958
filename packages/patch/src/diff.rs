//! # Structural Diff
//!
//! Computes the forward patch that turns `before` into `after` together with
//! its exact inverse.
//!
//! - Objects are compared key by key; added keys become `Set`, dropped keys
//!   become `Remove`.
//! - Arrays trim their common prefix and suffix. A changed middle of equal
//!   length made of containers is diffed slot by slot; anything else becomes
//!   one `Splice`.
//! - Scalars (and type changes) become a `Set` of the new value.
//!
//! Every forward op touches a distinct location, so the inverse is the list
//! of per-op inverses in reverse order.

use crate::{Path, Patch, PatchOp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A forward patch paired with the patch that undoes it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Changeset {
    pub forward: Patch,
    pub inverse: Patch,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Swap directions
    pub fn inverted(self) -> Self {
        Self {
            forward: self.inverse,
            inverse: self.forward,
        }
    }
}

/// Diff two values
pub fn diff(before: &Value, after: &Value) -> Changeset {
    let mut forward = Vec::new();
    let mut inverse = Vec::new();

    diff_at(&Path::root(), before, after, &mut forward, &mut inverse);
    inverse.reverse();

    tracing::trace!(ops = forward.len(), "computed structural diff");

    Changeset {
        forward: Patch::from(forward),
        inverse: Patch::from(inverse),
    }
}

fn diff_at(
    path: &Path,
    before: &Value,
    after: &Value,
    forward: &mut Vec<PatchOp>,
    inverse: &mut Vec<PatchOp>,
) {
    if before == after {
        return;
    }

    match (before, after) {
        (Value::Object(old), Value::Object(new)) => {
            for (key, old_value) in old {
                let child = path.join(key.as_str());
                match new.get(key) {
                    Some(new_value) => diff_at(&child, old_value, new_value, forward, inverse),
                    None => {
                        forward.push(PatchOp::Remove { path: child.clone() });
                        inverse.push(PatchOp::Set {
                            path: child,
                            value: old_value.clone(),
                        });
                    }
                }
            }

            for (key, new_value) in new {
                if !old.contains_key(key) {
                    let child = path.join(key.as_str());
                    forward.push(PatchOp::Set {
                        path: child.clone(),
                        value: new_value.clone(),
                    });
                    inverse.push(PatchOp::Remove { path: child });
                }
            }
        }

        (Value::Array(old), Value::Array(new)) => diff_array(path, old, new, forward, inverse),

        _ => {
            forward.push(PatchOp::Set {
                path: path.clone(),
                value: after.clone(),
            });
            inverse.push(PatchOp::Set {
                path: path.clone(),
                value: before.clone(),
            });
        }
    }
}

fn diff_array(
    path: &Path,
    old: &[Value],
    new: &[Value],
    forward: &mut Vec<PatchOp>,
    inverse: &mut Vec<PatchOp>,
) {
    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_middle = &old[prefix..old.len() - suffix];
    let new_middle = &new[prefix..new.len() - suffix];

    let in_place = old_middle.len() == new_middle.len()
        && old_middle
            .iter()
            .zip(new_middle)
            .all(|(a, b)| same_container_kind(a, b));

    if in_place {
        for (offset, (a, b)) in old_middle.iter().zip(new_middle).enumerate() {
            diff_at(&path.join(prefix + offset), a, b, forward, inverse);
        }
        return;
    }

    forward.push(PatchOp::Splice {
        path: path.clone(),
        index: prefix,
        remove: old_middle.len(),
        insert: new_middle.to_vec(),
    });
    inverse.push(PatchOp::Splice {
        path: path.clone(),
        index: prefix,
        remove: new_middle.len(),
        insert: old_middle.to_vec(),
    });
}

fn same_container_kind(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Object(_), Value::Object(_)) | (Value::Array(_), Value::Array(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn round_trip(before: Value, after: Value) -> Changeset {
        let changes = diff(&before, &after);
        assert_eq!(changes.forward.apply_to(&before).unwrap(), after);
        assert_eq!(changes.inverse.apply_to(&after).unwrap(), before);
        changes
    }

    #[test]
    fn test_equal_values_produce_empty_changeset() {
        let value = json!({ "a": [1, 2, { "b": null }] });
        assert!(diff(&value, &value).is_empty());
    }

    #[test]
    fn test_object_key_changes() {
        let changes = round_trip(
            json!({ "keep": 1, "change": "x", "drop": true }),
            json!({ "keep": 1, "change": "y", "add": [1] }),
        );
        assert_eq!(changes.forward.len(), 3);
    }

    #[test]
    fn test_reorder_is_single_splice() {
        let changes = round_trip(json!(["a", "b", "c", "d"]), json!(["a", "c", "b", "d"]));
        assert_eq!(
            changes.forward.ops(),
            &[PatchOp::Splice {
                path: Path::root(),
                index: 1,
                remove: 2,
                insert: vec![json!("c"), json!("b")],
            }]
        );
    }

    #[test]
    fn test_append_and_truncate() {
        round_trip(json!({ "list": [] }), json!({ "list": ["a", "b"] }));
        round_trip(json!({ "list": ["a", "b", "c"] }), json!({ "list": ["a"] }));
        round_trip(json!(["x", "x"]), json!(["x", "x", "x"]));
    }

    #[test]
    fn test_arrays_of_objects_diff_in_place() {
        let changes = round_trip(
            json!([{ "name": "a", "n": 1 }, { "name": "b" }]),
            json!([{ "name": "a", "n": 2 }, { "name": "b" }]),
        );
        assert_eq!(changes.forward.ops()[0].path().to_string(), "/0/n");
    }

    #[test]
    fn test_type_change_sets_whole_value() {
        round_trip(json!({ "a": { "b": 1 } }), json!({ "a": "flat" }));
        round_trip(json!(null), json!({ "a": 1 }));
    }

    #[test]
    fn test_nested_document_shape() {
        round_trip(
            json!({
                "elements": {
                    "a": { "id": "a", "children": ["b"], "parentId": null, "style": {} },
                    "b": { "id": "b", "children": [], "parentId": "a", "style": { "left": "0px" } }
                },
                "rootElementOrder": ["a"],
                "selectedElementId": "b"
            }),
            json!({
                "elements": {
                    "a": { "id": "a", "children": [], "parentId": null, "style": {} },
                    "b": { "id": "b", "children": [], "parentId": null, "style": { "left": "5px" } },
                    "c": { "id": "c", "children": [], "parentId": null, "style": {} }
                },
                "rootElementOrder": ["b", "a", "c"],
                "selectedElementId": null
            }),
        );
    }

    #[test]
    fn test_inverted_swaps_directions() {
        let before = json!({ "a": 1 });
        let after = json!({ "a": 2 });
        let changes = diff(&before, &after).inverted();
        assert_eq!(changes.forward.apply_to(&after).unwrap(), before);
    }
}
