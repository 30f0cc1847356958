//! Loading serialized documents and querying their trees

use designer_document::{DocumentState, ElementId, IntegrityError, StyleValue};
use serde_json::json;

fn id(s: &str) -> ElementId {
    ElementId::from(s)
}

fn load(value: serde_json::Value) -> DocumentState {
    serde_json::from_value(value).unwrap()
}

/// page -> [header -> [logo], body], overlay
fn page() -> serde_json::Value {
    json!({
        "elements": {
            "page": { "id": "page", "name": "Page", "children": ["header", "body"] },
            "header": {
                "id": "header", "name": "Header", "parentId": "page",
                "children": ["logo"], "style": { "height": "64px" }
            },
            "logo": { "id": "logo", "name": "Logo", "parentId": "header", "style": { "opacity": 0.8 } },
            "body": { "id": "body", "name": "Body", "parentId": "page" },
            "overlay": { "id": "overlay", "name": "Overlay" }
        },
        "rootElementOrder": ["page", "overlay"],
        "selectedElementId": "logo"
    })
}

#[test]
fn test_load_and_query_document() {
    let doc = load(page());
    assert_eq!(doc.validate(), Ok(()));

    assert_eq!(doc.elements.len(), 5);
    assert_eq!(
        doc.get_all_descendant_ids(&id("page")),
        vec![id("header"), id("logo"), id("body")]
    );
    assert_eq!(doc.depth(&id("logo")), 2);
    assert!(doc.is_descendant_of(&id("logo"), &id("page")));
    assert!(!doc.is_descendant_of(&id("overlay"), &id("page")));
    assert!(doc.would_create_cycle(&id("page"), &id("logo")));
    assert!(!doc.would_create_cycle(&id("logo"), &id("overlay")));

    let logo = doc.get(&id("logo")).unwrap();
    assert_eq!(logo.style_value("opacity"), Some(&StyleValue::Number(0.8)));
    assert_eq!(doc.index_in_container(&id("body")), Some(1));
    assert_eq!(doc.index_in_container(&id("overlay")), Some(1));
}

#[test]
fn test_serialized_shape_round_trips() {
    let doc = load(page());
    let value = serde_json::to_value(&doc).unwrap();

    assert_eq!(value["rootElementOrder"], json!(["page", "overlay"]));
    assert_eq!(value["elements"]["logo"]["parentId"], "header");
    assert_eq!(load(value), doc);
}

#[test]
fn test_validate_reports_broken_links() {
    let mut value = page();
    value["elements"]["body"]["parentId"] = json!("header");
    assert_eq!(
        load(value).validate(),
        Err(IntegrityError::MissingFromParent { parent: id("header"), child: id("body") })
    );

    let mut value = page();
    value["rootElementOrder"] = json!(["page"]);
    assert_eq!(
        load(value).validate(),
        Err(IntegrityError::MissingFromRootOrder(id("overlay")))
    );

    let mut value = page();
    value["elements"]["header"]["children"] = json!(["logo", "ghost"]);
    assert_eq!(
        load(value).validate(),
        Err(IntegrityError::UnknownChild { parent: id("header"), child: id("ghost") })
    );

    let mut value = page();
    value["selectedElementId"] = json!("ghost");
    assert_eq!(
        load(value).validate(),
        Err(IntegrityError::DanglingSelection(id("ghost")))
    );
}

#[test]
fn test_validate_reports_cycles() {
    let doc = load(json!({
        "elements": {
            "a": { "id": "a", "name": "A", "parentId": "b", "children": ["b"] },
            "b": { "id": "b", "name": "B", "parentId": "a", "children": ["a"] }
        },
        "rootElementOrder": []
    }));

    assert!(matches!(doc.validate(), Err(IntegrityError::Cycle(_))));
    // Walks stay bounded on corrupt input
    assert!(doc.ancestors(&id("a")).count() <= 2);
    assert_eq!(doc.get_all_descendant_ids(&id("a")), vec![id("b")]);
}

#[test]
fn test_prune_selection_after_external_removal() {
    let mut doc = load(page());
    doc.elements.remove(&id("logo"));
    doc.get_mut(&id("header")).unwrap().children.clear();

    assert!(doc.prune_selection());
    assert_eq!(doc.selected_element_id, None);
    assert_eq!(doc.validate(), Ok(()));
}
