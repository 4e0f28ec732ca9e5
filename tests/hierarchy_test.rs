//! Tests for hierarchy loading, editing, and export

use snipsplicer::domain::{HierarchyError, HierarchyStore, NodeRecord};

/// Two roots: `root -> branch -> leaf` and a bare `aside`.
fn family_records() -> Vec<NodeRecord> {
    vec![
        NodeRecord::new("root")
            .with_label("Root")
            .with_children(["branch"]),
        NodeRecord::new("branch").with_children(["leaf"]),
        NodeRecord::new("leaf").with_label("Leaf"),
        NodeRecord::new("aside"),
    ]
}

#[test]
fn given_valid_records_when_loading_then_structure_and_order_are_kept() {
    // Arrange / Act
    let store = HierarchyStore::from_records(family_records()).unwrap();

    // Assert
    assert_eq!(store.len(), 4);
    assert_eq!(store.get("leaf").unwrap().parent(), Some(&"branch".to_string()));
    assert_eq!(store.get("root").unwrap().children, vec!["branch"]);
    let roots: Vec<_> = store.roots().map(|node| node.id.as_str()).collect();
    assert_eq!(roots, vec!["root", "aside"]);
}

#[test]
fn given_forward_child_reference_when_loading_then_it_resolves() {
    // Arrange - the child record appears before its parent
    let records = vec![
        NodeRecord::new("late"),
        NodeRecord::new("early").with_children(["late"]),
    ];

    // Act
    let store = HierarchyStore::from_records(records).unwrap();

    // Assert
    assert_eq!(store.get("late").unwrap().parent(), Some(&"early".to_string()));
}

#[test]
fn given_empty_record_list_when_loading_then_store_is_empty() {
    let store = HierarchyStore::from_records(Vec::new()).unwrap();

    assert!(store.is_empty());
    assert!(store.to_records().is_empty());
}

#[test]
fn given_duplicate_id_when_loading_then_load_is_rejected() {
    // Arrange
    let records = vec![NodeRecord::new("dup"), NodeRecord::new("dup")];

    // Act
    let err = HierarchyStore::from_records(records).unwrap_err();

    // Assert
    assert_eq!(err, HierarchyError::DuplicateId("dup".to_string()));
}

#[test]
fn given_child_reference_to_missing_node_when_loading_then_load_is_rejected() {
    // Arrange
    let records = vec![NodeRecord::new("a").with_children(["ghost"])];

    // Act
    let err = HierarchyStore::from_records(records).unwrap_err();

    // Assert
    assert_eq!(err, HierarchyError::UnknownNode("ghost".to_string()));
}

#[test]
fn given_child_claimed_twice_when_loading_then_load_is_rejected() {
    // Arrange
    let records = vec![
        NodeRecord::new("a").with_children(["shared"]),
        NodeRecord::new("b").with_children(["shared"]),
        NodeRecord::new("shared"),
    ];

    // Act
    let err = HierarchyStore::from_records(records).unwrap_err();

    // Assert
    assert_eq!(err, HierarchyError::MultipleParents("shared".to_string()));
}

#[test]
fn given_two_node_cycle_when_loading_then_load_is_rejected() {
    // Arrange - a and b parent each other, so neither is a root
    let records = vec![
        NodeRecord::new("a").with_children(["b"]),
        NodeRecord::new("b").with_children(["a"]),
    ];

    // Act
    let err = HierarchyStore::from_records(records).unwrap_err();

    // Assert - the first unreachable node in document order is reported
    assert_eq!(err, HierarchyError::CycleDetected("a".to_string()));
}

#[test]
fn given_self_parenting_node_when_loading_then_load_is_rejected() {
    // Arrange
    let records = vec![NodeRecord::new("loop").with_children(["loop"])];

    // Act
    let err = HierarchyStore::from_records(records).unwrap_err();

    // Assert
    assert_eq!(err, HierarchyError::CycleDetected("loop".to_string()));
}

#[test]
fn given_loaded_store_when_serializing_then_records_round_trip() {
    // Arrange
    let records = family_records();
    let store = HierarchyStore::from_records(records.clone()).unwrap();

    // Act / Assert - same records, same order, labels intact
    assert_eq!(store.to_records(), records);
}

#[test]
fn given_parent_id_when_inserting_then_node_lands_at_the_end_of_its_children() {
    // Arrange
    let mut store = HierarchyStore::from_records(family_records()).unwrap();

    // Act
    let id = store
        .insert(Some("extra".to_string()), None, Some("root"))
        .unwrap();

    // Assert
    assert_eq!(id, "extra");
    assert_eq!(store.get("root").unwrap().children, vec!["branch", "extra"]);
    assert_eq!(store.get("extra").unwrap().parent(), Some(&"root".to_string()));
    let last = store.to_records().last().cloned().unwrap();
    assert_eq!(last.id, "extra");
}

#[test]
fn given_no_id_when_inserting_then_a_uuid_is_assigned() {
    // Arrange
    let mut store = HierarchyStore::new();

    // Act
    let id = store.insert(None, Some("untitled".to_string()), None).unwrap();

    // Assert - hyphenated UUID shape
    assert_eq!(id.len(), 36);
    assert_eq!(id.matches('-').count(), 4);
    assert!(store.get(&id).is_some());
}

#[test]
fn given_taken_id_when_inserting_then_insert_is_rejected() {
    // Arrange
    let mut store = HierarchyStore::from_records(family_records()).unwrap();

    // Act
    let err = store.insert(Some("root".to_string()), None, None).unwrap_err();

    // Assert
    assert_eq!(err, HierarchyError::DuplicateId("root".to_string()));
    assert_eq!(store.len(), 4);
}

#[test]
fn given_unknown_parent_when_inserting_then_nothing_is_added() {
    // Arrange
    let mut store = HierarchyStore::from_records(family_records()).unwrap();

    // Act
    let err = store
        .insert(Some("extra".to_string()), None, Some("ghost"))
        .unwrap_err();

    // Assert
    assert_eq!(err, HierarchyError::UnknownNode("ghost".to_string()));
    assert!(store.get("extra").is_none());
    assert_eq!(store.len(), 4);
}

#[test]
fn given_inner_node_when_removing_then_its_children_become_roots() {
    // Arrange
    let mut store = HierarchyStore::from_records(family_records()).unwrap();

    // Act
    let removed = store.remove("branch").unwrap();

    // Assert - leaf is orphaned to a root, not deleted with its parent
    assert_eq!(removed.children, vec!["leaf"]);
    assert_eq!(store.len(), 3);
    assert!(store.get("root").unwrap().children.is_empty());
    assert_eq!(store.get("leaf").unwrap().parent(), None);
    let ids: Vec<_> = store.to_records().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["root", "leaf", "aside"]);
}

#[test]
fn given_unknown_id_when_removing_then_remove_is_rejected() {
    let mut store = HierarchyStore::from_records(family_records()).unwrap();

    let err = store.remove("ghost").unwrap_err();

    assert_eq!(err, HierarchyError::UnknownNode("ghost".to_string()));
    assert_eq!(store.len(), 4);
}

#[test]
fn given_labeled_and_bare_nodes_when_exporting_markdown_then_labels_fall_back_to_ids() {
    // Arrange
    let store = HierarchyStore::from_records(family_records()).unwrap();

    // Act
    let outline = store.to_markdown();

    // Assert
    assert_eq!(
        outline,
        "- **Root**\n  - **branch**\n    - **Leaf**\n- **aside**\n"
    );
}

#[test]
fn given_two_roots_when_rendering_trees_then_each_root_gets_its_own_tree() {
    // Arrange
    let store = HierarchyStore::from_records(family_records()).unwrap();

    // Act
    let trees = store.to_tree_strings();

    // Assert
    assert_eq!(trees.len(), 2);
    let rendered = trees[0].to_string();
    assert!(rendered.starts_with("Root"));
    assert!(rendered.contains("└── branch"));
    assert!(rendered.contains("└── Leaf"));
    assert_eq!(trees[1].to_string().trim_end(), "aside");
}
