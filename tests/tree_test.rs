//! Tests for the tree engine: building, filtering, collapsing and tri-state
//! selection.

mod common;

use std::borrow::Cow;

use rstest::rstest;

use common::named;
use vartree::domain::{
    build_tree, checked_variable_ids, filter_tree, find_node, leaf_count, toggle_node_collapsed,
    update_node_checked, DomainError, Forest, NodeKind, TreeBuilder, VariableRecord,
};

fn color_vars() -> Vec<VariableRecord> {
    vec![
        named("v1", "color/bg/default"),
        named("v2", "color/bg/hover"),
        named("v3", "color/fg"),
    ]
}

fn color_tree() -> Forest {
    build_tree(&color_vars())
}

// ============================================================
// build_tree() tests
// ============================================================

#[test]
fn given_slash_names_when_building_then_shared_prefixes_become_groups() {
    // Arrange
    let vars = color_vars();

    // Act
    let forest = build_tree(&vars);

    // Assert
    assert_eq!(forest.len(), 1);
    let color = &forest[0];
    assert_eq!(color.id, "color");
    assert_eq!(color.kind, NodeKind::Group);
    assert_eq!(color.level, 0);
    assert_eq!(color.children.len(), 2);

    let bg = &color.children[0];
    assert_eq!(bg.id, "color/bg");
    assert_eq!(bg.name, "bg");
    assert_eq!(bg.level, 1);
    let names: Vec<&str> = bg.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["default", "hover"]);

    let hover = &bg.children[1];
    assert_eq!(hover.id, "color/bg/hover");
    assert_eq!(hover.kind, NodeKind::Variable);
    assert_eq!(hover.level, 2);
    assert_eq!(hover.variable_id.as_deref(), Some("v2"));

    let fg = &color.children[1];
    assert_eq!(fg.kind, NodeKind::Variable);
    assert_eq!(fg.variable_id.as_deref(), Some("v3"));
}

#[test]
fn given_fresh_tree_when_building_then_nodes_expanded_and_unchecked() {
    let forest = color_tree();

    let bg = find_node(&forest, "color/bg").unwrap();
    assert!(!bg.collapsed);
    assert!(!bg.checked);
    assert!(!bg.indeterminate);
}

#[rstest]
#[case::flat(&["a", "b", "c"])]
#[case::nested(&["a/b/c", "a/b/d", "a/e", "f"])]
#[case::deep(&["x/y/z/w/v", "x/y/z/w/u", "x/q"])]
fn given_distinct_valid_names_when_building_then_one_leaf_per_variable(#[case] names: &[&str]) {
    // Arrange
    let vars: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, n)| named(&format!("v{}", i), n))
        .collect();

    // Act
    let forest = build_tree(&vars);

    // Assert
    assert_eq!(leaf_count(&forest), vars.len());
    for v in &vars {
        let leaf = find_node(&forest, &v.name).expect("leaf exists at its full path");
        assert_eq!(leaf.variable_id.as_deref(), Some(v.id.as_str()));
    }
}

#[test]
fn given_same_input_when_building_twice_then_identical_and_in_first_seen_order() {
    let vars = vec![
        named("v1", "z/one"),
        named("v2", "a/two"),
        named("v3", "z/three"),
    ];

    let first = build_tree(&vars);
    let second = build_tree(&vars);

    assert_eq!(first, second);
    let roots: Vec<&str> = first.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(roots, vec!["z", "a"]);
    let z_children: Vec<&str> = first[0].children.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(z_children, vec!["one", "three"]);
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
#[case::leading_separator("/a")]
#[case::trailing_separator("a/")]
#[case::double_separator("a//b")]
#[case::whitespace_segment("a/ /b")]
fn given_degenerate_name_when_building_then_skipped_with_invalid_name(#[case] name: &str) {
    // Arrange
    let vars = vec![named("good", "ok/fine"), named("bad", name)];

    // Act
    let built = TreeBuilder::default().build(&vars);

    // Assert
    assert_eq!(leaf_count(&built.forest), 1);
    assert_eq!(built.skipped.len(), 1);
    assert!(matches!(built.skipped[0], DomainError::InvalidName { .. }));
    assert_eq!(built.skipped[0].variable_id(), "bad");
}

#[test]
fn given_duplicate_names_when_building_then_first_wins() {
    // Arrange
    let vars = vec![named("first", "a/b"), named("second", "a/b")];

    // Act
    let built = TreeBuilder::default().build(&vars);

    // Assert
    let leaf = find_node(&built.forest, "a/b").unwrap();
    assert_eq!(leaf.variable_id.as_deref(), Some("first"));
    assert_eq!(
        built.skipped,
        vec![DomainError::DuplicatePath {
            variable_id: "second".to_string(),
            path: "a/b".to_string(),
        }]
    );
}

#[rstest]
#[case::leaf_then_group(&["a", "a/b"])]
#[case::group_then_leaf(&["a/b", "a"])]
fn given_leaf_and_group_on_same_path_when_building_then_later_one_conflicts(
    #[case] names: &[&str],
) {
    // Arrange
    let vars = vec![named("first", names[0]), named("second", names[1])];

    // Act
    let built = TreeBuilder::default().build(&vars);

    // Assert
    assert_eq!(leaf_count(&built.forest), 1);
    assert_eq!(built.skipped.len(), 1);
    assert!(matches!(
        &built.skipped[0],
        DomainError::PathConflict { variable_id, .. } if variable_id == "second"
    ));
}

#[test]
fn given_conflicting_variable_when_building_then_no_orphan_groups_left() {
    // "a" is a leaf, so "a/b/c" must not create "a/b"
    let vars = vec![named("first", "a"), named("second", "a/b/c")];

    let built = TreeBuilder::default().build(&vars);

    assert!(find_node(&built.forest, "a/b").is_none());
    assert!(built.forest[0].children.is_empty());
}

#[test]
fn given_custom_separator_when_building_then_splits_on_it() {
    let vars = vec![named("v1", "color.bg.default"), named("v2", "color/fg")];

    let built = TreeBuilder::new(".").build(&vars);

    assert!(find_node(&built.forest, "color.bg").is_some());
    // no "." in the name, so it stays one segment
    let leaf = find_node(&built.forest, "color/fg").unwrap();
    assert_eq!(leaf.level, 0);
}

// ============================================================
// filter_tree() tests
// ============================================================

#[rstest]
#[case::empty("")]
#[case::whitespace("  \t")]
fn given_blank_query_when_filtering_then_input_borrowed(#[case] query: &str) {
    let forest = color_tree();

    let filtered = filter_tree(&forest, query);

    assert!(matches!(filtered, Cow::Borrowed(_)));
    assert_eq!(filtered.as_ref(), forest.as_slice());
}

#[test]
fn given_query_when_filtering_then_case_insensitive_and_keeps_ancestors() {
    // Arrange
    let forest = color_tree();

    // Act
    let filtered = filter_tree(&forest, "HOVER");

    // Assert
    assert_eq!(leaf_count(&filtered), 1);
    let bg = find_node(&filtered, "color/bg").unwrap();
    assert_eq!(bg.children.len(), 1);
    assert_eq!(bg.children[0].id, "color/bg/hover");
    assert!(find_node(&filtered, "color/fg").is_none());
}

#[test]
fn given_query_when_filtering_twice_then_idempotent() {
    let forest = color_tree();

    let once = filter_tree(&forest, "bg").into_owned();
    let twice = filter_tree(&once, "bg").into_owned();

    assert_eq!(once, twice);
}

#[test]
fn given_collapsed_group_when_filtering_then_surviving_groups_expanded() {
    let forest = toggle_node_collapsed(&color_tree(), "color");

    let filtered = filter_tree(&forest, "fg");

    assert!(!filtered[0].collapsed);
    assert!(find_node(&forest, "color").unwrap().collapsed, "input untouched");
}

#[test]
fn given_no_match_when_filtering_then_empty_forest() {
    let base = color_tree();

    let filtered = filter_tree(&base, "spacing");

    assert!(filtered.is_empty());
}

// ============================================================
// toggle_node_collapsed() tests
// ============================================================

#[test]
fn given_group_when_toggling_twice_then_original_tree() {
    let forest = color_tree();

    let once = toggle_node_collapsed(&forest, "color/bg");
    let twice = toggle_node_collapsed(&once, "color/bg");

    assert!(find_node(&once, "color/bg").unwrap().collapsed);
    assert_eq!(twice, forest);
}

#[test]
fn given_unknown_id_when_toggling_then_unchanged() {
    let forest = color_tree();

    let toggled = toggle_node_collapsed(&forest, "nope/nothing");

    assert_eq!(toggled, forest);
}

// ============================================================
// update_node_checked() tests
// ============================================================

#[test]
fn given_root_checked_when_updating_then_whole_subtree_checked() {
    let forest = update_node_checked(&color_tree(), "color", true);

    for id in ["color", "color/bg", "color/bg/default", "color/bg/hover", "color/fg"] {
        let node = find_node(&forest, id).unwrap();
        assert!(node.checked, "{} checked", id);
        assert!(!node.indeterminate, "{} determinate", id);
    }
}

#[rstest]
#[case::one_of_two_leaves("color/bg/hover", false, true)]
#[case::whole_group("color/bg", true, false)]
fn given_partial_selection_when_updating_then_tri_state_on_ancestors(
    #[case] node_id: &str,
    #[case] bg_checked: bool,
    #[case] bg_indeterminate: bool,
) {
    // Act
    let forest = update_node_checked(&color_tree(), node_id, true);

    // Assert
    let bg = find_node(&forest, "color/bg").unwrap();
    assert_eq!(bg.checked, bg_checked);
    assert_eq!(bg.indeterminate, bg_indeterminate);
    let color = find_node(&forest, "color").unwrap();
    assert!(!color.checked);
    assert!(color.indeterminate);
}

#[test]
fn given_checked_root_when_unchecking_leaf_then_ancestors_indeterminate() {
    let forest = update_node_checked(&color_tree(), "color", true);

    let forest = update_node_checked(&forest, "color/fg", false);

    let color = find_node(&forest, "color").unwrap();
    assert!(!color.checked);
    assert!(color.indeterminate);
    assert!(find_node(&forest, "color/bg").unwrap().checked);
}

#[test]
fn given_leaf_checked_then_unchecked_when_updating_then_original_tree() {
    let forest = color_tree();

    let checked = update_node_checked(&forest, "color/bg/default", true);
    let unchecked = update_node_checked(&checked, "color/bg/default", false);

    assert_eq!(unchecked, forest);
}

#[test]
fn given_checked_group_when_collecting_then_variable_ids_in_tree_order() {
    let forest = update_node_checked(&color_tree(), "color/bg", true);

    assert_eq!(checked_variable_ids(&forest), vec!["v1", "v2"]);
}

#[test]
fn given_tree_when_serializing_then_wire_shape() {
    let json = serde_json::to_value(&color_tree()).unwrap();

    let root = &json[0];
    assert_eq!(root["type"], "group");
    assert!(root.get("variableId").is_none());
    assert_eq!(root["children"][1]["type"], "variable");
    assert_eq!(root["children"][1]["variableId"], "v3");
}
