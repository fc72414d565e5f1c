//! Tests for TreeBuilder

use std::sync::Arc;
use std::thread;

use rstest::rstest;

use navtree::application::services::TreeBuilder;
use navtree::application::ApplicationError;
use navtree::domain::{Attributes, DomainError, NodeKind};
use navtree::infrastructure::traits::{ConfiguredPrivileges, ConfiguredTables};
use navtree::util::testing::{self, guards_for_request};

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn labelled(label: &str) -> Attributes {
    attrs(&[("label", label)])
}

fn builder(request_dir: &str) -> TreeBuilder {
    testing::init_test_setup();
    TreeBuilder::new(guards_for_request(request_dir))
}

fn is_invalid_level<T: std::fmt::Debug>(result: &Result<T, ApplicationError>) -> bool {
    matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InvalidLevel { .. }))
    )
}

// ============================================================
// Parent resolution
// ============================================================

#[rstest]
#[case(&[1, 2, 3, 2, 1])]
#[case(&[1, 1, 2, 2, 3, 3, 1])]
#[case(&[1, 2, 3, 3, 2, 3, 1, 2])]
#[case(&[2, 2, 3, 2])]
fn given_valid_levels_when_building_then_parents_precede_children(#[case] levels: &[usize]) {
    // Arrange
    let mut builder = builder("");

    // Act
    for (n, level) in levels.iter().enumerate() {
        builder.add_node(*level, labelled(&n.to_string())).unwrap();
    }
    let tree = builder.finish();

    // Assert
    assert_eq!(tree.len(), levels.len());
    for (idx, node) in tree.nodes().iter().enumerate() {
        if let Some(parent) = node.parent {
            assert!(parent < idx, "parent {} of node {} must come earlier", parent, idx);
            assert_eq!(tree.get(parent).unwrap().level + 1, node.level);
            assert_eq!(tree.get(parent).unwrap().kind, NodeKind::Branch);
        }
    }
}

#[test]
fn given_sibling_when_adding_then_shares_parent() {
    let mut builder = builder("");
    builder.add_node(1, labelled("shop")).unwrap();
    builder.add_node(2, labelled("cat")).unwrap();
    builder.add_node(2, labelled("deals")).unwrap();

    let tree = builder.finish();
    assert_eq!(tree.get(1).unwrap().parent, Some(0));
    assert_eq!(tree.get(2).unwrap().parent, Some(0));
    assert_eq!(tree.get(2).unwrap().kind, NodeKind::Leaf);
}

#[test]
fn given_ascent_when_adding_then_parent_found_by_backward_scan() {
    // shop
    // ├── cat
    // │   └── books
    // └── orders
    let mut builder = builder("");
    builder.add_node(1, labelled("home")).unwrap();
    builder.add_node(1, labelled("shop")).unwrap();
    builder.add_node(2, labelled("cat")).unwrap();
    builder.add_node(3, labelled("books")).unwrap();
    builder.add_node(2, labelled("orders")).unwrap();
    builder.add_node(1, labelled("about")).unwrap();

    let tree = builder.finish();
    assert_eq!(tree.get(4).unwrap().parent, Some(1));
    assert_eq!(tree.get(5).unwrap().parent, None);
    assert_eq!(tree.children(1), vec![2, 4]);
}

#[test]
fn given_level_one_then_three_when_adding_then_invalid_level() {
    let mut builder = builder("");
    builder.add_node(1, labelled("home")).unwrap();

    let result = builder.add_node(3, labelled("deep"));

    assert!(is_invalid_level(&result), "got {:?}", result);
    assert_eq!(builder.tree().len(), 1);
}

#[test]
fn given_ascent_to_unseen_level_when_adding_then_invalid_level() {
    // starts at level 3, then ascends to 2 which never appeared
    let mut builder = builder("");
    builder.add_node(3, labelled("deep")).unwrap();

    let result = builder.add_node(2, labelled("mid"));

    assert!(is_invalid_level(&result));
}

#[test]
fn given_non_numeric_level_attribute_when_adding_then_invalid_level() {
    let mut builder = builder("");
    let result = builder.add_node(0, attrs(&[("level", "top")]));
    assert!(is_invalid_level(&result));
}

// ============================================================
// Guards
// ============================================================

#[test]
fn given_empty_if_when_adding_then_subtree_dropped_until_same_level() {
    // Arrange
    let mut builder = builder("");
    builder.add_node(1, labelled("home")).unwrap();

    // Act
    let admin = builder.add_node(1, attrs(&[("label", "admin"), ("if", "")])).unwrap();
    let users = builder.add_node(2, labelled("users")).unwrap();
    let roles = builder.add_node(3, labelled("roles")).unwrap();
    let audit = builder.add_node(2, labelled("audit")).unwrap();
    let about = builder.add_node(1, labelled("about")).unwrap();
    let team = builder.add_node(2, labelled("team")).unwrap();

    // Assert
    assert_eq!((admin, users, roles, audit), (None, None, None, None));
    assert_eq!(about, Some(1));
    assert_eq!(team, Some(2));
    let tree = builder.finish();
    let labels: Vec<_> = tree.nodes().iter().map(|n| n.display_label()).collect();
    assert_eq!(labels, vec!["home", "about", "team"]);
    assert_eq!(tree.get(0).unwrap().kind, NodeKind::Leaf);
}

#[test]
fn given_pruned_nested_node_when_shallower_node_arrives_then_accepted() {
    let mut builder = builder("");
    builder.add_node(1, labelled("shop")).unwrap();
    builder.add_node(2, labelled("cat")).unwrap();
    builder.add_node(3, attrs(&[("label", "hidden"), ("if", "0")])).unwrap();
    builder.add_node(4, labelled("hidden child")).unwrap();
    let orders = builder.add_node(2, labelled("orders")).unwrap();

    let tree = builder.finish();
    assert_eq!(orders, Some(2));
    assert_eq!(tree.get(2).unwrap().parent, Some(0));
    assert_eq!(tree.get(1).unwrap().kind, NodeKind::Leaf);
}

#[rstest]
#[case("1", true)]
#[case("yes", true)]
#[case("", false)]
#[case("false", false)]
fn given_if_value_when_adding_then_kept_only_when_truthy(#[case] value: &str, #[case] kept: bool) {
    let mut builder = builder("");
    let idx = builder.add_node(1, attrs(&[("if", value)])).unwrap();
    assert_eq!(idx.is_some(), kept);
}

#[test]
fn given_missing_table_when_adding_then_subtree_pruned() {
    let guards = guards_for_request("").with_tables(Arc::new(ConfiguredTables::new(["users"])));
    let mut builder = TreeBuilder::new(guards);

    let users = builder.add_node(1, attrs(&[("if_table", "users")])).unwrap();
    let orders = builder
        .add_node(1, attrs(&[("if_table", "users, orders")]))
        .unwrap();
    let child = builder.add_node(2, labelled("order list")).unwrap();

    assert!(users.is_some());
    assert!(orders.is_none());
    assert!(child.is_none());
}

#[test]
fn given_privilege_predicate_when_adding_then_checks_privilege() {
    let guards =
        guards_for_request("").with_privileges(Arc::new(ConfiguredPrivileges::new(["editor"])));
    let mut builder = TreeBuilder::new(guards);

    let edit = builder.add_node(1, attrs(&[("if_priv", "editor")])).unwrap();
    let admin = builder.add_node(1, attrs(&[("if_priv", "admin")])).unwrap();

    assert!(edit.is_some());
    assert!(admin.is_none());
}

#[test]
fn given_no_privilege_predicate_when_if_priv_used_then_unsupported_guard() {
    let mut builder = builder("");
    let result = builder.add_node(1, attrs(&[("if_priv", "admin")]));
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::UnsupportedGuard { ref guard })) if guard == "if_priv"
    ));
}

#[test]
fn given_skipped_depth_under_failing_guard_when_adding_then_still_invalid_level() {
    // parent resolution runs before guards
    let mut builder = builder("");
    builder.add_node(1, labelled("home")).unwrap();
    let result = builder.add_node(3, attrs(&[("if", "")]));
    assert!(is_invalid_level(&result));
}

// ============================================================
// Active path
// ============================================================

#[rstest]
#[case("")]
#[case("shop")]
#[case("anything/else")]
fn given_root_dir_when_adding_then_always_active(#[case] request: &str) {
    let mut builder = builder(request);
    builder.add_node(1, attrs(&[("label", "home"), ("dir", "/")])).unwrap();
    assert!(builder.tree().is_active(0));
}

#[test]
fn given_nested_dirs_when_request_below_them_then_both_active() {
    let mut builder = builder("shop/cat/sub");
    builder.add_node(1, attrs(&[("dir", "shop")])).unwrap();
    builder.add_node(2, attrs(&[("dir", "shop/cat")])).unwrap();
    builder.add_node(2, attrs(&[("dir", "shop/deals")])).unwrap();

    let tree = builder.finish();
    assert!(tree.is_active(0));
    assert!(tree.is_active(1));
    assert!(!tree.is_active(2));
}

#[test]
fn given_trailing_separator_in_dir_when_request_matches_then_active() {
    let mut builder = builder("/shop/");
    builder.add_node(1, attrs(&[("dir", "shop/")])).unwrap();
    builder.add_node(1, attrs(&[("dir", "shopping/")])).unwrap();

    let tree = builder.finish();
    assert!(tree.is_active(0));
    assert!(!tree.is_active(1));
}

#[rstest]
#[case("/shop", true)]
#[case("/shop/cat", true)]
#[case("shop/", true)]
#[case("/shopping", false)]
fn given_absolute_dir_when_request_matches_then_active(#[case] request: &str, #[case] active: bool) {
    let mut builder = builder(request);
    builder.add_node(1, attrs(&[("dir", "/shop")])).unwrap();
    assert_eq!(builder.tree().is_active(0), active);
}

#[rstest]
#[case("shop")]
#[case("")]
fn given_literal_empty_dir_when_adding_then_not_treated_as_home(#[case] request: &str) {
    let mut builder = builder(request);
    builder.add_node(1, attrs(&[("dir", "")])).unwrap();
    assert!(!builder.tree().is_active(0));
}

#[test]
fn given_empty_request_when_adding_dirs_then_only_home_active() {
    let mut builder = builder("");
    builder.add_node(1, attrs(&[("dir", "/")])).unwrap();
    builder.add_node(1, attrs(&[("dir", "shop")])).unwrap();
    builder.add_node(1, labelled("no dir")).unwrap();

    let tree = builder.finish();
    assert_eq!(tree.active_set().iter().copied().collect::<Vec<_>>(), vec![0]);
}

// ============================================================
// Independence of builds
// ============================================================

#[test]
fn given_concurrent_requests_when_building_then_instances_are_independent() {
    let handles: Vec<_> = ["shop", "about"]
        .into_iter()
        .map(|request| {
            thread::spawn(move || {
                let mut builder = TreeBuilder::new(guards_for_request(request));
                builder.add_node(1, attrs(&[("dir", "shop"), ("if", "")])).unwrap();
                builder.add_node(2, labelled("pruned")).unwrap();
                builder.add_node(1, attrs(&[("dir", request)])).unwrap();
                builder.finish()
            })
        })
        .collect();

    for handle in handles {
        let tree = handle.join().unwrap();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_active(0));
    }
}
