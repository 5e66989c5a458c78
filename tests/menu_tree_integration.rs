//! Menu tree integration tests against the demo menu.

use twodee::layers::menulayer::{
    EXIT_CODE, FULLSCREEN_CODE, OBJECT_COUNT_CODE, OBJECT_COUNTS, PROGRAM_CODE, build_menu,
};
use twodee::menu::{MenuData, MenuItem, MenuTree, ValueCell};

fn labels(tree: &MenuTree) -> Vec<String> {
    tree.items().iter().map(|v| v.label().to_string()).collect()
}

#[test]
fn root_level_lists_top_entries() {
    let count = ValueCell::new(64);
    let tree = build_menu(&count);
    assert_eq!(labels(&tree), vec!["Objects", "Fullscreen", "Exit"]);
    assert_eq!(tree.depth(), 0);
    let views = tree.items();
    assert!(views[0].highlighted);
    assert!(!views[1].highlighted);
}

#[test]
fn objects_submenu_marks_current_count_active() {
    let count = ValueCell::new(256);
    let mut tree = build_menu(&count);
    assert_eq!(tree.select(), None);
    assert_eq!(tree.depth(), 1);

    let views = tree.items();
    assert_eq!(views.len(), OBJECT_COUNTS.len() + 1);
    assert_eq!(views[0].label(), "..");
    let active: Vec<&str> = views.iter().filter(|v| v.active).map(|v| v.label()).collect();
    assert_eq!(active, vec!["256"]);
}

#[test]
fn selecting_a_count_writes_the_cell_and_reports() {
    let count = ValueCell::new(64);
    let mut tree = build_menu(&count);
    tree.select();
    tree.next();
    tree.next();
    assert_eq!(
        tree.select(),
        Some(MenuData {
            key: OBJECT_COUNT_CODE,
            value: 128
        })
    );
    assert_eq!(count.get(), 128);
    // Still inside the submenu
    assert_eq!(tree.depth(), 1);
    let active: Vec<&str> = tree.items().iter().filter(|v| v.active).map(|v| v.label()).collect();
    assert_eq!(active, vec!["128"]);
}

#[test]
fn back_returns_to_parent_level() {
    let count = ValueCell::new(64);
    let mut tree = build_menu(&count);
    tree.select();
    tree.next();
    tree.prev();
    assert_eq!(tree.highlighted_index(), 0);
    assert_eq!(tree.select(), None);
    assert_eq!(tree.depth(), 0);
    assert_eq!(labels(&tree), vec!["Objects", "Fullscreen", "Exit"]);
    assert_eq!(tree.highlighted_index(), 0);
}

#[test]
fn leaves_report_program_codes() {
    let count = ValueCell::new(64);
    let mut tree = build_menu(&count);
    tree.next();
    assert_eq!(
        tree.select(),
        Some(MenuData {
            key: PROGRAM_CODE,
            value: FULLSCREEN_CODE
        })
    );
    tree.next();
    assert_eq!(
        tree.select(),
        Some(MenuData {
            key: PROGRAM_CODE,
            value: EXIT_CODE
        })
    );
}

#[test]
fn navigation_clamps_at_both_ends() {
    let count = ValueCell::new(64);
    let mut tree = build_menu(&count);
    tree.prev();
    assert_eq!(tree.highlighted_index(), 0);
    for _ in 0..10 {
        tree.next();
    }
    assert_eq!(tree.highlighted_index(), 2);
    assert!(!tree.highlight_item(3));
    assert_eq!(tree.highlighted_index(), 2);
    assert!(tree.highlight_item(1));
    assert_eq!(tree.highlighted_index(), 1);
}

#[test]
fn reset_returns_to_root() {
    let count = ValueCell::new(64);
    let mut tree = build_menu(&count);
    tree.select();
    tree.next();
    tree.reset();
    assert_eq!(tree.depth(), 0);
    assert_eq!(tree.highlighted_index(), 0);
}

#[test]
fn back_at_root_is_ignored() {
    let mut tree = MenuTree::new(vec![MenuItem::back("up"), MenuItem::leaf("x", 1, 2)]);
    assert_eq!(tree.select(), None);
    assert_eq!(tree.depth(), 0);
}

#[test]
fn empty_level_selects_nothing() {
    let mut tree = MenuTree::new(vec![MenuItem::parent("Empty", Vec::new())]);
    tree.select();
    assert_eq!(tree.depth(), 1);
    assert!(tree.items().is_empty());
    tree.next();
    assert_eq!(tree.select(), None);
}

#[test]
fn custom_active_predicate() {
    let tree = MenuTree::new(vec![MenuItem::leaf("a", 1, 1), MenuItem::leaf("b", 1, 2)])
        .with_active_predicate(|item| item.label() == "b");
    let active: Vec<bool> = tree.items().iter().map(|v| v.active).collect();
    assert_eq!(active, vec![false, true]);
}
