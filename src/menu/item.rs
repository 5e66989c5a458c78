use std::cell::Cell;
use std::rc::Rc;

/// Shared integer cell written by [`MenuItem::BoundValue`] selections.
///
/// The owner keeps one handle and gives clones to the menu; both see the same
/// value.
#[derive(Debug, Clone, Default)]
pub struct ValueCell(Rc<Cell<i32>>);

impl ValueCell {
    pub fn new(value: i32) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    pub fn get(&self) -> i32 {
        self.0.get()
    }

    pub fn set(&self, value: i32) {
        self.0.set(value);
    }
}

/// Key/value pair returned by a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuData {
    pub key: i32,
    pub value: i32,
}

/// One entry of a menu level.
#[derive(Debug, Clone)]
pub enum MenuItem {
    /// Terminal action; selecting it only reports `key`/`value`.
    Leaf { label: String, key: i32, value: i32 },
    /// Selecting writes `value` into `cell`, then reports `key`/`value`.
    BoundValue {
        label: String,
        key: i32,
        value: i32,
        cell: ValueCell,
    },
    /// Enters a submenu.
    Parent {
        label: String,
        children: Vec<MenuItem>,
    },
    /// Leaves the current submenu.
    Back { label: String },
}

impl MenuItem {
    pub fn leaf(label: impl Into<String>, key: i32, value: i32) -> Self {
        MenuItem::Leaf {
            label: label.into(),
            key,
            value,
        }
    }

    pub fn bound(label: impl Into<String>, key: i32, value: i32, cell: &ValueCell) -> Self {
        MenuItem::BoundValue {
            label: label.into(),
            key,
            value,
            cell: cell.clone(),
        }
    }

    pub fn parent(label: impl Into<String>, children: Vec<MenuItem>) -> Self {
        MenuItem::Parent {
            label: label.into(),
            children,
        }
    }

    pub fn back(label: impl Into<String>) -> Self {
        MenuItem::Back {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MenuItem::Leaf { label, .. }
            | MenuItem::BoundValue { label, .. }
            | MenuItem::Parent { label, .. }
            | MenuItem::Back { label } => label,
        }
    }

    /// True for a bound value whose cell currently holds its value.
    pub fn is_current_value(&self) -> bool {
        match self {
            MenuItem::BoundValue { value, cell, .. } => cell.get() == *value,
            _ => false,
        }
    }
}

/// A current-level item annotated for rendering.
#[derive(Debug, Clone, Copy)]
pub struct ItemView<'a> {
    pub index: usize,
    pub item: &'a MenuItem,
    /// Under keyboard or pointer focus.
    pub highlighted: bool,
    /// Result of the tree's active predicate.
    pub active: bool,
}

impl<'a> ItemView<'a> {
    pub fn label(&self) -> &'a str {
        self.item.label()
    }
}
