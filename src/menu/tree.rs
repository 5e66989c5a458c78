use log::trace;

use super::item::{ItemView, MenuData, MenuItem};

type ActivePredicate = Box<dyn Fn(&MenuItem) -> bool>;

/// What a selection does to the navigation state, decided before mutating.
enum Step {
    Ascend,
    Descend,
    Report(MenuData),
}

/// Hierarchical menu navigation.
///
/// The navigation stack is stored as the path of `Parent` indices from the
/// root to the current level, so its length is the depth.
pub struct MenuTree {
    root: Vec<MenuItem>,
    path: Vec<usize>,
    highlighted: usize,
    active: ActivePredicate,
}

impl MenuTree {
    /// Build a tree. Items are `active` when they are a bound value whose cell
    /// holds their value; see [`MenuTree::with_active_predicate`].
    pub fn new(root: Vec<MenuItem>) -> Self {
        Self {
            root,
            path: Vec::new(),
            highlighted: 0,
            active: Box::new(MenuItem::is_current_value),
        }
    }

    /// Replace the predicate that decides each item's `active` flag.
    pub fn with_active_predicate(mut self, predicate: impl Fn(&MenuItem) -> bool + 'static) -> Self {
        self.active = Box::new(predicate);
        self
    }

    /// Return to the root level with the first item highlighted.
    pub fn reset(&mut self) {
        self.path.clear();
        self.highlighted = 0;
    }

    /// Number of submenus currently descended into.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn highlighted_index(&self) -> usize {
        self.highlighted
    }

    /// Items of the current level, without annotations.
    pub fn current_level(&self) -> &[MenuItem] {
        let mut level: &[MenuItem] = &self.root;
        for &index in &self.path {
            match level.get(index) {
                Some(MenuItem::Parent { children, .. }) => level = children,
                _ => break,
            }
        }
        level
    }

    /// Items of the current level annotated with `highlighted` and `active`.
    pub fn items(&self) -> Vec<ItemView<'_>> {
        self.current_level()
            .iter()
            .enumerate()
            .map(|(index, item)| ItemView {
                index,
                item,
                highlighted: index == self.highlighted,
                active: (self.active)(item),
            })
            .collect()
    }

    pub fn prev(&mut self) {
        if self.highlighted > 0 {
            self.highlighted -= 1;
        }
    }

    pub fn next(&mut self) {
        if self.highlighted + 1 < self.current_level().len() {
            self.highlighted += 1;
        }
    }

    /// Highlight the item at `index` of the current level.
    ///
    /// Returns `false` and leaves the highlight alone when out of range.
    pub fn highlight_item(&mut self, index: usize) -> bool {
        if index < self.current_level().len() {
            self.highlighted = index;
            true
        } else {
            false
        }
    }

    /// Activate the highlighted item.
    ///
    /// Navigation items (`Parent`, `Back`) change the level and return `None`.
    /// Bound values write their cell before returning their data.
    pub fn select(&mut self) -> Option<MenuData> {
        let step = match self.current_level().get(self.highlighted)? {
            MenuItem::Back { .. } => Step::Ascend,
            MenuItem::Parent { .. } => Step::Descend,
            MenuItem::BoundValue {
                key, value, cell, ..
            } => {
                cell.set(*value);
                Step::Report(MenuData {
                    key: *key,
                    value: *value,
                })
            }
            MenuItem::Leaf { key, value, .. } => Step::Report(MenuData {
                key: *key,
                value: *value,
            }),
        };
        match step {
            Step::Ascend => {
                if self.path.pop().is_some() {
                    self.highlighted = 0;
                }
                trace!("menu ascend, depth={}", self.depth());
                None
            }
            Step::Descend => {
                self.path.push(self.highlighted);
                self.highlighted = 0;
                trace!("menu descend, depth={}", self.depth());
                None
            }
            Step::Report(data) => Some(data),
        }
    }
}
