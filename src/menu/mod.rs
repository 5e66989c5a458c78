//! Hierarchical menu navigation.
//!
//! A [`MenuTree`] is built once from nested [`MenuItem`]s. Keyboard and pointer
//! handling live in [`MenuLayer`](crate::layers::menulayer::MenuLayer); this
//! module only tracks which level is shown and which item has focus.
mod item;
mod tree;

pub use item::{ItemView, MenuData, MenuItem, ValueCell};
pub use tree::MenuTree;
