#![forbid(unsafe_code)]

//! Navigation state machines: typeahead search, tree navigation and
//! rectangle selection.

pub mod rect_select;
pub mod stateful;
pub mod tree;
pub mod tree_nav;
pub mod typeahead;

pub use rect_select::{PreviewChange, RectSelectOptions, RectangleSelection};
pub use stateful::{StateKey, Stateful};
pub use tree::{FlatEntry, Forest, ForestError, IdSet, NodeKind, NodePath, SiblingPosition, TreeNode};
pub use tree_nav::{NavResponse, TreeAction, TreeNavOptions, TreeNavState, TreeNavigator};
pub use typeahead::TypeaheadSearch;
