#![forbid(unsafe_code)]

//! Tree model and flattening for keyboard navigation.
//!
//! Content providers build a forest of [`TreeNode`]s from their domain
//! objects. Expansion is *not* stored on nodes: it lives in an id set owned by
//! the navigator, and [`flatten`] derives the visible, ordered list from the
//! forest plus that set. Parents are identified by index paths rather than
//! back-pointers, so the forest stays a plain owned value.
//!
//! # Example
//!
//! ```
//! use keynav_widgets::tree::{Forest, IdSet, TreeNode};
//!
//! let forest: Forest<()> = Forest::new(vec![
//!     TreeNode::category("a", "A")
//!         .child(TreeNode::leaf("a1", "A1"))
//!         .child(TreeNode::leaf("a2", "A2")),
//!     TreeNode::category("b", "B"),
//! ])
//! .unwrap();
//!
//! let mut expanded = IdSet::default();
//! assert_eq!(forest.flatten(&expanded).len(), 2);
//! expanded.insert("a".to_string());
//! assert_eq!(forest.flatten(&expanded).len(), 4);
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::fmt;

/// Set of node ids, used for expansion state.
pub type IdSet = FxHashSet<String>;

/// Index path from the root list down to a node.
///
/// `[2, 0]` is the first child of the third root.
pub type NodePath = SmallVec<[usize; 8]>;

/// What a node is, decided once when the forest is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Groups children; the only kind that expands.
    Category,
    /// A selectable item (building, project, quest).
    Leaf,
    /// A command (delete, dismiss, open details).
    Action,
    /// Read-only text with no activation.
    Info,
}

impl NodeKind {
    /// Whether this kind can hold children and expand.
    #[inline]
    #[must_use]
    pub const fn is_category(self) -> bool {
        matches!(self, Self::Category)
    }

    /// Whether activating this kind hands its payload to the caller.
    #[inline]
    #[must_use]
    pub const fn is_activatable(self) -> bool {
        matches!(self, Self::Leaf | Self::Action)
    }
}

/// A node in the navigation forest.
#[derive(Debug, Clone)]
pub struct TreeNode<P> {
    id: String,
    label: String,
    kind: NodeKind,
    children: Vec<TreeNode<P>>,
    payload: Option<P>,
}

impl<P> TreeNode<P> {
    /// Create a node of the given kind.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            children: Vec::new(),
            payload: None,
        }
    }

    /// Create a category node.
    #[must_use]
    pub fn category(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, NodeKind::Category)
    }

    /// Create a leaf node.
    #[must_use]
    pub fn leaf(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, NodeKind::Leaf)
    }

    /// Create an action node.
    #[must_use]
    pub fn action(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, NodeKind::Action)
    }

    /// Create an info node.
    #[must_use]
    pub fn info(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, NodeKind::Info)
    }

    /// Add a child node.
    #[must_use]
    pub fn child(mut self, node: TreeNode<P>) -> Self {
        self.children.push(node);
        self
    }

    /// Set children from a vec.
    #[must_use]
    pub fn with_children(mut self, nodes: Vec<TreeNode<P>>) -> Self {
        self.children = nodes;
        self
    }

    /// Attach the domain payload.
    #[must_use]
    pub fn with_payload(mut self, payload: P) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Stable id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Narration label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Whether this is a category.
    #[must_use]
    pub fn is_category(&self) -> bool {
        self.kind.is_category()
    }

    /// Child nodes, in builder order.
    #[must_use]
    pub fn children(&self) -> &[TreeNode<P>] {
        &self.children
    }

    /// Whether the node has any children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The domain payload, if one was attached.
    #[must_use]
    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    /// Count this node plus every descendant visible under `expanded`.
    #[must_use]
    pub fn visible_count(&self, expanded: &IdSet) -> usize {
        let mut count = 1;
        if self.is_category() && expanded.contains(&self.id) {
            for child in &self.children {
                count += child.visible_count(expanded);
            }
        }
        count
    }
}

/// Structural problems in a forest handed over by a content provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForestError {
    /// Two nodes share an id.
    DuplicateId(String),
    /// A node has an empty id.
    EmptyId {
        /// Label of the offending node.
        label: String,
    },
    /// A non-category node was given children.
    ChildrenOnNonCategory(String),
}

impl fmt::Display for ForestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate node id: {id}"),
            Self::EmptyId { label } => write!(f, "node '{label}' has an empty id"),
            Self::ChildrenOnNonCategory(id) => {
                write!(f, "node {id} has children but is not a category")
            }
        }
    }
}

impl std::error::Error for ForestError {}

/// Position of a node among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiblingPosition {
    /// Zero-based index among siblings.
    pub index: usize,
    /// Number of siblings, including the node.
    pub count: usize,
}

impl SiblingPosition {
    /// One-based ordinal, as spoken.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.index + 1
    }
}

impl fmt::Display for SiblingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.ordinal(), self.count)
    }
}

/// One row of the flattened, navigable list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry {
    /// Path to the node in the forest.
    pub path: NodePath,
    /// Nesting depth; roots are 0.
    pub depth: usize,
    /// Flat index of the parent row, `None` for roots.
    pub parent: Option<usize>,
    /// Whether the node was expanded when flattened.
    pub expanded: bool,
}

/// Flatten a forest in pre-order under the given expansion set.
///
/// Children are visited only for categories whose id is in `expanded`;
/// everything below a collapsed node is absent from the result. Pure: equal
/// inputs always give equal output.
#[must_use]
pub fn flatten<P>(roots: &[TreeNode<P>], expanded: &IdSet) -> Vec<FlatEntry> {
    let rows = roots.iter().map(|root| root.visible_count(expanded)).sum();
    let mut out = Vec::with_capacity(rows);
    let mut path = NodePath::new();
    for (i, root) in roots.iter().enumerate() {
        path.push(i);
        flatten_node(root, &mut path, None, expanded, &mut out);
        path.pop();
    }
    out
}

fn flatten_node<P>(
    node: &TreeNode<P>,
    path: &mut NodePath,
    parent: Option<usize>,
    expanded: &IdSet,
    out: &mut Vec<FlatEntry>,
) {
    let is_expanded = node.is_category() && expanded.contains(&node.id);
    let index = out.len();
    out.push(FlatEntry {
        path: path.clone(),
        depth: path.len() - 1,
        parent,
        expanded: is_expanded,
    });

    if !is_expanded {
        return;
    }

    for (i, child) in node.children.iter().enumerate() {
        path.push(i);
        flatten_node(child, path, Some(index), expanded, out);
        path.pop();
    }
}

/// A validated forest of navigation nodes.
///
/// # Invariants
///
/// 1. Every id is non-empty and unique across the whole forest.
/// 2. Only categories have children.
#[derive(Debug, Clone)]
pub struct Forest<P> {
    roots: Vec<TreeNode<P>>,
}

impl<P> Default for Forest<P> {
    fn default() -> Self {
        Self { roots: Vec::new() }
    }
}

impl<P> Forest<P> {
    /// Validate and wrap a list of root nodes.
    pub fn new(roots: Vec<TreeNode<P>>) -> Result<Self, ForestError> {
        let mut seen = FxHashSet::default();
        let mut stack: Vec<&TreeNode<P>> = roots.iter().collect();
        while let Some(node) = stack.pop() {
            if node.id.is_empty() {
                return Err(ForestError::EmptyId {
                    label: node.label.clone(),
                });
            }
            if !seen.insert(node.id.as_str()) {
                return Err(ForestError::DuplicateId(node.id.clone()));
            }
            if !node.is_category() && node.has_children() {
                return Err(ForestError::ChildrenOnNonCategory(node.id.clone()));
            }
            stack.extend(node.children.iter());
        }
        Ok(Self { roots })
    }

    /// Root nodes, in builder order.
    #[must_use]
    pub fn roots(&self) -> &[TreeNode<P>] {
        &self.roots
    }

    /// Whether the forest has no roots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Node at `path`, if the path is valid.
    #[must_use]
    pub fn node(&self, path: &[usize]) -> Option<&TreeNode<P>> {
        let (&first, rest) = path.split_first()?;
        let mut current = self.roots.get(first)?;
        for &i in rest {
            current = current.children.get(i)?;
        }
        Some(current)
    }

    /// The sibling list containing the node at `path`: its parent's
    /// children, or the root list for top-level nodes.
    #[must_use]
    pub fn siblings(&self, path: &[usize]) -> &[TreeNode<P>] {
        match path.split_last() {
            None => &[],
            Some((_, [])) => &self.roots,
            Some((_, parent)) => self.node(parent).map_or(&[], |p| p.children()),
        }
    }

    /// Position of the node at `path` among its siblings.
    ///
    /// Walks the parent's current children every call, so it reflects
    /// content changes and ignores expansion elsewhere in the forest.
    #[must_use]
    pub fn position(&self, path: &[usize]) -> Option<SiblingPosition> {
        let &index = path.last()?;
        let count = self.siblings(path).len();
        (index < count).then_some(SiblingPosition { index, count })
    }

    /// Path of the node with the given id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<NodePath> {
        let mut path = NodePath::new();
        for (i, root) in self.roots.iter().enumerate() {
            path.push(i);
            if find_in(root, id, &mut path) {
                return Some(path);
            }
            path.pop();
        }
        None
    }

    /// Map every id to its kind.
    #[must_use]
    pub fn kinds(&self) -> FxHashMap<&str, NodeKind> {
        let mut out = FxHashMap::default();
        let mut stack: Vec<&TreeNode<P>> = self.roots.iter().collect();
        while let Some(node) = stack.pop() {
            out.insert(node.id.as_str(), node.kind);
            stack.extend(node.children.iter());
        }
        out
    }

    /// Flatten under the given expansion set. See [`flatten`].
    #[must_use]
    pub fn flatten(&self, expanded: &IdSet) -> Vec<FlatEntry> {
        flatten(&self.roots, expanded)
    }

    /// Total number of nodes, visible or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        fn count<P>(node: &TreeNode<P>) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }
}

fn find_in<P>(node: &TreeNode<P>, id: &str, path: &mut NodePath) -> bool {
    if node.id == id {
        return true;
    }
    for (i, child) in node.children.iter().enumerate() {
        path.push(i);
        if find_in(child, id, path) {
            return true;
        }
        path.pop();
    }
    false
}
