#![forbid(unsafe_code)]

//! Keyboard navigation over an expandable tree.
//!
//! [`TreeNavigator`] owns a validated [`Forest`], the expanded-id set, the
//! flattened visible list and a [`TypeaheadSearch`]. Each operation mutates
//! that state and returns a [`NavResponse`] carrying at most one narration,
//! an optional audio cue and, for activation or exit, a [`TreeAction`] for the
//! caller.
//!
//! Rejections (expanding a leaf, collapsing at the top level, a search miss)
//! are ordinary responses with [`Cue::Reject`], never errors.
//!
//! # Example
//!
//! ```
//! use keynav_core::event::{KeyCode, KeyEvent};
//! use keynav_widgets::tree::TreeNode;
//! use keynav_widgets::tree_nav::TreeNavigator;
//!
//! let mut nav: TreeNavigator<()> = TreeNavigator::new(vec![
//!     TreeNode::category("a", "A")
//!         .child(TreeNode::leaf("a1", "A1"))
//!         .child(TreeNode::leaf("a2", "A2")),
//!     TreeNode::category("b", "B"),
//! ])
//! .unwrap();
//!
//! let r = nav.handle_key(&KeyEvent::new(KeyCode::Right)).unwrap();
//! assert_eq!(r.text(), Some("A, expanded, 1 of 2"));
//! nav.select_next();
//! let r = nav.select_next();
//! assert_eq!(r.text(), Some("A2, 2 of 2"));
//! let r = nav.collapse();
//! assert_eq!(r.text(), Some("A, expanded, 1 of 2"));
//! ```

use crate::stateful::{StateKey, Stateful};
use crate::tree::{FlatEntry, Forest, ForestError, IdSet, NodeKind, TreeNode};
use crate::typeahead::TypeaheadSearch;
use keynav_core::announce::{Announcement, Cue};
use keynav_core::event::{KeyCode, KeyEvent};
use rustc_hash::FxHashMap;

/// Narration shown when collapsing at the top level.
pub const TOP_LEVEL_MESSAGE: &str = "Already at top level";

/// Behavior switches for [`TreeNavigator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeNavOptions {
    /// Up/Down wrap around the ends of the list.
    pub wrap: bool,
    /// Append ", level N" to node descriptions.
    pub announce_level: bool,
}

impl Default for TreeNavOptions {
    fn default() -> Self {
        Self {
            wrap: true,
            announce_level: false,
        }
    }
}

impl TreeNavOptions {
    /// Set wraparound (builder).
    #[must_use]
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Set level announcement (builder).
    #[must_use]
    pub fn with_announce_level(mut self, announce_level: bool) -> Self {
        self.announce_level = announce_level;
        self
    }
}

/// Something the caller must act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeAction {
    /// A leaf or action node was confirmed. Carries the node id.
    Activate(String),
    /// Escape with no search in progress: leave the menu.
    Exit,
}

/// Result of one navigation operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavResponse {
    /// What to narrate, if anything.
    pub announcement: Option<Announcement>,
    /// Audio cue to play, if any.
    pub cue: Option<Cue>,
    /// Follow-up for the caller.
    pub action: Option<TreeAction>,
}

impl NavResponse {
    /// A response that does nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Narrate `text` at normal priority.
    #[must_use]
    pub fn say(text: impl Into<String>) -> Self {
        Self {
            announcement: Some(Announcement::new(text)),
            ..Self::default()
        }
    }

    /// Reject cue with no narration.
    #[must_use]
    pub fn reject() -> Self {
        Self {
            cue: Some(Cue::Reject),
            ..Self::default()
        }
    }

    /// Reject cue plus a short reason.
    #[must_use]
    pub fn reject_with(text: impl Into<String>) -> Self {
        Self {
            cue: Some(Cue::Reject),
            ..Self::say(text)
        }
    }

    /// Hand an action to the caller.
    #[must_use]
    pub fn action(action: TreeAction) -> Self {
        Self {
            action: Some(action),
            ..Self::default()
        }
    }

    /// Whether the operation was rejected.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.cue == Some(Cue::Reject)
    }

    /// Narrated text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.announcement.as_ref().map(|a| a.text.as_str())
    }

    /// Whether the response carries nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.announcement.is_none() && self.cue.is_none() && self.action.is_none()
    }
}

/// Snapshot of a navigator's user-facing state, keyed by node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNavState {
    /// Expanded category ids.
    pub expanded_ids: IdSet,
    /// Parent id to last visited child id.
    pub last_child: FxHashMap<String, String>,
    /// Ids from the root down to the selected node, inclusive.
    pub selection_trail: Vec<String>,
    /// Flat index of the selected node, used when no trail id survives.
    pub selected_index: usize,
}

impl TreeNavState {
    /// Id of the selected node.
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selection_trail.last().map(String::as_str)
    }
}

/// Keyboard navigator over a forest of [`TreeNode`]s.
///
/// # Invariants
///
/// 1. `current < flat.len()` whenever the list is non-empty.
/// 2. Only category ids are ever inserted into `expanded`.
/// 3. The search is cleared whenever the visible list changes shape.
#[derive(Debug, Clone)]
pub struct TreeNavigator<P> {
    forest: Forest<P>,
    flat: Vec<FlatEntry>,
    current: usize,
    expanded: IdSet,
    last_child: FxHashMap<String, String>,
    search: TypeaheadSearch,
    options: TreeNavOptions,
    persistence_id: Option<String>,
}

impl<P> TreeNavigator<P> {
    /// Validate `roots` and start fully collapsed on the first root.
    pub fn new(roots: Vec<TreeNode<P>>) -> Result<Self, ForestError> {
        Forest::new(roots).map(Self::from_forest)
    }

    /// Start on an already validated forest.
    #[must_use]
    pub fn from_forest(forest: Forest<P>) -> Self {
        let expanded = IdSet::default();
        let flat = forest.flatten(&expanded);
        Self {
            forest,
            flat,
            current: 0,
            expanded,
            last_child: FxHashMap::default(),
            search: TypeaheadSearch::new(),
            options: TreeNavOptions::default(),
            persistence_id: None,
        }
    }

    /// Set options (builder).
    #[must_use]
    pub fn with_options(mut self, options: TreeNavOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the instance id used in the state key (builder).
    #[must_use]
    pub fn with_persistence_id(mut self, id: impl Into<String>) -> Self {
        self.persistence_id = Some(id.into());
        self
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> TreeNavOptions {
        self.options
    }

    /// The underlying forest.
    #[must_use]
    pub fn forest(&self) -> &Forest<P> {
        &self.forest
    }

    /// The visible, ordered list.
    #[must_use]
    pub fn flat(&self) -> &[FlatEntry] {
        &self.flat
    }

    /// Whether nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// Number of visible nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flat.len()
    }

    /// Cursor position in the visible list.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The node under the cursor.
    #[must_use]
    pub fn current_node(&self) -> Option<&TreeNode<P>> {
        self.node_at(self.current)
    }

    /// Id of the node under the cursor.
    #[must_use]
    pub fn current_id(&self) -> Option<&str> {
        self.current_node().map(TreeNode::id)
    }

    /// Expanded category ids.
    #[must_use]
    pub fn expanded_ids(&self) -> &IdSet {
        &self.expanded
    }

    /// The remembered child for a parent id.
    #[must_use]
    pub fn remembered_child(&self, parent_id: &str) -> Option<&str> {
        self.last_child.get(parent_id).map(String::as_str)
    }

    /// The typeahead state.
    #[must_use]
    pub fn search(&self) -> &TypeaheadSearch {
        &self.search
    }

    /// Node with the given id, visible or not.
    #[must_use]
    pub fn node_by_id(&self, id: &str) -> Option<&TreeNode<P>> {
        self.forest.find(id).and_then(|path| self.forest.node(&path))
    }

    /// Describe the visible node at `index`.
    ///
    /// Format: label, then `expanded`/`collapsed`/`empty` for categories,
    /// then the sibling position, then the level when enabled.
    #[must_use]
    pub fn describe(&self, index: usize) -> Option<String> {
        let entry = self.flat.get(index)?;
        let node = self.forest.node(&entry.path)?;
        let mut text = node.label().to_string();
        if node.is_category() {
            let state = if !node.has_children() {
                "empty"
            } else if entry.expanded {
                "expanded"
            } else {
                "collapsed"
            };
            text.push_str(", ");
            text.push_str(state);
        }
        if let Some(position) = self.forest.position(&entry.path) {
            text.push_str(&format!(", {position}"));
        }
        if self.options.announce_level {
            text.push_str(&format!(", level {}", entry.depth + 1));
        }
        Some(text)
    }

    /// Announcement for the current node.
    #[must_use]
    pub fn announce_current(&self) -> Option<Announcement> {
        self.describe(self.current).map(Announcement::new)
    }

    /// Move the cursor to a visible node by id. Returns false if the node is
    /// absent or hidden under a collapsed ancestor.
    pub fn focus_id(&mut self, id: &str) -> bool {
        match self.index_of_id(id) {
            Some(index) => {
                self.search.clear();
                self.current = index;
                true
            }
            None => false,
        }
    }

    // ── Operations ──────────────────────────────────────────────────────

    /// Move down one row, or to the next match while searching.
    pub fn select_next(&mut self) -> NavResponse {
        if self.is_empty() {
            return NavResponse::none();
        }
        if let Some(index) = self.search.next_match(self.current) {
            return self.announce_match(index);
        }
        if self.current + 1 < self.flat.len() {
            self.move_to(self.current + 1)
        } else if self.options.wrap {
            self.move_to(0)
        } else {
            NavResponse::reject()
        }
    }

    /// Move up one row, or to the previous match while searching.
    pub fn select_previous(&mut self) -> NavResponse {
        if self.is_empty() {
            return NavResponse::none();
        }
        if let Some(index) = self.search.previous_match(self.current) {
            return self.announce_match(index);
        }
        if self.current > 0 {
            self.move_to(self.current - 1)
        } else if self.options.wrap {
            self.move_to(self.flat.len() - 1)
        } else {
            NavResponse::reject()
        }
    }

    /// Expand the current category, or step into it if already expanded.
    pub fn expand(&mut self) -> NavResponse {
        let Some((is_category, has_children, expanded)) = self.current_shape() else {
            return NavResponse::none();
        };
        if !is_category || !has_children {
            return NavResponse::reject();
        }
        self.search.clear();
        if !expanded {
            return self.set_current_expanded(true);
        }

        let current = self.current;
        let target = self
            .current_id()
            .and_then(|id| self.last_child.get(id))
            .and_then(|child| self.index_of_id(child))
            .filter(|&i| self.flat[i].parent == Some(current))
            .unwrap_or(current + 1);
        self.move_to(target)
    }

    /// Collapse the current category, or move to the parent.
    pub fn collapse(&mut self) -> NavResponse {
        let Some((_, _, expanded)) = self.current_shape() else {
            return NavResponse::none();
        };
        self.search.clear();
        if expanded {
            return self.set_current_expanded(false);
        }

        let Some(parent) = self.flat[self.current].parent else {
            return NavResponse::reject_with(TOP_LEVEL_MESSAGE);
        };
        if let (Some(parent_id), Some(child_id)) = (self.id_at(parent), self.id_at(self.current)) {
            let (parent_id, child_id) = (parent_id.to_string(), child_id.to_string());
            self.last_child.insert(parent_id, child_id);
        }
        self.move_to(parent)
    }

    /// Expand every collapsed, non-empty category among the current node's
    /// siblings.
    pub fn expand_all_siblings(&mut self) -> NavResponse {
        let Some(entry) = self.flat.get(self.current) else {
            return NavResponse::none();
        };
        let path = entry.path.clone();

        let mut categories = 0usize;
        let mut newly = 0usize;
        for sibling in self.forest.siblings(&path) {
            if sibling.is_category() && sibling.has_children() {
                categories += 1;
                if self.expanded.insert(sibling.id().to_string()) {
                    newly += 1;
                }
            }
        }

        if categories == 0 {
            return NavResponse::reject_with("No categories to expand");
        }
        if newly == 0 {
            return NavResponse::reject_with("All already expanded");
        }

        self.search.clear();
        self.reflatten();
        if let Some(index) = self.flat.iter().position(|e| e.path == path) {
            self.current = index;
        }
        keynav_core::debug!(expanded = newly, "expanded sibling categories");
        let noun = if newly == 1 { "category" } else { "categories" };
        NavResponse::say(format!("Expanded {newly} {noun}"))
    }

    /// Enter: toggle a category, hand a leaf or action to the caller.
    pub fn activate(&mut self) -> NavResponse {
        let Some(node) = self.current_node() else {
            return NavResponse::none();
        };
        match node.kind() {
            NodeKind::Category => {
                let expanded = self.flat[self.current].expanded;
                if !expanded && !node.has_children() {
                    return NavResponse::reject();
                }
                self.search.clear();
                self.set_current_expanded(!expanded)
            }
            NodeKind::Leaf | NodeKind::Action => {
                let id = node.id().to_string();
                keynav_core::debug!(node = %id, "activate");
                NavResponse::action(TreeAction::Activate(id))
            }
            NodeKind::Info => NavResponse::reject(),
        }
    }

    /// Jump to the first visible node.
    pub fn jump_to_first(&mut self) -> NavResponse {
        if self.is_empty() {
            return NavResponse::none();
        }
        self.search.clear();
        self.move_to(0)
    }

    /// Jump to the last visible node.
    pub fn jump_to_last(&mut self) -> NavResponse {
        if self.is_empty() {
            return NavResponse::none();
        }
        self.search.clear();
        self.move_to(self.flat.len() - 1)
    }

    /// Extend the typeahead query with `c`.
    pub fn type_char(&mut self, c: char) -> NavResponse {
        if self.is_empty() {
            return NavResponse::none();
        }
        let labels = visible_labels(&self.forest, &self.flat);
        match self.search.process_char(c, &labels, self.current) {
            Some(index) => self.announce_match(index),
            None => {
                let attempt = self.search.last_failed_search().unwrap_or_default();
                NavResponse::reject_with(format!("No matches for '{attempt}'"))
            }
        }
    }

    /// Shrink the typeahead query. Does nothing without an active search.
    pub fn backspace(&mut self) -> NavResponse {
        if self.is_empty() || !self.search.is_active() {
            return NavResponse::none();
        }
        let labels = visible_labels(&self.forest, &self.flat);
        match self.search.process_backspace(&labels, self.current) {
            Some(index) => self.announce_match(index),
            None => self.search_cleared(),
        }
    }

    /// Clear an active search, or ask the caller to exit.
    pub fn escape(&mut self) -> NavResponse {
        if self.search.is_active() {
            self.search.clear();
            return self.search_cleared();
        }
        NavResponse::action(TreeAction::Exit)
    }

    /// Route a key to the matching operation.
    ///
    /// Returns `None` for keys the navigator does not bind: releases,
    /// Ctrl/Alt chords, Backspace with no search, and unbound keys.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<NavResponse> {
        if !key.is_actionable() || key.ctrl() || key.alt() {
            return None;
        }
        let _span = keynav_core::debug_span!("tree_nav.key", code = ?key.code).entered();
        let response = match key.code {
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            KeyCode::Right => self.expand(),
            KeyCode::Left => self.collapse(),
            KeyCode::Enter => self.activate(),
            KeyCode::Home => self.jump_to_first(),
            KeyCode::End => self.jump_to_last(),
            KeyCode::Escape => self.escape(),
            KeyCode::Backspace if self.search.is_active() => self.backspace(),
            KeyCode::Char('*') => self.expand_all_siblings(),
            _ => {
                let c = key.typed_char()?;
                self.type_char(c)
            }
        };
        keynav_core::trace!(
            index = self.current,
            rejected = response.is_rejected(),
            "key handled"
        );
        Some(response)
    }

    /// Replace the content with a freshly built forest, keeping expansion,
    /// remembered children and the selection wherever the same ids exist.
    pub fn refresh(&mut self, roots: Vec<TreeNode<P>>) -> Result<(), ForestError> {
        let forest = Forest::new(roots)?;
        let state = self.save_state();
        self.forest = forest;
        self.restore_state(state);
        keynav_core::debug!(
            visible = self.flat.len(),
            total = self.forest.node_count(),
            index = self.current,
            "navigator refreshed"
        );
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn node_at(&self, index: usize) -> Option<&TreeNode<P>> {
        self.flat
            .get(index)
            .and_then(|entry| self.forest.node(&entry.path))
    }

    fn id_at(&self, index: usize) -> Option<&str> {
        self.node_at(index).map(TreeNode::id)
    }

    fn index_of_id(&self, id: &str) -> Option<usize> {
        let path = self.forest.find(id)?;
        self.flat.iter().position(|e| e.path == path)
    }

    /// (is_category, has_children, expanded) for the current node.
    fn current_shape(&self) -> Option<(bool, bool, bool)> {
        let entry = self.flat.get(self.current)?;
        let node = self.forest.node(&entry.path)?;
        Some((node.is_category(), node.has_children(), entry.expanded))
    }

    fn reflatten(&mut self) {
        self.flat = self.forest.flatten(&self.expanded);
        self.current = self.current.min(self.flat.len().saturating_sub(1));
    }

    /// Toggle the current node's expansion in place. Pre-order flattening
    /// only adds or removes rows after the node, so the index stays valid.
    fn set_current_expanded(&mut self, expanded: bool) -> NavResponse {
        let Some(id) = self.current_id().map(str::to_string) else {
            return NavResponse::none();
        };
        if expanded {
            self.expanded.insert(id);
        } else {
            self.expanded.remove(&id);
        }
        self.reflatten();
        self.move_to(self.current)
    }

    fn move_to(&mut self, index: usize) -> NavResponse {
        self.current = index.min(self.flat.len().saturating_sub(1));
        match self.describe(self.current) {
            Some(text) => NavResponse::say(text),
            None => NavResponse::none(),
        }
    }

    fn announce_match(&mut self, index: usize) -> NavResponse {
        self.current = index;
        let Some(description) = self.describe(index) else {
            return NavResponse::none();
        };
        let position = self.search.match_position().unwrap_or(1);
        NavResponse::say(format!(
            "{description}, match {position} of {} for '{}'",
            self.search.match_count(),
            self.search.query()
        ))
    }

    fn search_cleared(&self) -> NavResponse {
        let description = self.describe(self.current).unwrap_or_default();
        NavResponse::say(format!("Search cleared, {description}"))
    }
}

fn visible_labels<'a, P>(forest: &'a Forest<P>, flat: &[FlatEntry]) -> Vec<&'a str> {
    flat.iter()
        .map(|entry| forest.node(&entry.path).map_or("", |node| node.label()))
        .collect()
}

impl<P> Stateful for TreeNavigator<P> {
    type State = TreeNavState;

    fn state_key(&self) -> StateKey {
        StateKey::new(
            "TreeNavigator",
            self.persistence_id.as_deref().unwrap_or("default"),
        )
    }

    fn save_state(&self) -> TreeNavState {
        let mut trail = Vec::new();
        let mut cursor = self.flat.get(self.current).map(|_| self.current);
        while let Some(index) = cursor {
            if let Some(id) = self.id_at(index) {
                trail.push(id.to_string());
            }
            cursor = self.flat[index].parent;
        }
        trail.reverse();

        TreeNavState {
            expanded_ids: self.expanded.clone(),
            last_child: self.last_child.clone(),
            selection_trail: trail,
            selected_index: self.current,
        }
    }

    fn restore_state(&mut self, state: TreeNavState) {
        let kinds = self.forest.kinds();
        let is_category = |id: &str| kinds.get(id) == Some(&NodeKind::Category);

        self.expanded = state
            .expanded_ids
            .into_iter()
            .filter(|id| is_category(id.as_str()))
            .collect();
        self.last_child = state
            .last_child
            .into_iter()
            .filter(|(parent, child)| {
                is_category(parent.as_str()) && kinds.contains_key(child.as_str())
            })
            .collect();

        self.search.clear();
        self.flat = self.forest.flatten(&self.expanded);
        let restored = state
            .selection_trail
            .iter()
            .rev()
            .find_map(|id| self.index_of_id(id));
        self.current = restored
            .unwrap_or(state.selected_index)
            .min(self.flat.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keynav_core::event::{KeyEventKind, Modifiers};

    fn scenario_roots() -> Vec<TreeNode<u32>> {
        vec![
            TreeNode::category("a", "A")
                .child(TreeNode::leaf("a1", "A1").with_payload(1))
                .child(TreeNode::leaf("a2", "A2").with_payload(2)),
            TreeNode::category("b", "B"),
        ]
    }

    fn nav() -> TreeNavigator<u32> {
        TreeNavigator::new(scenario_roots()).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    fn visible(nav: &TreeNavigator<u32>) -> Vec<String> {
        (0..nav.len())
            .map(|i| nav.node_at(i).unwrap().label().to_string())
            .collect()
    }

    #[test]
    fn initial_state_is_collapsed_on_first_root() {
        let nav = nav();
        assert_eq!(visible(&nav), vec!["A", "B"]);
        assert_eq!(nav.current_index(), 0);
        assert_eq!(
            nav.announce_current().unwrap().text,
            "A, collapsed, 1 of 2"
        );
        assert_eq!(nav.describe(1).unwrap(), "B, empty, 2 of 2");
    }

    #[test]
    fn expand_then_walk_then_collapse_to_parent() {
        let mut nav = nav();
        let r = nav.expand();
        assert_eq!(r.text(), Some("A, expanded, 1 of 2"));
        assert_eq!(visible(&nav), vec!["A", "A1", "A2", "B"]);
        assert_eq!(nav.current_index(), 0);

        nav.select_next();
        let r = nav.select_next();
        assert_eq!(r.text(), Some("A2, 2 of 2"));

        let r = nav.collapse();
        assert_eq!(r.text(), Some("A, expanded, 1 of 2"));
        assert!(nav.expanded_ids().contains("a"));
        assert_eq!(visible(&nav), vec!["A", "A1", "A2", "B"]);
        assert_eq!(nav.remembered_child("a"), Some("a2"));
    }

    #[test]
    fn expand_again_restores_remembered_child() {
        let mut nav = nav();
        nav.expand();
        nav.select_next();
        nav.select_next();
        nav.collapse();
        let r = nav.expand();
        assert_eq!(r.text(), Some("A2, 2 of 2"));
        assert_eq!(nav.current_id(), Some("a2"));
    }

    #[test]
    fn expand_again_without_memory_goes_to_first_child() {
        let mut nav = nav();
        nav.expand();
        let r = nav.expand();
        assert_eq!(r.text(), Some("A1, 1 of 2"));
    }

    #[test]
    fn collapse_on_collapsed_category_moves_to_parent() {
        let mut nav: TreeNavigator<u32> = TreeNavigator::new(vec![
            TreeNode::category("a", "A")
                .child(TreeNode::category("b", "B").child(TreeNode::leaf("c", "C")))
                .child(TreeNode::leaf("d", "D")),
        ])
        .unwrap();
        nav.expand();
        let r = nav.select_next();
        assert_eq!(r.text(), Some("B, collapsed, 1 of 2"));

        let r = nav.collapse();
        assert_eq!(r.text(), Some("A, expanded, 1 of 1"));
        assert_eq!(nav.current_id(), Some("a"));
        assert_eq!(nav.remembered_child("a"), Some("b"));
        assert_eq!(visible(&nav), vec!["A", "B", "D"]);

        let r = nav.expand();
        assert_eq!(r.text(), Some("B, collapsed, 1 of 2"));
        assert!(!nav.expanded_ids().contains("b"));
    }

    #[test]
    fn expand_again_after_remembered_child_removed_goes_to_first_child() {
        let mut nav = nav();
        nav.expand();
        nav.select_next();
        nav.select_next();
        nav.collapse();
        assert_eq!(nav.remembered_child("a"), Some("a2"));

        nav.refresh(vec![
            TreeNode::category("a", "A")
                .child(TreeNode::leaf("a1", "A1"))
                .child(TreeNode::leaf("a3", "A3")),
            TreeNode::category("b", "B"),
        ])
        .unwrap();
        assert_eq!(nav.current_id(), Some("a"));
        assert_eq!(nav.remembered_child("a"), None);

        let r = nav.expand();
        assert_eq!(r.text(), Some("A1, 1 of 2"));
    }

    #[test]
    fn expand_rejects_leaf_and_empty_category() {
        let mut nav = nav();
        nav.expand();
        nav.select_next();
        let r = nav.expand();
        assert!(r.is_rejected());
        assert_eq!(r.text(), None);

        nav.jump_to_last();
        assert_eq!(nav.current_id(), Some("b"));
        let r = nav.expand();
        assert!(r.is_rejected());
        assert!(!nav.expanded_ids().contains("b"));
    }

    #[test]
    fn collapse_expanded_category_in_place() {
        let mut nav = nav();
        nav.expand();
        let r = nav.collapse();
        assert_eq!(r.text(), Some("A, collapsed, 1 of 2"));
        assert_eq!(visible(&nav), vec!["A", "B"]);
        assert!(nav.expanded_ids().is_empty());
    }

    #[test]
    fn collapse_at_top_level_rejects() {
        let mut nav = nav();
        let r = nav.collapse();
        assert!(r.is_rejected());
        assert_eq!(r.text(), Some(TOP_LEVEL_MESSAGE));
        assert_eq!(nav.current_index(), 0);
    }

    #[test]
    fn next_and_previous_wrap() {
        let mut nav = nav();
        let r = nav.select_previous();
        assert_eq!(r.text(), Some("B, empty, 2 of 2"));
        let r = nav.select_next();
        assert_eq!(r.text(), Some("A, collapsed, 1 of 2"));
    }

    #[test]
    fn no_wrap_rejects_at_edges() {
        let mut nav = nav().with_options(TreeNavOptions::default().with_wrap(false));
        assert!(nav.select_previous().is_rejected());
        nav.jump_to_last();
        assert!(nav.select_next().is_rejected());
        assert_eq!(nav.current_index(), 1);
    }

    #[test]
    fn announce_level_appends_depth() {
        let mut nav = nav().with_options(TreeNavOptions::default().with_announce_level(true));
        nav.expand();
        let r = nav.select_next();
        assert_eq!(r.text(), Some("A1, 1 of 2, level 2"));
    }

    #[test]
    fn expand_all_siblings_messages() {
        let mut nav = nav();
        let r = nav.expand_all_siblings();
        assert_eq!(r.text(), Some("Expanded 1 category"));
        assert!(!r.is_rejected());
        assert_eq!(nav.current_id(), Some("a"));

        let r = nav.expand_all_siblings();
        assert_eq!(r.text(), Some("All already expanded"));
        assert!(r.is_rejected());

        nav.select_next();
        let r = nav.expand_all_siblings();
        assert_eq!(r.text(), Some("No categories to expand"));
    }

    #[test]
    fn expand_all_siblings_keeps_cursor_on_same_node() {
        let mut nav: TreeNavigator<()> = TreeNavigator::new(vec![
            TreeNode::category("x", "X").child(TreeNode::leaf("x1", "X1")),
            TreeNode::category("y", "Y").child(TreeNode::leaf("y1", "Y1")),
            TreeNode::category("z", "Z").child(TreeNode::leaf("z1", "Z1")),
        ])
        .unwrap();
        nav.jump_to_last();
        let r = nav.expand_all_siblings();
        assert_eq!(r.text(), Some("Expanded 3 categories"));
        assert_eq!(nav.current_id(), Some("z"));
        assert_eq!(nav.current_index(), 4);
    }

    #[test]
    fn activate_toggles_category_and_returns_leaf_id() {
        let mut nav = nav();
        let r = nav.activate();
        assert_eq!(r.text(), Some("A, expanded, 1 of 2"));
        let r = nav.activate();
        assert_eq!(r.text(), Some("A, collapsed, 1 of 2"));

        nav.expand();
        nav.select_next();
        let r = nav.activate();
        assert_eq!(r.action, Some(TreeAction::Activate("a1".into())));
        assert_eq!(nav.current_node().and_then(|n| n.payload()), Some(&1));
    }

    #[test]
    fn activate_info_and_empty_category_reject() {
        let mut nav: TreeNavigator<()> = TreeNavigator::new(vec![
            TreeNode::info("i", "Power: 400 W"),
            TreeNode::category("e", "Empty"),
        ])
        .unwrap();
        assert!(nav.activate().is_rejected());
        nav.select_next();
        assert!(nav.activate().is_rejected());
    }

    #[test]
    fn typeahead_flow_with_rejection_and_backspace() {
        let mut nav = nav();
        nav.expand();

        let r = nav.type_char('A');
        assert_eq!(r.text(), Some("A, expanded, 1 of 2, match 1 of 3 for 'a'"));
        let r = nav.type_char('2');
        assert_eq!(r.text(), Some("A2, 2 of 2, match 1 of 1 for 'a2'"));

        let r = nav.type_char('x');
        assert!(r.is_rejected());
        assert_eq!(r.text(), Some("No matches for 'a2x'"));
        assert_eq!(nav.search().query(), "a2");
        assert_eq!(nav.current_id(), Some("a2"));

        let r = nav.backspace();
        assert_eq!(r.text(), Some("A2, 2 of 2, match 3 of 3 for 'a'"));

        let r = nav.select_next();
        assert_eq!(r.text(), Some("A, expanded, 1 of 2, match 1 of 3 for 'a'"));
        let r = nav.select_previous();
        assert_eq!(r.text(), Some("A2, 2 of 2, match 3 of 3 for 'a'"));

        let r = nav.backspace();
        assert_eq!(r.text(), Some("Search cleared, A2, 2 of 2"));
        assert!(!nav.search().is_active());
    }

    #[test]
    fn escape_clears_search_then_exits() {
        let mut nav = nav();
        nav.type_char('b');
        assert_eq!(nav.current_id(), Some("b"));
        let r = nav.escape();
        assert_eq!(r.text(), Some("Search cleared, B, empty, 2 of 2"));
        assert_eq!(r.action, None);
        let r = nav.escape();
        assert_eq!(r.action, Some(TreeAction::Exit));
    }

    #[test]
    fn structural_moves_clear_search() {
        let mut nav = nav();
        nav.type_char('a');
        nav.expand();
        assert!(!nav.search().is_active());
        nav.type_char('a');
        nav.jump_to_last();
        assert!(!nav.search().is_active());
    }

    #[test]
    fn empty_navigator_is_inert() {
        let mut nav: TreeNavigator<()> = TreeNavigator::new(Vec::new()).unwrap();
        assert!(nav.is_empty());
        assert!(nav.select_next().is_empty());
        assert!(nav.select_previous().is_empty());
        assert!(nav.expand().is_empty());
        assert!(nav.collapse().is_empty());
        assert!(nav.activate().is_empty());
        assert!(nav.expand_all_siblings().is_empty());
        assert!(nav.jump_to_first().is_empty());
        assert!(nav.type_char('a').is_empty());
        assert!(nav.announce_current().is_none());
    }

    #[test]
    fn handle_key_bindings() {
        let mut nav = nav();
        let r = nav.handle_key(&key(KeyCode::Right)).unwrap();
        assert_eq!(r.text(), Some("A, expanded, 1 of 2"));
        let r = nav.handle_key(&key(KeyCode::Down)).unwrap();
        assert_eq!(r.text(), Some("A1, 1 of 2"));
        let r = nav.handle_key(&key(KeyCode::Left)).unwrap();
        assert_eq!(r.text(), Some("A, expanded, 1 of 2"));
        let r = nav.handle_key(&key(KeyCode::End)).unwrap();
        assert_eq!(r.text(), Some("B, empty, 2 of 2"));
        let r = nav.handle_key(&key(KeyCode::Home)).unwrap();
        assert_eq!(r.text(), Some("A, expanded, 1 of 2"));
        let r = nav.handle_key(&key(KeyCode::Char('b'))).unwrap();
        assert_eq!(r.text(), Some("B, empty, 2 of 2, match 1 of 1 for 'b'"));
        let r = nav.handle_key(&key(KeyCode::Escape)).unwrap();
        assert_eq!(r.text(), Some("Search cleared, B, empty, 2 of 2"));
    }

    #[test]
    fn handle_key_ignores_unbound_input() {
        let mut nav = nav();
        assert!(nav.handle_key(&key(KeyCode::Backspace)).is_none());
        assert!(nav.handle_key(&key(KeyCode::Tab)).is_none());
        assert!(nav.handle_key(&key(KeyCode::F(2))).is_none());
        let release = key(KeyCode::Down).with_kind(KeyEventKind::Release);
        assert!(nav.handle_key(&release).is_none());
        let chord = key(KeyCode::Char('a')).with_modifiers(Modifiers::CTRL);
        assert!(nav.handle_key(&chord).is_none());
        assert_eq!(nav.current_index(), 0);
    }

    #[test]
    fn handle_key_accepts_repeat() {
        let mut nav = nav();
        let repeat = key(KeyCode::Down).with_kind(KeyEventKind::Repeat);
        assert!(nav.handle_key(&repeat).is_some());
        assert_eq!(nav.current_index(), 1);
    }

    #[test]
    fn state_round_trip() {
        let mut nav = nav().with_persistence_id("architect");
        nav.expand();
        nav.select_next();
        nav.select_next();
        nav.collapse();
        nav.expand();
        let saved = nav.save_state();
        assert_eq!(saved.selected_id(), Some("a2"));
        assert_eq!(saved.selection_trail, vec!["a".to_string(), "a2".to_string()]);

        let mut fresh = TreeNavigator::new(scenario_roots()).unwrap();
        fresh.restore_state(saved);
        assert_eq!(fresh.current_id(), Some("a2"));
        assert_eq!(fresh.remembered_child("a"), Some("a2"));
        assert_eq!(visible(&fresh), visible(&nav));
        assert_eq!(nav.state_key().canonical(), "TreeNavigator::architect");
    }

    #[test]
    fn refresh_keeps_selection_by_id() {
        let mut nav = nav();
        nav.expand();
        nav.jump_to_last();
        nav.refresh(vec![
            TreeNode::category("new", "New"),
            TreeNode::category("a", "A")
                .child(TreeNode::leaf("a1", "A1"))
                .child(TreeNode::leaf("a2", "A2")),
            TreeNode::category("b", "B"),
        ])
        .unwrap();
        assert_eq!(nav.current_id(), Some("b"));
        assert_eq!(nav.describe(nav.current_index()).unwrap(), "B, empty, 3 of 3");
        assert!(nav.expanded_ids().contains("a"));
    }

    #[test]
    fn refresh_falls_back_to_parent_when_selection_removed() {
        let mut nav = nav();
        nav.expand();
        nav.select_next();
        nav.select_next();
        assert_eq!(nav.current_id(), Some("a2"));
        nav.refresh(vec![
            TreeNode::category("a", "A").child(TreeNode::leaf("a1", "A1")),
            TreeNode::category("b", "B"),
        ])
        .unwrap();
        assert_eq!(nav.current_id(), Some("a"));
    }

    #[test]
    fn refresh_drops_ids_that_are_no_longer_categories() {
        let mut nav = nav();
        nav.expand();
        nav.refresh(vec![TreeNode::leaf("a", "A"), TreeNode::leaf("b", "B")])
            .unwrap();
        assert!(nav.expanded_ids().is_empty());
        assert_eq!(nav.len(), 2);
        assert_eq!(nav.current_id(), Some("a"));
    }

    #[test]
    fn refresh_to_empty_and_invalid_forest() {
        let mut nav = nav();
        let err = nav
            .refresh(vec![TreeNode::leaf("x", "X"), TreeNode::leaf("x", "Y")])
            .unwrap_err();
        assert_eq!(err, ForestError::DuplicateId("x".into()));
        assert_eq!(nav.len(), 2);

        nav.refresh(Vec::new()).unwrap();
        assert!(nav.is_empty());
        assert!(nav.current_node().is_none());
    }

    #[test]
    fn focus_id_moves_only_to_visible_nodes() {
        let mut nav = nav();
        assert!(!nav.focus_id("a2"));
        nav.expand();
        assert!(nav.focus_id("a2"));
        assert_eq!(nav.current_index(), 2);
        assert!(!nav.focus_id("missing"));
    }
}
