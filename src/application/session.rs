//! Per-caller view state
//!
//! Holds what the presentation layer currently shows: the selected
//! collection, its variables, the full tree and the visible (possibly
//! filtered) tree. The coordinator receives it explicitly on every call.

use crate::domain::{
    filter_tree, find_node, toggle_node_collapsed, update_node_checked, CollectionSummary, Forest,
    TreeNode, VariableRecord,
};

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub collections: Vec<CollectionSummary>,
    pub current_collection_id: Option<String>,
    pub variables: Vec<VariableRecord>,
    /// Tree over all variables of the current collection
    pub tree: Forest,
    /// Tree as currently displayed
    pub view: Forest,
    pub query: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the loaded collection. Clears any search.
    pub fn load(&mut self, collection_id: &str, variables: Vec<VariableRecord>, tree: Forest) {
        self.current_collection_id = Some(collection_id.to_string());
        self.variables = variables;
        self.view = tree.clone();
        self.tree = tree;
        self.query.clear();
    }

    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
        self.view = filter_tree(&self.tree, query).into_owned();
    }

    /// Toggle a node as displayed; the full tree follows so the state
    /// survives clearing the search.
    pub fn toggle(&mut self, node_id: &str) {
        let Some(shown) = find_node(&self.view, node_id).map(|n| n.collapsed) else {
            return;
        };
        self.view = toggle_node_collapsed(&self.view, node_id);
        if find_node(&self.tree, node_id).map(|n| n.collapsed) == Some(shown) {
            self.tree = toggle_node_collapsed(&self.tree, node_id);
        }
    }

    /// Select a node in the full tree; the view mirrors the resulting
    /// tri-state, so hidden leaves still count for their ancestors.
    pub fn set_checked(&mut self, node_id: &str, checked: bool) {
        self.tree = update_node_checked(&self.tree, node_id, checked);
        mirror_selection(&mut self.view, &self.tree);
    }

    pub fn collection_name(&self, collection_id: &str) -> Option<&str> {
        self.collections
            .iter()
            .find(|c| c.id == collection_id)
            .map(|c| c.name.as_str())
    }
}

/// Copy `checked`/`indeterminate` from the full tree onto the same nodes in
/// `view`, leaving everything else (collapsed flags, pruning) alone.
fn mirror_selection(view: &mut [TreeNode], tree: &[TreeNode]) {
    for node in view.iter_mut() {
        if let Some(source) = find_node(tree, &node.id) {
            node.checked = source.checked;
            node.indeterminate = source.indeterminate;
        }
        mirror_selection(&mut node.children, tree);
    }
}
