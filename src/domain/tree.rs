//! Tree view over variable names and its pure transformations.
//!
//! A forest is the ordered list of root nodes. Every function here takes the
//! forest by reference and hands back a new one; the input is never mutated,
//! so callers can keep a base tree and derive views from it repeatedly.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::builder::TreeBuilder;
use crate::domain::entities::VariableRecord;

/// Ordered sequence of root-level nodes.
pub type Forest = Vec<TreeNode>;

/// Whether a node is an intermediate name segment or a bound variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Group,
    Variable,
}

/// Node of the variable tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Full path from the root, doubles as identity
    pub id: String,
    /// Last path segment
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Depth, 0 for roots
    pub level: usize,
    pub collapsed: bool,
    pub checked: bool,
    pub indeterminate: bool,
    #[serde(default)]
    pub children: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_id: Option<String>,
}

impl TreeNode {
    pub fn group(id: impl Into<String>, name: impl Into<String>, level: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Group,
            level,
            collapsed: false,
            checked: false,
            indeterminate: false,
            children: Vec::new(),
            variable_id: None,
        }
    }

    pub fn variable(
        id: impl Into<String>,
        name: impl Into<String>,
        level: usize,
        variable_id: impl Into<String>,
    ) -> Self {
        Self {
            kind: NodeKind::Variable,
            variable_id: Some(variable_id.into()),
            ..Self::group(id, name, level)
        }
    }

    pub fn is_group(&self) -> bool {
        self.kind == NodeKind::Group
    }

    /// Sets the selection of this node and everything below it.
    fn set_checked_all(&mut self, checked: bool) {
        self.checked = checked;
        self.indeterminate = false;
        for child in &mut self.children {
            child.set_checked_all(checked);
        }
    }

    /// Recomputes a group's tri-state from its direct children.
    ///
    /// Children are assumed consistent already, so "all children checked"
    /// is the same as "all descendant leaves checked".
    fn refresh_checked(&mut self) {
        if !self.is_group() || self.children.is_empty() {
            return;
        }
        let all = self.children.iter().all(|c| c.checked);
        let any = self.children.iter().any(|c| c.checked || c.indeterminate);
        self.checked = all;
        self.indeterminate = any && !all;
    }
}

/// Build the forest for a list of variables with the default separator.
///
/// Variables with unusable names are skipped; use [`TreeBuilder`] to get
/// the diagnostics as well.
pub fn build_tree(variables: &[VariableRecord]) -> Forest {
    TreeBuilder::default().build(variables).forest
}

/// Keep the nodes whose path matches `query`, case-insensitively.
///
/// A blank query returns the input borrowed. Otherwise a leaf survives iff
/// its id contains the query and a group survives iff its id does or one of
/// its descendants survives. Surviving groups are expanded.
#[instrument(level = "debug", skip(forest))]
pub fn filter_tree<'a>(forest: &'a [TreeNode], query: &str) -> Cow<'a, [TreeNode]> {
    let needle = query.trim();
    if needle.is_empty() {
        return Cow::Borrowed(forest);
    }
    let needle = needle.to_lowercase();
    let filtered = filter_nodes(forest, &needle);
    debug!("filter_tree: {} root(s) survive", filtered.len());
    Cow::Owned(filtered)
}

fn filter_nodes(nodes: &[TreeNode], needle: &str) -> Vec<TreeNode> {
    nodes
        .iter()
        .filter_map(|node| {
            let matches = node.id.to_lowercase().contains(needle);
            if !node.is_group() {
                return matches.then(|| node.clone());
            }
            let children = filter_nodes(&node.children, needle);
            if !matches && children.is_empty() {
                return None;
            }
            Some(TreeNode {
                collapsed: false,
                children,
                ..shallow(node)
            })
        })
        .collect()
}

/// Copy of a node without its children.
fn shallow(node: &TreeNode) -> TreeNode {
    TreeNode {
        id: node.id.clone(),
        name: node.name.clone(),
        kind: node.kind,
        level: node.level,
        collapsed: node.collapsed,
        checked: node.checked,
        indeterminate: node.indeterminate,
        children: Vec::new(),
        variable_id: node.variable_id.clone(),
    }
}

/// Flip the `collapsed` flag of the node with `node_id`.
#[instrument(level = "debug", skip(forest))]
pub fn toggle_node_collapsed(forest: &[TreeNode], node_id: &str) -> Forest {
    let mut next = forest.to_vec();
    match find_node_mut(&mut next, node_id) {
        Some(node) => {
            node.collapsed = !node.collapsed;
            trace!("toggle: {} collapsed={}", node_id, node.collapsed);
        }
        None => debug!("toggle: no node {}", node_id),
    }
    next
}

/// Check or uncheck a node, propagating down to its subtree and up to
/// its ancestors.
#[instrument(level = "debug", skip(forest))]
pub fn update_node_checked(forest: &[TreeNode], node_id: &str, checked: bool) -> Forest {
    let mut next = forest.to_vec();
    if !apply_checked(&mut next, node_id, checked) {
        debug!("update_checked: no node {}", node_id);
    }
    next
}

/// Returns true if the target was found below `nodes`; ancestors on the
/// way back up are refreshed.
fn apply_checked(nodes: &mut [TreeNode], node_id: &str, checked: bool) -> bool {
    for node in nodes.iter_mut() {
        if node.id == node_id {
            node.set_checked_all(checked);
            return true;
        }
        if node.is_group() && apply_checked(&mut node.children, node_id, checked) {
            node.refresh_checked();
            return true;
        }
    }
    false
}

/// Variable ids of all checked leaves, depth-first and left to right.
pub fn checked_variable_ids(forest: &[TreeNode]) -> Vec<String> {
    let mut ids = Vec::new();
    collect_checked(forest, &mut ids);
    ids
}

fn collect_checked(nodes: &[TreeNode], ids: &mut Vec<String>) {
    for node in nodes {
        match (&node.variable_id, node.is_group()) {
            (Some(id), false) if node.checked => ids.push(id.clone()),
            _ => collect_checked(&node.children, ids),
        }
    }
}

/// Locate a node by id anywhere in the forest.
pub fn find_node<'a>(forest: &'a [TreeNode], node_id: &str) -> Option<&'a TreeNode> {
    for node in forest {
        if node.id == node_id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, node_id) {
            return Some(found);
        }
    }
    None
}

fn find_node_mut<'a>(forest: &'a mut [TreeNode], node_id: &str) -> Option<&'a mut TreeNode> {
    for node in forest.iter_mut() {
        if node.id == node_id {
            return Some(node);
        }
        if let Some(found) = find_node_mut(&mut node.children, node_id) {
            return Some(found);
        }
    }
    None
}

/// Number of variable leaves in the forest.
pub fn leaf_count(forest: &[TreeNode]) -> usize {
    forest
        .iter()
        .map(|n| {
            if n.is_group() {
                leaf_count(&n.children)
            } else {
                1
            }
        })
        .sum()
}
