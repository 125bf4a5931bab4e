use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::tree::{Forest, NodeKind, TreeNode};

/// Data payload for a node under construction.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Full path from the root
    pub path: String,
    /// Last path segment
    pub segment: String,
    /// Bound variable, None for groups
    pub variable_id: Option<String>,
}

/// Node in the arena-based build structure.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes, in insertion order
    pub children: Vec<Index>,
    /// Depth, 0 for roots
    pub level: usize,
}

impl ArenaNode {
    pub fn kind(&self) -> NodeKind {
        if self.data.variable_id.is_some() {
            NodeKind::Variable
        } else {
            NodeKind::Group
        }
    }
}

/// Arena holding a whole forest while it is being built.
///
/// Nodes reference each other by generational index, so appending a child
/// never has to walk or re-key anything. Once complete the arena is
/// materialised into an owned [`Forest`].
#[derive(Debug, Default)]
pub struct TreeArena {
    arena: Arena<ArenaNode>,
    /// Root nodes in insertion order
    roots: Vec<Index>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let level = parent
            .and_then(|p| self.arena.get(p))
            .map(|p| p.level + 1)
            .unwrap_or(0);
        let node_idx = self.arena.insert(ArenaNode {
            data,
            parent,
            children: Vec::new(),
            level,
        });

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => parent.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Convert into the owned, nested representation.
    #[instrument(level = "debug", skip(self))]
    pub fn into_forest(self) -> Forest {
        self.roots
            .iter()
            .filter_map(|&root| self.materialize(root))
            .collect()
    }

    fn materialize(&self, idx: Index) -> Option<TreeNode> {
        let node = self.get_node(idx)?;
        let children = node
            .children
            .iter()
            .filter_map(|&child| self.materialize(child))
            .collect();
        let mut out = match &node.data.variable_id {
            Some(variable_id) => TreeNode::variable(
                node.data.path.clone(),
                node.data.segment.clone(),
                node.level,
                variable_id.clone(),
            ),
            None => TreeNode::group(
                node.data.path.clone(),
                node.data.segment.clone(),
                node.level,
            ),
        };
        out.children = children;
        Some(out)
    }
}
