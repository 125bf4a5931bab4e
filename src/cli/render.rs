//! Tree rendering for the terminal

use termtree::Tree;

use crate::domain::{leaf_count, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for TreeNode {
    fn to_tree_string(&self) -> Tree<String> {
        let mark = match (self.checked, self.indeterminate) {
            (true, _) => "[x] ",
            (false, true) => "[-] ",
            _ => "",
        };

        if !self.is_group() {
            let id = self.variable_id.as_deref().unwrap_or_default();
            return Tree::new(format!("{}{}  ({})", mark, self.name, id));
        }
        if self.collapsed {
            return Tree::new(format!(
                "{}{}/ … {} hidden",
                mark,
                self.name,
                leaf_count(&self.children)
            ));
        }
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(format!("{}{}/", mark, self.name)).with_leaves(leaves)
    }
}

/// Render a forest below a single heading node.
pub fn render_forest(title: &str, forest: &[TreeNode]) -> Tree<String> {
    Tree::new(title.to_string()).with_leaves(forest.iter().map(|n| n.to_tree_string()))
}
