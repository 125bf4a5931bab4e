//! Domain layer: entities and the tree engine
//!
//! This layer is independent of external concerns (no I/O, no store, no CLI).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod modes;
pub mod tree;

pub use arena::{NodeData, TreeArena};
pub use builder::{BuiltTree, TreeBuilder, DEFAULT_SEPARATOR};
pub use entities::*;
pub use error::DomainError;
pub use modes::{check_mode_compatibility, ModeCompatibility};
pub use tree::{
    build_tree, checked_variable_ids, filter_tree, find_node, leaf_count, toggle_node_collapsed,
    update_node_checked, Forest, NodeKind, TreeNode,
};
