//! Tree builder turning flat variable names into a forest.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::{NodeData, TreeArena};
use crate::domain::entities::VariableRecord;
use crate::domain::error::DomainError;
use crate::domain::tree::{Forest, NodeKind};

/// Default name segment separator.
pub const DEFAULT_SEPARATOR: &str = "/";

/// Result of a build: the forest plus every variable that was left out.
#[derive(Debug, Clone, Default)]
pub struct BuiltTree {
    pub forest: Forest,
    pub skipped: Vec<DomainError>,
}

/// Constructs the variable tree from slash-segmented names.
///
/// Each variable contributes one node per name segment; shared prefixes are
/// created once. Lookups go through a single index keyed by
/// (parent node, segment), so a path resolves to exactly one arena node.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    separator: String,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

type PathIndex = HashMap<(Option<Index>, String), Index>;

impl TreeBuilder {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    /// Build the forest. Variables with unusable names or conflicting paths
    /// are skipped and reported; the first-seen variable for a path wins.
    #[instrument(level = "debug", skip(self, variables), fields(count = variables.len()))]
    pub fn build(&self, variables: &[VariableRecord]) -> BuiltTree {
        let mut arena = TreeArena::new();
        let mut index = PathIndex::new();
        let mut skipped = Vec::new();

        for variable in variables {
            if let Err(e) = self.insert(&mut arena, &mut index, variable) {
                warn!("skipping variable: {}", e);
                skipped.push(e);
            }
        }

        debug!(
            "build: {} node(s), {} skipped",
            arena.len(),
            skipped.len()
        );
        BuiltTree {
            forest: arena.into_forest(),
            skipped,
        }
    }

    fn segments<'a>(&self, variable: &'a VariableRecord) -> Result<Vec<&'a str>, DomainError> {
        let invalid = |reason: String| DomainError::InvalidName {
            variable_id: variable.id.clone(),
            name: variable.name.clone(),
            reason,
        };

        if variable.name.trim().is_empty() {
            return Err(invalid("empty name".to_string()));
        }
        let segments: Vec<&str> = variable.name.split(self.separator.as_str()).collect();
        if let Some(pos) = segments.iter().position(|s| s.trim().is_empty()) {
            return Err(invalid(format!("empty segment at position {}", pos)));
        }
        Ok(segments)
    }

    fn insert(
        &self,
        arena: &mut TreeArena,
        index: &mut PathIndex,
        variable: &VariableRecord,
    ) -> Result<(), DomainError> {
        let segments = self.segments(variable)?;
        let last = segments.len() - 1;

        // Walk the existing prefix first so a rejected variable leaves no
        // orphan groups behind.
        let mut cursor: Option<Index> = None;
        let mut depth = 0;
        for (i, segment) in segments.iter().enumerate() {
            let Some(&idx) = index.get(&(cursor, segment.to_string())) else {
                break;
            };
            let Some(node) = arena.get_node(idx) else {
                break;
            };
            let is_variable = node.kind() == NodeKind::Variable;
            if i == last && is_variable {
                return Err(DomainError::DuplicatePath {
                    variable_id: variable.id.clone(),
                    path: node.data.path.clone(),
                });
            }
            if i == last || is_variable {
                return Err(DomainError::PathConflict {
                    variable_id: variable.id.clone(),
                    path: variable.name.clone(),
                    existing: node.data.path.clone(),
                });
            }
            cursor = Some(idx);
            depth = i + 1;
        }

        let mut path = cursor
            .and_then(|idx| arena.get_node(idx))
            .map(|n| n.data.path.clone())
            .unwrap_or_default();
        for (i, segment) in segments.iter().enumerate().skip(depth) {
            if i > 0 {
                path.push_str(&self.separator);
            }
            path.push_str(segment);
            let data = NodeData {
                path: path.clone(),
                segment: segment.to_string(),
                variable_id: (i == last).then(|| variable.id.clone()),
            };
            let idx = arena.insert_node(data, cursor);
            index.insert((cursor, segment.to_string()), idx);
            cursor = Some(idx);
        }
        Ok(())
    }
}
