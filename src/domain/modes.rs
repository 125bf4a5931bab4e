//! Mode compatibility between collections.

use std::collections::BTreeMap;

use crate::domain::entities::Collection;

/// Outcome of comparing the modes of two collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeCompatibility {
    /// Source mode id → target mode id, one entry per source mode
    Compatible { mode_mapping: BTreeMap<String, String> },
    Incompatible { reason: String },
}

impl ModeCompatibility {
    pub fn is_compatible(&self) -> bool {
        matches!(self, ModeCompatibility::Compatible { .. })
    }
}

/// Compare modes positionally: same count, same name at every position.
///
/// Names are not looked up across positions; a collection with
/// `[Dark, Light]` is not compatible with one declaring `[Light, Dark]`.
pub fn check_mode_compatibility(source: &Collection, target: &Collection) -> ModeCompatibility {
    if source.modes.len() != target.modes.len() {
        return ModeCompatibility::Incompatible {
            reason: format!(
                "'{}' has {} mode(s), '{}' has {}",
                source.name,
                source.modes.len(),
                target.name,
                target.modes.len()
            ),
        };
    }

    let mut mode_mapping = BTreeMap::new();
    for (pos, (src, tgt)) in source.modes.iter().zip(&target.modes).enumerate() {
        if src.name != tgt.name {
            return ModeCompatibility::Incompatible {
                reason: format!(
                    "mode {} is '{}' in '{}' but '{}' in '{}'",
                    pos + 1,
                    src.name,
                    source.name,
                    tgt.name,
                    target.name
                ),
            };
        }
        mode_mapping.insert(src.mode_id.clone(), tgt.mode_id.clone());
    }
    ModeCompatibility::Compatible { mode_mapping }
}
