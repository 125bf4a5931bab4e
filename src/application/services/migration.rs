//! Cross-collection variable migration
//!
//! Moves variables from one collection to another, one at a time:
//!
//! ```text
//! resolve ──► modes compatible? ──► name free in target? ──► create copy
//!                                                               │
//!                         delete original ◄── copy mode values ◄┘
//! ```
//!
//! A failure after the copy exists removes the copy again, so an item
//! either moves completely or leaves the store as it was. Only if that
//! cleanup fails too are both variables left behind, reported as
//! [`MigrationError::Inconsistent`].

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::application::MigrationError;
use crate::domain::{check_mode_compatibility, Collection, ModeCompatibility, VariableRecord};
use crate::infrastructure::traits::VariableStore;
use crate::infrastructure::StoreError;

/// A completed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedVariable {
    pub source_id: String,
    pub new_id: String,
    pub name: String,
    /// Source modes whose values had no target mode and were dropped
    pub dropped_modes: Vec<String>,
}

/// Successful item of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovedItem {
    pub id: String,
    pub name: String,
}

/// Failed item of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub id: String,
    pub reason: MigrationError,
}

/// Outcome of a batch; together the two lists hold every requested id once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: Vec<MovedItem>,
    pub failed: Vec<FailedItem>,
}

/// Variable migration service.
pub struct MigrationService {
    store: Arc<dyn VariableStore>,
}

impl MigrationService {
    /// Create a new migration service.
    pub fn new(store: Arc<dyn VariableStore>) -> Self {
        Self { store }
    }

    async fn resolve_collection(&self, id: &str) -> Result<Collection, MigrationError> {
        self.store
            .collection(id)
            .await?
            .ok_or_else(|| MigrationError::NotFound(format!("collection {}", id)))
    }

    /// Whether any current member of `collection` is named `name`.
    async fn name_taken(&self, collection: &Collection, name: &str) -> Result<bool, MigrationError> {
        for id in &collection.variable_ids {
            if let Some(existing) = self.store.variable(id).await? {
                if existing.name == name {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Move one variable into the target collection.
    #[instrument(skip(self))]
    pub async fn move_variable(
        &self,
        variable_id: &str,
        source_collection_id: &str,
        target_collection_id: &str,
    ) -> Result<MovedVariable, MigrationError> {
        let variable = self
            .store
            .variable(variable_id)
            .await?
            .ok_or_else(|| MigrationError::NotFound(format!("variable {}", variable_id)))?;
        let source = self.resolve_collection(source_collection_id).await?;
        let target = self.resolve_collection(target_collection_id).await?;
        if variable.collection_id != source.id {
            return Err(MigrationError::NotFound(format!(
                "variable '{}' in collection '{}'",
                variable.name, source.name
            )));
        }

        let mode_mapping = match check_mode_compatibility(&source, &target) {
            ModeCompatibility::Compatible { mode_mapping } => mode_mapping,
            ModeCompatibility::Incompatible { reason } => {
                return Err(MigrationError::IncompatibleModes(reason))
            }
        };

        if self.name_taken(&target, &variable.name).await? {
            return Err(MigrationError::DuplicateName(variable.name.clone()));
        }

        let copy = self
            .store
            .create_variable(&variable.name, &target.id, variable.resolved_type)
            .await?;
        debug!("move: created {} in '{}'", copy.id, target.name);

        let mut dropped_modes = Vec::new();
        for (mode_id, value) in &variable.values_by_mode {
            let Some(target_mode) = mode_mapping.get(mode_id) else {
                warn!(
                    "move: dropping value of '{}' for unmapped mode {}",
                    variable.name, mode_id
                );
                dropped_modes.push(mode_id.clone());
                continue;
            };
            if let Err(e) = self
                .store
                .set_value_for_mode(&copy.id, target_mode, value.clone())
                .await
            {
                return Err(self.roll_back(&variable, &copy.id, e).await);
            }
        }

        if let Err(e) = self.store.remove_variable(&variable.id).await {
            return Err(self.roll_back(&variable, &copy.id, e).await);
        }

        info!(
            "moved '{}' from '{}' to '{}'",
            variable.name, source.name, target.name
        );
        Ok(MovedVariable {
            source_id: variable.id,
            new_id: copy.id,
            name: variable.name,
            dropped_modes,
        })
    }

    /// Remove a half-made copy after `cause` interrupted a move.
    async fn roll_back(
        &self,
        original: &VariableRecord,
        copy_id: &str,
        cause: StoreError,
    ) -> MigrationError {
        warn!("move: '{}' failed ({}), removing copy {}", original.name, cause, copy_id);
        match self.store.remove_variable(copy_id).await {
            Ok(()) => MigrationError::Store(cause),
            Err(e) => MigrationError::Inconsistent {
                original_id: original.id.clone(),
                copy_id: copy_id.to_string(),
                detail: format!("{}; rollback failed: {}", cause, e),
            },
        }
    }

    /// Move several variables, strictly one after another.
    ///
    /// Each move sees the effect of the ones before it. A failing item is
    /// recorded and the batch carries on; repeated ids are attempted once.
    #[instrument(skip(self, variable_ids), fields(count = variable_ids.len()))]
    pub async fn batch_move(
        &self,
        variable_ids: &[String],
        source_collection_id: &str,
        target_collection_id: &str,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        let mut seen = HashSet::new();

        for id in variable_ids {
            if !seen.insert(id.as_str()) {
                debug!("batch_move: skipping repeated id {}", id);
                continue;
            }
            match self
                .move_variable(id, source_collection_id, target_collection_id)
                .await
            {
                Ok(moved) => report.succeeded.push(MovedItem {
                    id: id.clone(),
                    name: moved.name,
                }),
                Err(reason) => {
                    warn!("batch_move: {} failed: {}", id, reason);
                    report.failed.push(FailedItem {
                        id: id.clone(),
                        reason,
                    });
                }
            }
        }

        info!(
            "batch_move: {} moved, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );
        report
    }
}
