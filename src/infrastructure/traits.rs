//! Store boundary trait and its in-memory implementation
//!
//! The variable store is owned by the host environment. The core only sees
//! it through [`VariableStore`], which lets services run against the
//! in-memory store in the CLI and in tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::{Collection, ResolvedType, VariableRecord, VariableValue};
use crate::infrastructure::error::{InfraError, InfraResult, StoreError, StoreResult};

/// Read and write surface of the external variable store.
///
/// Every call may suspend; callers await one call at a time.
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// Enumerate all collections.
    async fn collections(&self) -> StoreResult<Vec<Collection>>;

    /// Resolve a collection by id.
    async fn collection(&self, id: &str) -> StoreResult<Option<Collection>>;

    /// Resolve a variable by id.
    async fn variable(&self, id: &str) -> StoreResult<Option<VariableRecord>>;

    /// Create an empty variable in a collection.
    async fn create_variable(
        &self,
        name: &str,
        collection_id: &str,
        resolved_type: ResolvedType,
    ) -> StoreResult<VariableRecord>;

    /// Set a variable's value for one mode.
    async fn set_value_for_mode(
        &self,
        variable_id: &str,
        mode_id: &str,
        value: VariableValue,
    ) -> StoreResult<()>;

    /// Delete a variable.
    async fn remove_variable(&self, variable_id: &str) -> StoreResult<()>;
}

// ============================================================
// IN-MEMORY IMPLEMENTATION
// ============================================================

/// Serialized form of a store's content, as exported by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub variables: Vec<VariableRecord>,
}

#[derive(Debug, Default)]
struct StoreState {
    collections: Vec<Collection>,
    variables: HashMap<String, VariableRecord>,
}

impl StoreState {
    fn collection_mut(&mut self, id: &str) -> StoreResult<&mut Collection> {
        self.collections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("collection {}", id)))
    }
}

/// Store keeping everything in memory, behaving like the host store:
/// names are unique per collection, modes must belong to the variable's
/// collection and values must fit the variable's type.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let variables = snapshot
            .variables
            .into_iter()
            .map(|v| (v.id.clone(), v))
            .collect();
        Self {
            state: Mutex::new(StoreState {
                collections: snapshot.collections,
                variables,
            }),
        }
    }

    /// Load a JSON snapshot file.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> InfraResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| InfraError::io(format!("read snapshot {}", path.display()), e))?;
        let snapshot: StoreSnapshot =
            serde_json::from_str(&content).map_err(|e| InfraError::Snapshot {
                path: path.to_path_buf(),
                source: e,
            })?;
        debug!(
            "load: {} collection(s), {} variable(s)",
            snapshot.collections.len(),
            snapshot.variables.len()
        );
        Ok(Self::from_snapshot(snapshot))
    }

    /// Current content; variables follow collection member order.
    pub fn snapshot(&self) -> StoreResult<StoreSnapshot> {
        let state = self.lock()?;
        let variables = state
            .collections
            .iter()
            .flat_map(|c| c.variable_ids.iter())
            .filter_map(|id| state.variables.get(id).cloned())
            .collect();
        Ok(StoreSnapshot {
            collections: state.collections.clone(),
            variables,
        })
    }

    /// Write the current content as a JSON snapshot file.
    #[instrument(level = "debug", skip(self))]
    pub fn save(&self, path: &Path) -> InfraResult<()> {
        let snapshot = self.snapshot()?;
        let json = serde_json::to_string_pretty(&snapshot).map_err(|e| InfraError::Snapshot {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json + "\n")
            .map_err(|e| InfraError::io(format!("write snapshot {}", path.display()), e))
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("store state poisoned".to_string()))
    }
}

#[async_trait]
impl VariableStore for InMemoryStore {
    async fn collections(&self) -> StoreResult<Vec<Collection>> {
        Ok(self.lock()?.collections.clone())
    }

    async fn collection(&self, id: &str) -> StoreResult<Option<Collection>> {
        Ok(self.lock()?.collections.iter().find(|c| c.id == id).cloned())
    }

    async fn variable(&self, id: &str) -> StoreResult<Option<VariableRecord>> {
        Ok(self.lock()?.variables.get(id).cloned())
    }

    async fn create_variable(
        &self,
        name: &str,
        collection_id: &str,
        resolved_type: ResolvedType,
    ) -> StoreResult<VariableRecord> {
        let mut state = self.lock()?;
        let StoreState {
            collections,
            variables,
        } = &mut *state;
        let collection = collections
            .iter_mut()
            .find(|c| c.id == collection_id)
            .ok_or_else(|| StoreError::NotFound(format!("collection {}", collection_id)))?;

        let taken = collection
            .variable_ids
            .iter()
            .filter_map(|id| variables.get(id))
            .any(|v| v.name == name);
        if taken {
            return Err(StoreError::Rejected(format!(
                "name '{}' already exists in collection '{}'",
                name, collection.name
            )));
        }

        let record = VariableRecord {
            id: format!("VariableID:{}", Uuid::new_v4()),
            name: name.to_string(),
            resolved_type,
            collection_id: collection_id.to_string(),
            values_by_mode: Default::default(),
        };
        collection.variable_ids.push(record.id.clone());
        variables.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn set_value_for_mode(
        &self,
        variable_id: &str,
        mode_id: &str,
        value: VariableValue,
    ) -> StoreResult<()> {
        let mut state = self.lock()?;
        let collection_id = state
            .variables
            .get(variable_id)
            .map(|v| v.collection_id.clone())
            .ok_or_else(|| StoreError::NotFound(format!("variable {}", variable_id)))?;
        if !state.collection_mut(&collection_id)?.has_mode(mode_id) {
            return Err(StoreError::Rejected(format!(
                "mode {} does not belong to collection {}",
                mode_id, collection_id
            )));
        }

        let variable = state
            .variables
            .get_mut(variable_id)
            .ok_or_else(|| StoreError::NotFound(format!("variable {}", variable_id)))?;
        if !value.fits(variable.resolved_type) {
            return Err(StoreError::Rejected(format!(
                "value does not fit {} variable '{}'",
                variable.resolved_type, variable.name
            )));
        }
        variable.values_by_mode.insert(mode_id.to_string(), value);
        Ok(())
    }

    async fn remove_variable(&self, variable_id: &str) -> StoreResult<()> {
        let mut state = self.lock()?;
        let removed = state
            .variables
            .remove(variable_id)
            .ok_or_else(|| StoreError::NotFound(format!("variable {}", variable_id)))?;
        if let Ok(collection) = state.collection_mut(&removed.collection_id) {
            collection.variable_ids.retain(|id| id != variable_id);
        }
        Ok(())
    }
}
