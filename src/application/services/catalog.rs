//! Collection and variable catalog
//!
//! Read-only access to the store: collection summaries and the member
//! variables of one collection.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::ApplicationResult;
use crate::domain::{Collection, CollectionSummary, VariableRecord};
use crate::infrastructure::traits::VariableStore;

/// Service reading collections and variables from the store.
pub struct CatalogService {
    store: Arc<dyn VariableStore>,
    /// Drop variables with a blank name instead of passing them on
    skip_unnamed: bool,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(store: Arc<dyn VariableStore>, skip_unnamed: bool) -> Self {
        Self {
            store,
            skip_unnamed,
        }
    }

    /// Summaries of every collection, in store order.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_collections(&self) -> ApplicationResult<Vec<CollectionSummary>> {
        let collections = self.store.collections().await?;
        debug!("list_collections: {} collection(s)", collections.len());
        Ok(collections.iter().map(Collection::summary).collect())
    }

    /// Resolve one collection.
    pub async fn collection(&self, collection_id: &str) -> ApplicationResult<Option<Collection>> {
        Ok(self.store.collection(collection_id).await?)
    }

    /// Member variables of a collection, in member order.
    ///
    /// An unknown collection yields an empty list. Member references that
    /// do not resolve are skipped.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_variables(&self, collection_id: &str) -> ApplicationResult<Vec<VariableRecord>> {
        let Some(collection) = self.store.collection(collection_id).await? else {
            debug!("list_variables: unknown collection {}", collection_id);
            return Ok(Vec::new());
        };

        let mut variables = Vec::with_capacity(collection.variable_ids.len());
        for id in &collection.variable_ids {
            match self.store.variable(id).await? {
                Some(v) if self.skip_unnamed && v.name.trim().is_empty() => {
                    warn!("list_variables: skipping unnamed variable {}", id);
                }
                Some(v) => variables.push(v),
                None => warn!(
                    "list_variables: member {} of '{}' does not resolve",
                    id, collection.name
                ),
            }
        }
        debug!(
            "list_variables: {} of {} member(s) resolved",
            variables.len(),
            collection.variable_ids.len()
        );
        Ok(variables)
    }
}
