//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{CatalogService, MigrationService};
use crate::application::Coordinator;
use crate::config::Settings;
use crate::domain::TreeBuilder;
use crate::infrastructure::traits::{InMemoryStore, VariableStore};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Variable store
    pub store: Arc<dyn VariableStore>,

    pub catalog: Arc<CatalogService>,
    pub migration: Arc<MigrationService>,
}

impl ServiceContainer {
    /// Create a container around the snapshot named in the settings.
    ///
    /// Returns the concrete store as well so the caller can save it back.
    pub fn load(settings: Settings) -> InfraResult<(Self, Arc<InMemoryStore>)> {
        let store = Arc::new(InMemoryStore::load(&settings.store_path)?);
        Ok((Self::with_deps(settings, store.clone()), store))
    }

    /// Create a service container with a custom store (for testing).
    pub fn with_deps(settings: Settings, store: Arc<dyn VariableStore>) -> Self {
        let settings = Arc::new(settings);
        let catalog = Arc::new(CatalogService::new(store.clone(), settings.skip_unnamed));
        let migration = Arc::new(MigrationService::new(store.clone()));

        Self {
            settings,
            store,
            catalog,
            migration,
        }
    }

    /// Coordinator over this container's services.
    pub fn coordinator(&self) -> Coordinator {
        Coordinator::new(
            self.catalog.clone(),
            self.migration.clone(),
            TreeBuilder::new(self.settings.separator.clone()),
            self.settings.default_collection.clone(),
        )
    }
}
