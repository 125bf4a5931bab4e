//! Application services
//!
//! Concrete service implementations that talk to the variable store.
//! Services depend on the `VariableStore` boundary trait
//! but are themselves concrete structs, not traits.

mod catalog;
mod migration;

pub use catalog::CatalogService;
pub use migration::{BatchReport, FailedItem, MigrationService, MovedItem, MovedVariable};
