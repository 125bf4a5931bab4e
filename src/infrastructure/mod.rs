//! Infrastructure layer: store implementations and DI container
//!
//! This layer implements the store boundary trait and wires up services.

pub mod di;
pub mod error;
pub mod traits;

pub use error::{InfraError, InfraResult, StoreError, StoreResult};
