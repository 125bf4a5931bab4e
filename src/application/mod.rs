//! Application layer: services, session state and intent dispatch
//!
//! This layer orchestrates the tree engine and depends on the store boundary trait.

pub mod coordinator;
pub mod error;
pub mod protocol;
pub mod services;
pub mod session;

pub use coordinator::Coordinator;
pub use error::{ApplicationError, ApplicationResult, MigrationError};
pub use protocol::{Event, Intent};
pub use session::Session;
