//! vartree: hierarchical views over design-token variables, and safe moves
//! of those variables between collections.
//!
//! Layers:
//! - `domain`: entities, tree engine, mode compatibility
//! - `application`: catalog and migration services, intent protocol, session
//! - `infrastructure`: store boundary, snapshot persistence, wiring
//! - `cli`: argument parsing, rendering, command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
