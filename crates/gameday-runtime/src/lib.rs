//! Runtime layer for Gameday.
//!
//! Owns the loaded table, reloads it when the source file changes, and
//! evaluates viewer selections into dashboard views.

pub mod orchestrator;
pub mod session;
pub mod table_manager;

pub use gameday_core as core;
pub use gameday_data as data;
