//! Shared domain model for the game-day dashboard.
//!
//! Holds the canonical game-record types, filter selections, the error type,
//! settings, time helpers and display formatting used by every other crate.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
