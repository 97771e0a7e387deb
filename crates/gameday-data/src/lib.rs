//! Data layer for Gameday.
//!
//! Reads the game-history CSV, normalises it into the canonical
//! [`GameTable`](gameday_core::models::GameTable) and answers the record,
//! weekday and opponent queries the dashboard displays.

pub mod aggregator;
pub mod analysis;
pub mod analyzer;
pub mod normalizer;
pub mod reader;

pub use gameday_core as core;
