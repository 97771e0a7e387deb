//! Terminal UI for the game-day dashboard.
//!
//! Themes, line widgets, bordered record tables, the keyboard filter
//! controls and the [`ratatui`] event loop that ties them to the reload
//! channel.

pub mod app;
pub mod components;
pub mod controls;
pub mod dashboard_view;
pub mod table_view;
pub mod themes;

pub use gameday_core as core;
