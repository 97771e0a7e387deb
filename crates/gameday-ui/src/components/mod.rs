//! Reusable line-level widgets.

pub mod header;
pub mod win_bar;
