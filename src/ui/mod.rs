//! UI rendering module for Skycast
//!
//! This module contains the terminal dashboard, built with ratatui, and the
//! plain-text report printed by `--once`.

pub mod dashboard;
pub mod format;
pub mod report;

pub use dashboard::{go_button_area, render};
pub use report::render_report;
