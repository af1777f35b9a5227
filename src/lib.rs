//! skycast library
//!
//! Weather dashboard state, provider client and rendering, exposed for the
//! binary and for integration tests.

pub mod app;
pub mod cli;
pub mod data;
pub mod fetch;
pub mod location;
pub mod logging;
pub mod ui;
