//! Shared library surface for the forecast server and its tests.

pub mod api;
pub mod config;
pub mod state;
