// LogQuery - core/mod.rs
//
// Core business logic layer: the log query view's state machines.
// Dependencies: util, serde/chrono/csv for data shapes only.
// Must NOT depend on: ui, platform, app, or perform any I/O.

pub mod dialog;
pub mod export;
pub mod fetch;
pub mod model;
pub mod query;
pub mod render;
