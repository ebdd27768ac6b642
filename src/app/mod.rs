// LogQuery - app/mod.rs
//
// Application layer: backend client, request lifecycle, view state and
// user intents.
// Dependencies: core, platform, util.
// Must NOT depend on: ui.

pub mod api;
pub mod batch;
pub mod controller;
pub mod export;
pub mod requests;
pub mod state;
