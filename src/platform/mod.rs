// LogQuery - platform/mod.rs
//
// Platform abstraction layer: config directories, config.toml, file saving.
// Dependencies: util, directories crate.
// Must NOT depend on: core, app, ui.

pub mod config;
pub mod fs;
