// LogQuery - ui/panels/mod.rs

pub mod detail;
pub mod filters;
pub mod table;
pub mod tabs;
