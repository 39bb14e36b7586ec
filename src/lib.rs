// Public module exports for the query-stash binary
pub mod cli;
pub mod config;
pub mod connectors;
pub mod error;
pub mod logging;
pub mod render;
pub mod stash;
pub mod types;
