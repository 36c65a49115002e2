//! CLI command handlers

pub mod commands;
pub mod prompt;

pub use commands::{import, interactive, schema, sheets};
