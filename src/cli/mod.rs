//! CLI commands for the `dashboard` binary.

pub mod commands;

pub use commands::{add_user, generate, serve};
