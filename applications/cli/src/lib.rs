//! clipkit command-line front end
//!
//! Thin layer over `clipkit-importer`: configuration loading, command runners and
//! JSON output. The binary in `main.rs` wires these to `clap`.

pub mod commands;
pub mod config;
pub mod error;

pub use error::{CliError, Result};
