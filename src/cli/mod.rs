//! CLI argument parsing and command handling.

mod args;
pub mod species;

pub use args::{ClassifyArgs, Cli, Command, ConfigAction, GlobalArgs};
