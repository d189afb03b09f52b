//! Library side of the `vidkit` binary: argument definitions, command
//! implementations and terminal output helpers.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::{Cli, Commands, CompressArgs, InfoArgs};
pub use commands::{run_compress, run_info, run_options};
pub use error::CliResult;
