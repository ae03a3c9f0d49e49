//! dodo: a personal to-do list with a CLI and a JSON HTTP API

pub mod commands;
pub mod error;
pub mod output;
pub mod server;

pub use commands::{Command, Context};
pub use error::{CliError, CliResult};
