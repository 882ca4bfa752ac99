// CLI module

pub mod backup;
pub mod commands;
pub mod display;
pub mod migration;

pub use commands::{error_line, CliArgs, Commands, GlobalOptions};
