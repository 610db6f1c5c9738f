//! `backoffice-console`: command-line front end over the back-office client core.

pub mod app;
pub mod cli;
pub mod config;

pub use app::Console;
pub use cli::{Cli, Command};
pub use config::{ConfigError, ConsoleConfig};
