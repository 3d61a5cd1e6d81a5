//! Presentation layer for roundtable
//!
//! This crate contains CLI definitions, the HTTP front end, output
//! formatters and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;
pub mod server;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, ModeArg, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ProgressReporter;
pub use server::{ServerState, auth::mask_authorization, router, serve};
