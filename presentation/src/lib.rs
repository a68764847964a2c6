//! Presentation layer for parley
//!
//! This crate contains the CLI definitions, output formatters and the
//! progress spinner shown while a message is in flight.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, SendArgs};
pub use output::console::ConsoleFormatter;
pub use progress::spinner::Spinner;
