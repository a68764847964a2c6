//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use parley_domain::ConversationId;
use std::path::PathBuf;

/// CLI arguments for parley
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(author, version, about = "Route each message to the right model and tools")]
#[command(long_about = r#"
parley sends each message through two fast classifiers before answering:
1. Model routing: pick the execution model best suited to the message
2. Tool routing: pick which tools that model may call
The chosen model then answers, calling tools as needed, and the conversation
is saved so later messages continue it.

Configuration files are loaded from (in priority order):
1. PARLEY_* environment variables (nested keys split on "__")
2. --config <path>     Explicit config file
3. ./parley.toml       Project-level config
4. ~/.config/parley/config.toml   Global config

Example:
  parley send "What is 17 * 23?"
  parley send --conversation <UUID> "And divided by 4?"
  parley send --model openai:gpt-5 --no-route "Summarize this thread"
  parley show <UUID>
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Also write logs to daily files in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_file: Option<PathBuf>,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a message, starting or continuing a conversation
    Send(SendArgs),

    /// Show a stored conversation
    Show {
        #[arg(value_name = "UUID")]
        id: ConversationId,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List allow-listed models
    Models {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark a conversation archived
    Archive {
        #[arg(value_name = "UUID")]
        id: ConversationId,
    },

    /// Mark a conversation deleted
    Delete {
        #[arg(value_name = "UUID")]
        id: ConversationId,
    },
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Message text
    pub text: String,

    /// Continue this conversation (a new one is started when unknown)
    #[arg(short, long, value_name = "UUID")]
    pub conversation: Option<ConversationId>,

    /// Execution model as vendor:model; skips model routing
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Skip both classifiers and use the default (or --model) with every tool
    #[arg(long)]
    pub no_route: bool,

    /// Sampling temperature for the execution model
    #[arg(long, value_name = "FLOAT")]
    pub temperature: Option<f32>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}
