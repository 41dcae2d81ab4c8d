//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable, colored when the terminal allows
    #[default]
    Text,
    /// One JSON document per result
    Json,
}

/// CLI arguments for llmgate
#[derive(Parser, Debug)]
#[command(name = "llmgate")]
#[command(author, version, about = "Single-shot prompts to local Ollama models")]
#[command(long_about = r#"
llmgate sends one prompt to one locally hosted model and prints the answer.

Models are listed from the Ollama server and cached briefly; a request for a
model that is not in the listing fails before anything is sent. An optional
response style appends "Give a concise answer." or "Give a detailed answer."
to the prompt.

Configuration files are loaded from (in priority order):
1. --config <path>                     Explicit config file
2. LLMGATE_* / OLLAMA_HOST             Environment
3. ./llmgate.toml                      Project-level config
4. ~/.config/llmgate/config.toml       Global config

Example:
  llmgate models
  llmgate ask -m llama3 -s concise "What is 2+2?"
  llmgate chat -m mistral:7b
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the models the backend reports
    Models {
        /// Bypass the cache and re-list now
        #[arg(long)]
        refresh: bool,
    },

    /// Send one prompt and print the answer
    Ask {
        /// Model id (defaults to request.model, then the first listed model)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,

        /// Response style: concise or detailed
        #[arg(short, long, value_name = "STYLE")]
        style: Option<String>,

        /// Seconds to wait for the answer
        #[arg(short, long, value_name = "SECS")]
        timeout: Option<u64>,

        /// The prompt text
        prompt: String,
    },

    /// Interactive loop; every line is an independent request
    Chat {
        /// Model id (defaults to request.model, then the first listed model)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,

        /// Response style: concise or detailed
        #[arg(short, long, value_name = "STYLE")]
        style: Option<String>,
    },

    /// Check that the backend answers
    Health,
}
