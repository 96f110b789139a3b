use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::catalog::filter::StatusFilter;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "agent-catalog",
    about = "Browse a catalog of agents: filter by status, search by name, type, description or capability",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/agent-catalog/logs/agent-catalog.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to agent-catalog.yaml config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List agents as cards
    List {
        /// Catalog file or http(s) URL (defaults to the configured source)
        #[arg(long, short = 's')]
        source: Option<String>,

        /// Status filter: all, active, standby, maintenance
        #[arg(long, short = 'f', default_value = "all")]
        filter: StatusFilter,

        /// Case-insensitive search across name, type, description and capabilities
        #[arg(long, short = 'S')]
        search: Option<String>,

        /// Delay between card reveals in milliseconds (text output only)
        #[arg(long)]
        stagger_ms: Option<u64>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show every field of one agent
    Show {
        /// Agent id
        id: String,

        /// Catalog file or http(s) URL (defaults to the configured source)
        #[arg(long, short = 's')]
        source: Option<String>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Browse interactively: filter, search and select from a prompt
    Browse {
        /// Catalog file or http(s) URL (defaults to the configured source)
        #[arg(long, short = 's')]
        source: Option<String>,
    },

    /// Show catalog status: agent counts and last update
    Status {
        /// Catalog file or http(s) URL (defaults to the configured source)
        #[arg(long, short = 's')]
        source: Option<String>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (dot notation)
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_args() {
        let cli = Cli::try_parse_from([
            "agent-catalog",
            "list",
            "--filter",
            "standby",
            "--search",
            "Combat",
            "-o",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::List {
                filter, search, format, ..
            } => {
                assert_eq!(filter, StatusFilter::Standby);
                assert_eq!(search.as_deref(), Some("Combat"));
                assert_eq!(format, Some(OutputFormat::Json));
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_list_rejects_unknown_filter() {
        assert!(Cli::try_parse_from(["agent-catalog", "list", "--filter", "offline"]).is_err());
    }

    #[test]
    fn test_output_format_explicit_choice() {
        assert_eq!(OutputFormat::resolve(Some(OutputFormat::Yaml)), OutputFormat::Yaml);
    }
}
