//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use roundtable_domain::Mode;
use std::path::PathBuf;

/// Output format for one-shot answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Reply text only
    Reply,
    /// Reply followed by a metadata summary
    Full,
    /// The HTTP response body as JSON
    Json,
}

/// Answer mode as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Ask,
    Audit,
    Deep,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Ask => Mode::Ask,
            ModeArg::Audit => Mode::Audit,
            ModeArg::Deep => Mode::Deep,
        }
    }
}

/// CLI arguments for roundtable
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about = "Answer synthesis from a panel of specialist models")]
#[command(long_about = r#"
Roundtable sends a question to a panel of role-specialized models (solver,
critic, verifier, ...), scores and merges their answers, and replies with a
single synthesized answer and a confidence score.

Configuration files are loaded from (in priority order):
1. ROUNDTABLE_* environment variables (nested keys split by "__")
2. --config <path> or ROUNDTABLE_CONFIG
3. ./roundtable.toml or ./.roundtable.toml

Example:
  roundtable serve --bind 127.0.0.1:8787 --watch-config
  roundtable ask "How should I shard this table?" --mode audit
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", env = "ROUNDTABLE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Ignore configuration files and environment overrides
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    /// Also write logs to a daily-rotated file in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the chat API over HTTP
    Serve {
        /// Listen address (overrides [server] bind)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Reload the configuration file when it changes
        #[arg(long)]
        watch_config: bool,

        /// Poll interval for --watch-config
        #[arg(long, value_name = "MS", default_value_t = 2000)]
        watch_interval_ms: u64,
    },

    /// Answer one question and exit
    Ask {
        /// The question to answer
        message: String,

        #[arg(short, long, value_enum, default_value = "ask")]
        mode: ModeArg,

        /// Extra context sent alongside the question
        #[arg(long)]
        context: Option<String>,

        /// User id recorded with the request
        #[arg(long, default_value = "local")]
        user: String,

        #[arg(short, long, value_enum, default_value = "reply")]
        output: OutputFormat,

        /// Suppress progress indicators
        #[arg(short, long)]
        quiet: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "roundtable",
            "-vv",
            "ask",
            "What is a B-tree?",
            "--mode",
            "deep",
            "-o",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Command::Ask {
            message,
            mode,
            output,
            quiet,
            ..
        } = cli.command
        else {
            panic!("expected ask");
        };
        assert_eq!(message, "What is a B-tree?");
        assert_eq!(Mode::from(mode), Mode::Deep);
        assert_eq!(output, OutputFormat::Json);
        assert!(!quiet);
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["roundtable", "serve", "--watch-config"]).unwrap();
        let Command::Serve {
            bind,
            watch_config,
            watch_interval_ms,
        } = cli.command
        else {
            panic!("expected serve");
        };
        assert!(bind.is_none());
        assert!(!cli.no_config);
        assert!(watch_config);
        assert_eq!(watch_interval_ms, 2000);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["roundtable", "ask", "q", "--mode", "fast"]).is_err());
    }
}
