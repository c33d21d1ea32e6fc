//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for chat replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Reply text followed by a product table
    Text,
    /// The full response as JSON
    Json,
}

/// CLI arguments for shopwise
#[derive(Parser, Debug)]
#[command(name = "shopwise")]
#[command(author, version, about = "Conversational product search with LLM tool calling")]
#[command(long_about = r#"
Shopwise answers shopping questions by letting a language model call product
tools (search, filter, compare, details, price analytics) and collecting the
products those tools return.

Configuration files are loaded from (in priority order):
1. SHOPWISE_* environment variables (e.g. SHOPWISE_LLM__MODEL)
2. --config <path>      Explicit config file
3. ./shopwise.toml      Project-level config
4. ~/.config/shopwise/config.toml   Global config

The API key is read from [llm] api_key or the GEMINI_API_KEY variable.

Example:
  shopwise "Find me noise cancelling headphones under $400"
  shopwise --chat --conversation 42
  shopwise --catalog products.json --metrics "Compare the iPhone 15 and Pixel 8"
"#)]
pub struct Cli {
    /// The message to send (not required in chat mode)
    pub message: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Conversation id; history is kept per conversation
    ///
    /// History lives in process memory, so it only carries across messages
    /// of one `--chat` session. A one-shot run starts with empty history.
    #[arg(long, value_name = "ID", default_value_t = 1)]
    pub conversation: i64,

    /// Send the message without loading or saving history
    #[arg(long, conflicts_with = "chat")]
    pub stateless: bool,

    /// User id passed to the product tools
    #[arg(short, long, value_name = "ID", default_value = "demo")]
    pub user: String,

    /// JSON product catalog to load instead of the built-in sample
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Print per-tool metrics after the run
    #[arg(long)]
    pub metrics: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["shopwise", "find a kettle"]).unwrap();
        assert_eq!(cli.message.as_deref(), Some("find a kettle"));
        assert_eq!(cli.conversation, 1);
        assert_eq!(cli.user, "demo");
        assert_eq!(cli.output, OutputFormat::Text);
        assert!(!cli.chat);
    }

    #[test]
    fn test_stateless_conflicts_with_chat() {
        assert!(Cli::try_parse_from(["shopwise", "--chat", "--stateless"]).is_err());
    }

    #[test]
    fn test_conversation_help_mentions_chat_scope() {
        let command = Cli::command();
        let arg = command
            .get_arguments()
            .find(|a| a.get_id() == "conversation")
            .unwrap();
        let help = arg.get_long_help().unwrap().to_string();
        assert!(help.contains("--chat"));
        assert!(help.contains("one-shot"));
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["shopwise", "-vv", "--metrics", "hi"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.metrics);
    }
}
