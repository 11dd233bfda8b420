#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::{Context, Result};

use crate::config::{self, Configuration, load_configuration, lookup_config_path};
use crate::models::ConversationId;

#[derive(Debug, Parser)]
#[command(
    version,
    about,
    long_about = r#"A terminal client for chatting with local models through the LLMLocal API

Default configuration file location looks up in the following order:
    * $XDG_CONFIG_HOME/llmlocal/config.toml
    * $HOME/.config/llmlocal/config.toml
    * $HOME/.llmlocal.toml
"#,
    disable_version_flag = true
)]
pub struct Command {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Show the version
    #[arg(short, long)]
    version: bool,

    /// Backend endpoint, overrides the configuration file
    #[arg(short, long, value_name = "URL")]
    endpoint: Option<String>,

    /// Model used for new turns, overrides the configuration file
    #[arg(short, long, value_name = "NAME")]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Commands {
    /// Start an interactive chat session (default)
    Chat,

    /// Send a single message and print the reply
    Ask {
        message: String,

        /// Continue an existing conversation
        #[arg(long, value_name = "ID")]
        conversation: Option<ConversationId>,
    },

    /// Check that the backend is reachable
    Health,

    /// List the models available on the backend
    Models,

    /// List conversations
    Conversations {
        #[arg(long, default_value_t = 0)]
        skip: usize,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the messages of a conversation
    Messages { id: ConversationId },

    /// Create an empty conversation
    New { title: Option<String> },

    /// Delete a conversation and its messages
    Delete { id: ConversationId },

    /// Manage backend settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommand>,
    },

    /// Manage the retrieval document library
    Documents {
        #[command(subcommand)]
        command: Option<DocumentsCommand>,
    },
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum SettingsCommand {
    /// List every setting with its current value
    List,

    Get { key: String },

    /// Store a value. Anything that is not valid JSON is stored as a string
    Set {
        key: String,
        value: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a stored override
    Delete { key: String },
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum DocumentsCommand {
    List,

    Delete { id: i64 },

    /// Semantic search over the indexed documents
    Search {
        query: String,

        /// Number of chunks to return
        #[arg(short = 'n', long, default_value_t = 5)]
        results: usize,

        /// Restrict the search to these file ids
        #[arg(long = "file", value_name = "ID")]
        files: Vec<i64>,
    },

    Stats,
}

impl Command {
    pub fn new() -> Command {
        Self::parse()
    }

    pub fn get_config(&self) -> Result<Configuration> {
        let config_path = self
            .config
            .as_ref()
            .map(PathBuf::from)
            .or_else(lookup_config_path);

        let mut config = match config_path {
            Some(path) => load_configuration(&path).wrap_err("loading configuration")?,
            None => Configuration::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.server.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.model {
            config.chat.default_model = model.clone();
        }
        Ok(config)
    }

    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn print_version(&self) {
        println!("{}", config::version())
    }
}
