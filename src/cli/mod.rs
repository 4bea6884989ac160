//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat_list;
pub mod say;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::chat_list::list_chats;
use crate::cli::say::run_say;
use crate::cli::settings::{set_config_value, unset_config_value};
use crate::core::app;
use crate::core::config::data::Config;
use crate::core::config::settings::{Settings, SettingsOverrides};
use crate::core::mode::Mode;
use crate::ui::chat_loop::run_chat;

pub const LOG_FILTER_ENV: &str = "FLAVA_LOG";

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "flava")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "A terminal chat client for the Flava AI backends")]
#[command(
    long_about = "Flava is a terminal chat client that sends each message to a retrieval (RAG) \
or multi-agent consensus backend and keeps every conversation on disk.\n\n\
Environment Variables:\n\
  FLAVA_BACKEND_ROUTE   Backend base route (defaults to http://localhost:8080/api/routes/chat/)\n\
  FLAVA_LOG             Diagnostic log filter, e.g. 'flava=debug' (defaults to warn)\n\n\
Commands inside a session:\n\
  /help             List commands\n\
  /new              Start a new chat\n\
  /chats            List saved chats\n\
  /mode <mode>      Switch between rag and consensus\n\
  /quit             Leave the session"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend mode to start in (rag or consensus)
    #[arg(short = 'm', long, global = true, value_name = "MODE")]
    pub mode: Option<Mode>,

    /// Backend base route, overriding config and environment
    #[arg(short = 'b', long, global = true, value_name = "URL")]
    pub backend: Option<String>,

    /// Directory holding saved chats
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable transcript logging to the specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive chat session (default)
    Chat,
    /// Send a single message and print the reply without saving it
    Say {
        /// The message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List saved chats
    Chats,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

impl Args {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            backend_route: self.backend.clone(),
            mode: self.mode,
            data_dir: self.data_dir.clone(),
        }
    }
}

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let overrides = args.overrides();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let config = Config::load()?;
            let settings = Settings::resolve(&config, overrides)?;
            let app = app::new_from_settings(&settings, args.log)?;
            run_chat(app).await
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            let settings = Settings::resolve(&config, overrides)?;
            run_say(&settings, prompt).await
        }
        Commands::Chats => {
            let config = Config::load()?;
            let settings = Settings::resolve(&config, overrides)?;
            list_chats(&settings)
        }
        Commands::Set { key, value } => set_config_value(key.as_deref(), &value),
        Commands::Unset { key } => unset_config_value(&key),
    }
}
