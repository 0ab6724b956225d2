//! Command-line interface definition

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "model-arena",
    version,
    about = "Compare answers from multiple LLM providers and let an AI judge rank them"
)]
pub struct Cli {
    /// Question to fan out to the selected providers
    pub question: Option<String>,

    /// Provider to include (repeatable); defaults come from config
    #[arg(short, long = "provider", value_name = "PROVIDER")]
    pub provider: Vec<String>,

    /// Preferred judge provider
    #[arg(long, value_name = "PROVIDER")]
    pub judge: Option<String>,

    /// Skip the judging step
    #[arg(long)]
    pub no_judge: bool,

    /// Force direct mode (call providers with stored API keys)
    #[arg(long, conflicts_with = "mediated")]
    pub local: bool,

    /// Force mediated mode (fan out through the backend)
    #[arg(long)]
    pub mediated: bool,

    /// Attach an image file (mediated mode only)
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Path to a config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ignore all config files and use built-in defaults
    #[arg(long)]
    pub no_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage stored provider API keys
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },
    /// Show the backend session (credits, tier, sync preference)
    Session,
    /// Enable or disable settings sync on the backend
    Sync {
        /// "on" or "off"
        state: String,
    },
    /// Manage your nickname on the backend
    Nickname {
        #[command(subcommand)]
        action: NicknameAction,
    },
    /// Direct messages between users
    Dm {
        #[command(subcommand)]
        action: DmAction,
    },
    /// List the provider catalog
    Providers,
}

#[derive(Subcommand, Debug)]
pub enum KeysAction {
    /// Store an API key for a provider
    Set {
        provider: String,
        /// The key; read from stdin when omitted
        key: Option<String>,
    },
    /// Remove a provider's stored key
    Remove { provider: String },
    /// List providers with stored keys (keys are not printed)
    List,
}

#[derive(Subcommand, Debug)]
pub enum NicknameAction {
    /// Check whether a nickname is available
    Check { name: String },
    /// Claim a nickname for this account
    Register { name: String },
    /// Show the nickname registered for this account
    Show,
}

#[derive(Subcommand, Debug)]
pub enum DmAction {
    /// Send a message to another user by nickname
    Send { to: String, message: String },
    /// Send feedback to the support inbox
    Support { message: String },
    /// List your recent messages
    List {
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
}
