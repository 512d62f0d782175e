//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use encore_core::types::DEFAULT_API_URL;

use crate::commands::auth::AuthCommand;
use crate::commands::performances::PerformancesCommand;
use crate::commands::reviews::ReviewsCommand;
use crate::commands::users::UsersCommand;

/// Browse, list and review live performances.
#[derive(Parser, Debug)]
#[command(name = "encore")]
#[command(author, version = env!("ENCORE_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base URL
    #[arg(long, env = "ENCORE_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Directory holding the stored session
    #[arg(long, env = "ENCORE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign up, sign in and manage the stored session
    Auth(AuthCommand),

    /// Browse and manage performances
    Performances(PerformancesCommand),

    /// Read and write reviews
    Reviews(ReviewsCommand),

    /// User profiles and tokens
    Users(UsersCommand),
}
