//! CLI argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::cli::commands;

#[derive(Parser)]
#[command(
    name = "oax",
    version,
    about = "Local SQLite cache for OpenAlex entities",
    long_about = "Fetches OpenAlex entities (authors, concepts, funders, institutions, \
                  publishers, topics) into a local SQLite cache and reconstructs their \
                  full JSON documents from the normalized tables."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Database file (defaults to the per-user cache directory)
    #[arg(long, global = true, env = "OAX_DB")]
    pub db: Option<PathBuf>,

    /// Contact e-mail sent with API requests (OpenAlex polite pool)
    #[arg(long, global = true, env = "OAX_MAILTO")]
    pub mailto: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a fresh cache database, wiping any existing one
    Init,

    /// Fetch entities from the OpenAlex API and cache them
    Fetch(commands::fetch::FetchArgs),

    /// Print cached entities as JSON
    Show(commands::show::ShowArgs),

    /// Delete a cached entity and all of its child rows
    Delete(commands::delete::DeleteArgs),

    /// Show per-kind row counts and database size
    Status,

    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}
