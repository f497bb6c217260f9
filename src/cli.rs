use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "shiplog",
    version,
    about = "AI-written changelog entries for merged pull requests"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a changelog entry for a merged pull request
    Entry {
        /// GitHub `pull_request` event payload
        #[arg(long, env = "GITHUB_EVENT_PATH")]
        event: Option<PathBuf>,

        /// Fetch this pull request from the API instead of reading an event (takes precedence)
        #[arg(long)]
        pr: Option<u64>,

        /// GitHub repo in owner/repo format
        #[arg(long, env = "GITHUB_REPOSITORY")]
        repo: Option<String>,

        /// GitHub REST API base URL
        #[arg(long, env = "GITHUB_API_URL")]
        api_url: Option<String>,

        /// "openai", "openrouter", or an OpenAI-compatible base URL
        #[arg(long, env = "SHIPLOG_PROVIDER")]
        provider: Option<String>,

        /// Model to use
        #[arg(long, env = "SHIPLOG_MODEL")]
        model: Option<String>,

        /// Changelog file to update
        #[arg(long)]
        changelog: Option<PathBuf>,

        /// Config file (defaults to ./shiplog.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the entry here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Generate the entry but leave the changelog untouched
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate a shiplog.toml config file in the current directory
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}
