mod changelog;
mod cli;
mod config;
mod details;
mod entry;
mod error;
mod event;
mod generate;
mod github;
mod llm;
mod prompt;
mod providers;
#[cfg(test)]
mod test_helpers;

use std::path::Path;

use clap::Parser;
use miette::IntoDiagnostic;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> miette::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Entry {
            event,
            pr,
            repo,
            api_url,
            provider,
            model,
            changelog,
            config,
            output,
            dry_run,
        } => {
            generate::run(generate::EntryOptions {
                event,
                pr,
                repo,
                api_url,
                provider,
                model,
                changelog,
                config,
                output,
                dry_run,
            })
            .await
        }
        Command::Init { force } => init(force),
    }
}

fn init(force: bool) -> miette::Result<()> {
    let path = Path::new(config::CONFIG_FILE);
    if path.exists() && !force {
        return Err(error::Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            config::CONFIG_FILE
        )))
        .into_diagnostic();
    }
    xx::file::write(path, config::Config::template()).map_err(error::Error::from)?;
    eprintln!("Created {}", config::CONFIG_FILE);
    Ok(())
}
