use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use crate::cli::{App, Commands};
use crate::commands::Context;

mod cli;
mod commands;
mod logging;
mod ui;

fn main() -> ExitCode {
    let app = App::parse();
    logging::init(app.verbose);

    match run(app) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ui::failure(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(app: App) -> anyhow::Result<ExitCode> {
    let ctx = Context::load(app.root)?;

    match app.cmd {
        Commands::DownloadArtifacts(args) => {
            // Every request runs in sequence, so one thread is enough.
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            runtime.block_on(commands::download::run(&ctx, args))
        }
        Commands::UpdateLockfiles(args) => commands::lockfiles::run(&ctx, args),
        Commands::BuildRepos => commands::repos::run(&ctx),
        Commands::CheckBranchOverride => commands::branch_override::run(&ctx),
        Commands::ValidateArtifacts => commands::validate::run(&ctx),
    }
}
