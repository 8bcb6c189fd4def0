use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context as _, anyhow};
use pixi_ci_env::EnvLookup;
use pixi_ci_platform::{CapturedOutput, Command, Git};
use tracing::{error, info, instrument, warn};

use super::Context;
use crate::ui;

const MAIN_BRANCH: &str = "main";

pub fn run(ctx: &Context) -> anyhow::Result<ExitCode> {
    let env = ctx.env();
    let repos = [("pixi", "PIXI_REPO"), ("pixi-build-backends", "BUILD_BACKENDS_REPO")]
        .into_iter()
        .map(|(name, var)| {
            env.non_empty(var)
                .map(|path| (name, PathBuf::from(path)))
                .ok_or_else(|| anyhow!("{var} environment variable is not set"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut ok = true;
    for (name, path) in repos {
        match build_repository(ctx, &path) {
            Ok(()) => ui::success(format!("built {name} in {}", path.display())),
            Err(err) => {
                error!("{err:#}");
                ui::failure(format!("{name}: {err:#}"));
                ok = false;
            }
        }
    }

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[instrument(skip(ctx, path), fields(path = %path.display()))]
fn build_repository(ctx: &Context, path: &Path) -> anyhow::Result<()> {
    let git = Git::new(path);
    git.ensure_worktree()?;

    match git.current_branch() {
        Some(branch) if branch == MAIN_BRANCH => {
            info!("pulling latest changes");
            let out = git.pull().context("git pull failed")?;
            let out = out.trim();
            if !out.is_empty() {
                info!("{out}");
            }
        }
        Some(branch) => warn!(%branch, "not on main, skipping git pull"),
        None => warn!("could not determine current branch, skipping git pull"),
    }

    info!("running pixi run build-release");
    let output = Command::new("pixi")
        .args(["run", "build-release"])
        .current_dir(path)
        .envs(ctx.child_envs())
        .capture()
        .context("failed to start pixi run build-release")?;
    if !output.success() {
        return Err(build_failed(&output));
    }
    Ok(())
}

fn build_failed(output: &CapturedOutput) -> anyhow::Error {
    let mut message = format!("pixi run build-release exited with code {:?}", output.code);
    let (stdout, stderr) = (output.stdout.trim(), output.stderr.trim());
    if !stderr.is_empty() {
        message.push_str(": ");
        message.push_str(stderr);
    }
    if !stdout.is_empty() {
        message.push_str(&format!(" (Output: {stdout})"));
    }
    anyhow!(message)
}
