use std::process::ExitCode;

use anyhow::Context as _;
use pixi_ci_env::locate_pixi;
use pixi_ci_lock::{PixiLocker, lockfile_dirs, target_dir, update_dirs};
use tracing::warn;

use super::Context;
use crate::cli::LockArgs;
use crate::ui;

pub fn run(ctx: &Context, args: LockArgs) -> anyhow::Result<ExitCode> {
    let base = target_dir(&ctx.root, args.folder.as_deref());
    let dirs = lockfile_dirs(&base)?;
    if dirs.is_empty() {
        warn!(base = %base.display(), "no pixi.lock files found");
        ui::warning(format!("no pixi.lock files below {}", base.display()));
        return Ok(ExitCode::SUCCESS);
    }

    let pixi = locate_pixi(&ctx.env(), &ctx.root)?;
    let locker = PixiLocker::new(pixi).with_envs(ctx.child_envs());
    let report = update_dirs(dirs, &locker).context("failed to update lockfiles")?;

    for dir in &report.updated {
        ui::success(format!("updated {}", dir.display()));
    }
    ui::success(format!("updated {} lockfile(s)", report.updated.len()));
    Ok(ExitCode::SUCCESS)
}
