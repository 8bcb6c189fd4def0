use std::process::ExitCode;

use pixi_ci_env::ENV_CI_FILE;
use tracing::error;

use super::Context;
use crate::ui;

/// `.env.ci` pins PR builds for a feature branch and must be deleted before merging.
pub fn run(ctx: &Context) -> anyhow::Result<ExitCode> {
    let path = ctx.root.join(ENV_CI_FILE);
    if path.exists() {
        error!(path = %path.display(), "branch override file present");
        ui::failure(format!("{ENV_CI_FILE} must not be present on main; remove it before merging"));
        return Ok(ExitCode::FAILURE);
    }
    ui::success(format!("no {ENV_CI_FILE} override present"));
    Ok(ExitCode::SUCCESS)
}
