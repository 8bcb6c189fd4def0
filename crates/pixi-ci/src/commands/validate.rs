use std::process::ExitCode;

use anyhow::Context as _;
use pixi_ci_env::validate_artifacts_dir;

use super::Context;
use crate::ui;

pub fn run(ctx: &Context) -> anyhow::Result<ExitCode> {
    let artifacts = ctx.root.join("artifacts");
    validate_artifacts_dir(&artifacts, &ctx.env())
        .with_context(|| format!("artifacts in '{}' do not match the requested sources", artifacts.display()))?;
    ui::success("artifact sources match the environment");
    Ok(ExitCode::SUCCESS)
}
