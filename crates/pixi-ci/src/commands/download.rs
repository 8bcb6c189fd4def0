use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context as _, anyhow};
use pixi_ci_env::{EnvLookup, resolve_token};
use pixi_ci_fetch::{
    ArtifactKind, BuiltinTarget, DownloadOutcome, DownloadRequest, GithubApi, ReqwestGithub, RunSelector,
    fetch_artifact,
};
use pixi_ci_platform::{Command, Platform};
use tracing::{error, info, warn};

use super::Context;
use crate::cli::DownloadArgs;
use crate::ui;

pub async fn run(ctx: &Context, args: DownloadArgs) -> anyhow::Result<ExitCode> {
    let env = ctx.env();
    let token = resolve_token(args.token.as_deref(), &env).ok_or_else(|| {
        anyhow!("no GitHub token provided. Set GITHUB_TOKEN, pass --token, or log in with `gh auth login`")
    })?;
    info!(source = ?token.source, "using GitHub token");

    let platform = match args.platform.as_deref() {
        Some(tag) => Platform::from_tag(tag)?,
        None => Platform::current(),
    };
    info!(os = %platform.os, arch = %platform.arch, "target platform");

    let api = ReqwestGithub::with_base(&args.api_url, Some(token.into_secret()))?.with_progress(ui::interactive());

    let failed = download_targets(&api, &ctx.root, &env, &args, platform).await;
    if failed.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(?failed, "some downloads failed");
        Ok(ExitCode::FAILURE)
    }
}

/// Fetch every requested target in turn, returning the ones that failed.
async fn download_targets<A: GithubApi>(
    api: &A,
    root: &Path,
    env: &impl EnvLookup,
    args: &DownloadArgs,
    platform: Platform,
) -> Vec<BuiltinTarget> {
    let targets = match args.repo {
        Some(repo) => vec![repo],
        None => BuiltinTarget::DEFAULTS.to_vec(),
    };

    let mut failed = Vec::new();
    for builtin in targets {
        let target = builtin.resolve(env.var(builtin.pr_env_var()).as_deref());
        if let Some(pr) = target.pr_number {
            info!(repo = %target.repository, pr, "using artifacts from PR");
        }

        let output_dir = match &args.output_dir {
            Some(dir) => dir.clone(),
            None => root.join(target.kind.default_output_dir()),
        };
        let request = DownloadRequest {
            selector: RunSelector::for_target(&target, args.run_id, args.branch.as_deref()),
            target,
            platform,
            output_dir,
        };

        match fetch_artifact(api, &request).await {
            Ok(outcome) => {
                report(builtin, &outcome);
                if args.verify && request.target.kind == ArtifactKind::Pixi {
                    verify_pixi(&outcome);
                }
            }
            Err(err) => {
                let err = anyhow::Error::new(err).context(format!("failed to download artifacts for {builtin}"));
                error!("{err:#}");
                ui::failure(format!("{err:#}"));
                failed.push(builtin);
            }
        }
    }
    failed
}

fn report(builtin: BuiltinTarget, outcome: &DownloadOutcome) {
    for entry in &outcome.extraction.extracted {
        ui::success(format!("{builtin}: extracted {}", entry.path.display()));
    }
    info!(
        run_id = outcome.located.run.id,
        artifact = %outcome.located.artifact.name,
        metadata = %outcome.metadata_path.display(),
        "recorded download metadata"
    );
}

fn verify_pixi(outcome: &DownloadOutcome) {
    let Some(pixi) = outcome.extraction.extracted.first().map(|entry| entry.path.as_path()) else {
        warn!("nothing was extracted, skipping verification");
        return;
    };
    if let Err(err) = run_version(pixi) {
        warn!("{err:#}");
        ui::warning(format!("could not verify {}", pixi.display()));
    }
}

fn run_version(pixi: &Path) -> anyhow::Result<()> {
    let output = Command::new(pixi)
        .arg("--version")
        .capture()
        .with_context(|| format!("failed to run '{}'", pixi.display()))?;
    if !output.success() {
        anyhow::bail!("'{} --version' exited with {:?}: {}", pixi.display(), output.code, output.stderr.trim());
    }
    ui::success(format!("verified {}", output.stdout.trim()));
    Ok(())
}
