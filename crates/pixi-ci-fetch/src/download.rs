use std::path::PathBuf;

use chrono::Utc;
use pixi_ci_archive::{ExtractionReport, extract_file};
use pixi_ci_platform::Platform;
use tracing::{info, instrument};

use crate::api::GithubApi;
use crate::error::Result;
use crate::locator::{LocatedArtifact, RunSelector, locate};
use crate::metadata::{ArtifactMetadata, write_metadata};
use crate::target::ArtifactTarget;

/// Everything needed to fetch one artifact.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub target: ArtifactTarget,
    pub selector: RunSelector,
    pub platform: Platform,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub located: LocatedArtifact,
    pub extraction: ExtractionReport,
    pub metadata: ArtifactMetadata,
    pub metadata_path: PathBuf,
}

/// Locate, download and extract an artifact, then record where it came from.
///
/// The archive is staged in a temporary directory that is removed on return.
#[instrument(skip(api, request), fields(repo = %request.target.repository))]
pub async fn fetch_artifact<A: GithubApi>(api: &A, request: &DownloadRequest) -> Result<DownloadOutcome> {
    let target = &request.target;
    let pattern = target.kind.name_pattern(&request.platform)?;
    info!(%pattern, "looking for artifact");

    let located = locate(api, target, &request.selector, &pattern).await?;

    std::fs::create_dir_all(&request.output_dir)?;
    info!(output_dir = %request.output_dir.display(), "output directory");

    let staging = tempfile::Builder::new().prefix("pixi-ci-").tempdir()?;
    let archive = staging.path().join(format!("{}.zip", located.artifact.name));
    let bytes = api.download_artifact(&located.artifact, &archive).await?;
    info!(artifact = %located.artifact.name, bytes, "downloaded");

    let selector = target.kind.entry_selector(request.platform.os);
    let extraction = extract_file(&archive, &request.output_dir, selector)?;
    drop(staging);

    let metadata = ArtifactMetadata::new(target, &request.selector, &located, Utc::now());
    let metadata_path = write_metadata(&request.output_dir, &target.repository, &metadata)?;

    Ok(DownloadOutcome {
        located,
        extraction,
        metadata,
        metadata_path,
    })
}
