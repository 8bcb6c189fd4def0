use tracing::{info, instrument, warn};

use crate::api::{GithubApi, RunFilter};
use crate::error::{Error, Result};
use crate::target::{ArtifactTarget, RepoSlug};
use crate::types::{Artifact, PullRequest, Workflow, WorkflowRun};

/// Upper bound on workflow runs inspected per lookup.
pub const MAX_CANDIDATE_RUNS: usize = 3;

pub const DEFAULT_BRANCH: &str = "main";

/// How candidate workflow runs are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSelector {
    RunId(u64),
    PullRequest(u64),
    Branch(String),
}

impl RunSelector {
    /// An explicit run id wins, then an explicit branch, then the target's PR,
    /// and finally pushes to `main`.
    pub fn for_target(target: &ArtifactTarget, run_id: Option<u64>, branch: Option<&str>) -> Self {
        match (run_id, branch, target.pr_number) {
            (Some(id), _, _) => Self::RunId(id),
            (None, Some(branch), _) => Self::Branch(branch.to_string()),
            (None, None, Some(pr)) => Self::PullRequest(pr),
            (None, None, None) => Self::Branch(DEFAULT_BRANCH.to_string()),
        }
    }
}

/// An artifact together with the run it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedArtifact {
    pub artifact: Artifact,
    pub run: WorkflowRun,
    pub pull_request: Option<PullRequest>,
}

/// First artifact whose name contains `pattern`.
pub fn match_artifact<'a>(artifacts: &'a [Artifact], pattern: &str) -> Option<&'a Artifact> {
    artifacts.iter().find(|artifact| artifact.name.contains(pattern))
}

/// Find the artifact of `target` whose name contains `pattern`.
#[instrument(skip(api, target), fields(repo = %target.repository, workflow = %target.workflow))]
pub async fn locate<A: GithubApi>(
    api: &A,
    target: &ArtifactTarget,
    selector: &RunSelector,
    pattern: &str,
) -> Result<LocatedArtifact> {
    let repo = &target.repository;
    let mut pull_request = None;

    let candidates = match selector {
        RunSelector::RunId(id) => {
            info!(run_id = id, "using specified run");
            let run = api.workflow_run(repo, *id).await?;
            if !run.succeeded() {
                warn!(
                    run_id = id,
                    conclusion = run.conclusion.as_deref().unwrap_or("pending"),
                    "selected run did not succeed"
                );
            }
            vec![run]
        }
        RunSelector::PullRequest(number) => {
            let pr = api.pull_request(repo, *number).await?;
            info!(pr = number, title = %pr.title, head = %pr.head.sha, "finding runs for pull request");
            let workflow = find_workflow(api, repo, &target.workflow).await?;
            let filter = RunFilter::head_sha(pr.head.sha.clone(), MAX_CANDIDATE_RUNS);
            let runs = api.workflow_runs(repo, workflow.id, &filter).await?;
            pull_request = Some(pr);
            runs
        }
        RunSelector::Branch(branch) => {
            let workflow = find_workflow(api, repo, &target.workflow).await?;
            info!(%branch, "finding latest runs from branch");
            let filter = RunFilter::pushes_to(branch.clone(), MAX_CANDIDATE_RUNS);
            api.workflow_runs(repo, workflow.id, &filter).await?
        }
    };

    let mut last_inspected: Option<Vec<Artifact>> = None;
    for run in candidates.into_iter().take(MAX_CANDIDATE_RUNS) {
        let artifacts = api.run_artifacts(repo, run.id).await?;
        if let Some(artifact) = match_artifact(&artifacts, pattern) {
            info!(run_id = run.id, created_at = %run.created_at, artifact = %artifact.name, "found artifact");
            return Ok(LocatedArtifact {
                artifact: artifact.clone(),
                run,
                pull_request,
            });
        }
        info!(run_id = run.id, "no matching artifact in run");
        last_inspected = Some(artifacts);
    }

    match last_inspected {
        None => Err(Error::NoSuitableRun),
        Some(artifacts) => Err(Error::ArtifactNotFound {
            pattern: pattern.to_string(),
            available: artifacts.into_iter().map(|a| a.name).collect(),
        }),
    }
}

async fn find_workflow<A: GithubApi>(api: &A, repo: &RepoSlug, name: &str) -> Result<Workflow> {
    let workflow = api
        .workflows(repo)
        .await?
        .into_iter()
        .find(|workflow| workflow.name == name)
        .ok_or_else(|| Error::WorkflowNotFound(name.to_string()))?;
    info!(workflow = %workflow.name, id = workflow.id, "found workflow");
    Ok(workflow)
}
