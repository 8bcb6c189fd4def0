use std::future::Future;
use std::path::Path;

use crate::error::Result;
use crate::target::RepoSlug;
use crate::types::{Artifact, PullRequest, Workflow, WorkflowRun};

/// Query parameters for listing a workflow's runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilter {
    pub branch: Option<String>,
    pub event: Option<String>,
    pub head_sha: Option<String>,
    /// Page size of the single page requested.
    pub per_page: usize,
}

impl RunFilter {
    pub fn head_sha(sha: impl Into<String>, per_page: usize) -> Self {
        Self {
            head_sha: Some(sha.into()),
            per_page,
            ..Self::default()
        }
    }

    pub fn pushes_to(branch: impl Into<String>, per_page: usize) -> Self {
        Self {
            branch: Some(branch.into()),
            event: Some("push".to_string()),
            per_page,
            ..Self::default()
        }
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("per_page", self.per_page.max(1).to_string())];
        if let Some(branch) = &self.branch {
            query.push(("branch", branch.clone()));
        }
        if let Some(event) = &self.event {
            query.push(("event", event.clone()));
        }
        if let Some(sha) = &self.head_sha {
            query.push(("head_sha", sha.clone()));
        }
        query
    }
}

/// The GitHub Actions endpoints used to find and fetch artifacts.
///
/// [`crate::ReqwestGithub`] talks to the real REST API. Tests substitute an
/// in-memory implementation.
pub trait GithubApi: Send + Sync {
    fn workflow_run(
        &self,
        repo: &RepoSlug,
        run_id: u64,
    ) -> impl Future<Output = Result<WorkflowRun>> + Send;

    /// Every workflow defined in the repository.
    fn workflows(&self, repo: &RepoSlug) -> impl Future<Output = Result<Vec<Workflow>>> + Send;

    /// Most recent runs of a workflow, newest first.
    fn workflow_runs(
        &self,
        repo: &RepoSlug,
        workflow_id: u64,
        filter: &RunFilter,
    ) -> impl Future<Output = Result<Vec<WorkflowRun>>> + Send;

    /// Every artifact of a run, across all pages.
    fn run_artifacts(
        &self,
        repo: &RepoSlug,
        run_id: u64,
    ) -> impl Future<Output = Result<Vec<Artifact>>> + Send;

    fn pull_request(
        &self,
        repo: &RepoSlug,
        number: u64,
    ) -> impl Future<Output = Result<PullRequest>> + Send;

    /// Stream the artifact's zip archive to `destination`, returning the byte count.
    fn download_artifact(
        &self,
        artifact: &Artifact,
        destination: &Path,
    ) -> impl Future<Output = Result<u64>> + Send;
}
