use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};
use url::Url;

use crate::api::{GithubApi, RunFilter};
use crate::error::{Error, Result};
use crate::progress::DownloadProgress;
use crate::target::RepoSlug;
use crate::types::{
    Artifact, ArtifactPage, PullRequest, Workflow, WorkflowPage, WorkflowRun, WorkflowRunPage,
};

pub const DEFAULT_API_BASE: &str = "https://api.github.com/";

/// Connect and read timeout for every request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const API_VERSION: &str = "2022-11-28";
const PAGE_SIZE: usize = 100;

/// [`GithubApi`] backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct ReqwestGithub {
    client: reqwest::Client,
    base: Url,
    token: Option<String>,
    progress: bool,
}

impl ReqwestGithub {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base(DEFAULT_API_BASE, token)
    }

    /// Point the client at another API root, such as a GitHub Enterprise host.
    pub fn with_base(base: &str, token: Option<String>) -> Result<Self> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .user_agent(concat!("pixi-ci/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .connect_timeout(HTTP_TIMEOUT)
            .read_timeout(HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base,
            token,
            progress: false,
        })
    }

    /// Show a progress bar while downloading archives.
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    fn repo_url(&self, repo: &RepoSlug, rest: &str) -> Result<Url> {
        Ok(self
            .base
            .join(&format!("repos/{}/{}/{rest}", repo.owner(), repo.name()))?)
    }

    fn get(&self, url: impl reqwest::IntoUrl) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        debug!(%url, ?query, "GET");
        let response = self.send(self.get(url.clone()).query(query), &url).await?;
        Ok(response.json().await?)
    }
}

impl GithubApi for ReqwestGithub {
    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn workflow_run(&self, repo: &RepoSlug, run_id: u64) -> Result<WorkflowRun> {
        let url = self.repo_url(repo, &format!("actions/runs/{run_id}"))?;
        self.get_json(url, &[]).await
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn workflows(&self, repo: &RepoSlug) -> Result<Vec<Workflow>> {
        let url = self.repo_url(repo, "actions/workflows")?;
        let mut workflows = Vec::new();
        for page in 1.. {
            let query = [("per_page", PAGE_SIZE.to_string()), ("page", page.to_string())];
            let batch: WorkflowPage = self.get_json(url.clone(), &query).await?;
            let done = batch.workflows.is_empty();
            workflows.extend(batch.workflows);
            if done || workflows.len() as u64 >= batch.total_count {
                break;
            }
        }
        Ok(workflows)
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn workflow_runs(
        &self,
        repo: &RepoSlug,
        workflow_id: u64,
        filter: &RunFilter,
    ) -> Result<Vec<WorkflowRun>> {
        let url = self.repo_url(repo, &format!("actions/workflows/{workflow_id}/runs"))?;
        let page: WorkflowRunPage = self.get_json(url, &filter.query()).await?;
        Ok(page.workflow_runs)
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn run_artifacts(&self, repo: &RepoSlug, run_id: u64) -> Result<Vec<Artifact>> {
        let url = self.repo_url(repo, &format!("actions/runs/{run_id}/artifacts"))?;
        let mut artifacts = Vec::new();
        for page in 1.. {
            let query = [("per_page", PAGE_SIZE.to_string()), ("page", page.to_string())];
            let batch: ArtifactPage = self.get_json(url.clone(), &query).await?;
            let done = batch.artifacts.is_empty();
            artifacts.extend(batch.artifacts);
            if done || artifacts.len() as u64 >= batch.total_count {
                break;
            }
        }
        Ok(artifacts)
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn pull_request(&self, repo: &RepoSlug, number: u64) -> Result<PullRequest> {
        let url = self.repo_url(repo, &format!("pulls/{number}"))?;
        self.get_json(url, &[]).await
    }

    #[instrument(skip(self, artifact), fields(artifact = %artifact.name))]
    async fn download_artifact(&self, artifact: &Artifact, destination: &Path) -> Result<u64> {
        let url = Url::parse(&artifact.archive_download_url)?;
        let response = self.send(self.get(url.clone()), &url).await?;

        let progress =
            DownloadProgress::start(response.content_length(), &artifact.name, self.progress);
        let mut file = tokio::fs::File::create(destination).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            if let Some(progress) = &progress {
                progress.step(chunk.len() as u64);
            }
        }
        file.flush().await?;
        if let Some(progress) = progress {
            progress.finish();
        }

        debug!(bytes = written, path = %destination.display(), "archive downloaded");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_urls_are_joined_under_base() {
        let client = ReqwestGithub::with_base("https://ghe.example.com/api/v3", None).unwrap();
        let repo: RepoSlug = "prefix-dev/pixi".parse().unwrap();
        let url = client.repo_url(&repo, "actions/runs/5").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/prefix-dev/pixi/actions/runs/5"
        );
    }

    #[test]
    fn default_base_is_public_api() {
        let client = ReqwestGithub::new(Some("token".into())).unwrap();
        let repo: RepoSlug = "prefix-dev/pixi-build-backends".parse().unwrap();
        let url = client.repo_url(&repo, "pulls/12").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/prefix-dev/pixi-build-backends/pulls/12"
        );
    }
}
