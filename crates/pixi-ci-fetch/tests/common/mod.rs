#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use pixi_ci_fetch::{
    Artifact, Error, GithubApi, PullRequest, PullRequestHead, RepoSlug, Result, RunFilter,
    Workflow, WorkflowRun,
};
use zip::write::SimpleFileOptions;

/// In-memory GitHub with call recording.
#[derive(Default)]
pub struct FakeGithub {
    pub workflows: Vec<Workflow>,
    pub runs: Vec<WorkflowRun>,
    pub artifacts: HashMap<u64, Vec<Artifact>>,
    pub pulls: HashMap<u64, PullRequest>,
    pub archives: HashMap<String, Vec<u8>>,
    pub calls: Mutex<Vec<String>>,
    pub filters: Mutex<Vec<RunFilter>>,
}

impl FakeGithub {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn artifact_listings(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with("artifacts"))
            .count()
    }
}

impl GithubApi for FakeGithub {
    async fn workflow_run(&self, _repo: &RepoSlug, run_id: u64) -> Result<WorkflowRun> {
        self.record(format!("run {run_id}"));
        self.runs
            .iter()
            .find(|run| run.id == run_id)
            .cloned()
            .ok_or_else(|| Error::Status {
                url: format!("runs/{run_id}"),
                status: 404,
                body: "Not Found".into(),
            })
    }

    async fn workflows(&self, _repo: &RepoSlug) -> Result<Vec<Workflow>> {
        self.record("workflows".into());
        Ok(self.workflows.clone())
    }

    async fn workflow_runs(
        &self,
        _repo: &RepoSlug,
        workflow_id: u64,
        filter: &RunFilter,
    ) -> Result<Vec<WorkflowRun>> {
        self.record(format!("runs of {workflow_id}"));
        self.filters.lock().unwrap().push(filter.clone());
        Ok(self
            .runs
            .iter()
            .filter(|run| filter.head_sha.as_ref().is_none_or(|sha| &run.head_sha == sha))
            .cloned()
            .collect())
    }

    async fn run_artifacts(&self, _repo: &RepoSlug, run_id: u64) -> Result<Vec<Artifact>> {
        self.record(format!("artifacts {run_id}"));
        Ok(self.artifacts.get(&run_id).cloned().unwrap_or_default())
    }

    async fn pull_request(&self, _repo: &RepoSlug, number: u64) -> Result<PullRequest> {
        self.record(format!("pull {number}"));
        self.pulls.get(&number).cloned().ok_or_else(|| Error::Status {
            url: format!("pulls/{number}"),
            status: 404,
            body: "Not Found".into(),
        })
    }

    async fn download_artifact(&self, artifact: &Artifact, destination: &Path) -> Result<u64> {
        self.record(format!("download {}", artifact.name));
        let data = self.archives.get(&artifact.name).cloned().unwrap_or_default();
        std::fs::write(destination, &data)?;
        Ok(data.len() as u64)
    }
}

pub fn workflow(id: u64, name: &str) -> Workflow {
    Workflow {
        id,
        name: name.to_string(),
        path: format!(".github/workflows/{id}.yml"),
    }
}

pub fn run(id: u64, head_sha: &str, conclusion: &str) -> WorkflowRun {
    WorkflowRun {
        id,
        name: Some("CI".into()),
        head_sha: head_sha.to_string(),
        head_branch: Some("main".into()),
        conclusion: Some(conclusion.to_string()),
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn artifact(id: u64, name: &str) -> Artifact {
    Artifact {
        id,
        name: name.to_string(),
        size_in_bytes: 0,
        archive_download_url: format!("https://example.invalid/artifacts/{id}/zip"),
        expired: false,
    }
}

pub fn pull(number: u64, sha: &str) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR {number}"),
        head: PullRequestHead {
            sha: sha.to_string(),
            ref_name: "feature".into(),
            label: "someone:feature".into(),
        },
    }
}

pub fn zip_with(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
