//! GitHub Actions artifact lookup and download.
//!
//! # Architecture
//!
//! - [`target`] - Which repository, workflow and artifact kind to fetch
//! - [`api`] - The [`GithubApi`] seam, implemented by [`ReqwestGithub`]
//! - [`locator`] - Candidate run selection and artifact name matching
//! - [`download`] - Download, extraction and provenance recording
//! - [`metadata`] - The `download-metadata.json` file
//!
//! Network access is sequential. Nothing is retried: the first failure is
//! returned to the caller.

pub mod api;
mod client;
pub mod download;
mod error;
pub mod locator;
pub mod metadata;
mod progress;
pub mod target;
pub mod types;

pub use api::{GithubApi, RunFilter};
pub use client::{ReqwestGithub, DEFAULT_API_BASE, HTTP_TIMEOUT};
pub use download::{DownloadOutcome, DownloadRequest, fetch_artifact};
pub use error::{Error, Result};
pub use locator::{DEFAULT_BRANCH, LocatedArtifact, MAX_CANDIDATE_RUNS, RunSelector, locate, match_artifact};
pub use metadata::{ArtifactMetadata, METADATA_FILE_NAME, Provenance, load_metadata, write_metadata};
pub use target::{ArtifactKind, ArtifactTarget, BuiltinTarget, RepoSlug, parse_pr_number};
pub use types::{Artifact, PullRequest, PullRequestHead, Workflow, WorkflowRun};
