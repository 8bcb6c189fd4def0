//! Provenance records in `download-metadata.json`.
//!
//! The file is a JSON object keyed by repository slug. Each download replaces
//! its own repository's entry and keeps the others.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pixi_ci_fs::atomic_write;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::locator::{DEFAULT_BRANCH, LocatedArtifact, RunSelector};
use crate::target::{ArtifactTarget, RepoSlug};

pub const METADATA_FILE_NAME: &str = "download-metadata.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum Provenance {
    Pr {
        #[serde(default)]
        pr_number: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pr_title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        head_ref: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        head_label: Option<String>,
    },
    Branch {
        #[serde(default = "default_branch")]
        branch: String,
    },
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

impl Provenance {
    /// Read the provenance of a raw metadata entry, tolerating older writers.
    ///
    /// Returns `None` when the entry is not an object or has no known `source`.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let object = entry.as_object()?;
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
        match object.get("source")?.as_str()? {
            "pr" => Some(Self::Pr {
                pr_number: object.get("pr_number").and_then(|value| match value {
                    Value::Number(n) => n.as_u64(),
                    Value::String(s) => s.trim().parse().ok(),
                    _ => None,
                }),
                pr_title: text("pr_title"),
                head_ref: text("head_ref"),
                head_label: text("head_label"),
            }),
            "branch" => Some(Self::Branch {
                branch: text("branch").unwrap_or_else(default_branch),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub artifact: String,
    pub downloaded_at: DateTime<Utc>,
    pub run_id: u64,
    pub head_sha: String,
    pub workflow: String,
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl ArtifactMetadata {
    pub fn new(
        target: &ArtifactTarget,
        selector: &RunSelector,
        located: &LocatedArtifact,
        downloaded_at: DateTime<Utc>,
    ) -> Self {
        let pr_number = match selector {
            RunSelector::PullRequest(number) => Some(*number),
            RunSelector::RunId(_) => target.pr_number,
            RunSelector::Branch(_) => None,
        };
        let provenance = match pr_number {
            Some(number) => {
                let pr = located.pull_request.as_ref();
                Provenance::Pr {
                    pr_number: Some(number),
                    pr_title: pr.map(|pr| pr.title.clone()),
                    head_ref: pr.map(|pr| pr.head.ref_name.clone()),
                    head_label: pr.map(|pr| pr.head.label.clone()),
                }
            }
            None => Provenance::Branch {
                branch: located
                    .run
                    .head_branch
                    .clone()
                    .filter(|branch| !branch.is_empty())
                    .unwrap_or_else(default_branch),
            },
        };

        Self {
            artifact: located.artifact.name.clone(),
            downloaded_at,
            run_id: located.run.id,
            head_sha: located.run.head_sha.clone(),
            workflow: target.workflow.clone(),
            provenance,
        }
    }
}

/// Merge `metadata` into `<output_dir>/download-metadata.json` under `repo`.
///
/// A file that does not hold a JSON object is replaced.
pub fn write_metadata(
    output_dir: impl AsRef<Path>,
    repo: &RepoSlug,
    metadata: &ArtifactMetadata,
) -> Result<PathBuf> {
    let path = output_dir.as_ref().join(METADATA_FILE_NAME);

    let mut entries = match fs::read_to_string(&path) {
        Ok(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            _ => {
                warn!(path = %path.display(), "existing metadata file is invalid JSON; overwriting");
                Map::new()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
        Err(e) => return Err(e.into()),
    };

    entries.insert(repo.to_string(), serde_json::to_value(metadata)?);
    // serde_json's default map is ordered, so keys come out sorted.
    let text = serde_json::to_string_pretty(&Value::Object(entries))?;
    atomic_write(&path, text.as_bytes())?;

    debug!(path = %path.display(), repo = %repo, "metadata written");
    Ok(path)
}

/// Load the raw entries of a metadata file. A missing file yields an empty map.
pub fn load_metadata(path: impl AsRef<Path>) -> Result<Map<String, Value>> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::InvalidMetadata {
            path: path.to_path_buf(),
            reason: "must contain a JSON object".to_string(),
        }),
        Err(e) => Err(Error::InvalidMetadata {
            path: path.to_path_buf(),
            reason: format!("not valid JSON ({e})"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::target::BuiltinTarget;
    use crate::types::{Artifact, PullRequest, PullRequestHead, WorkflowRun};

    fn located(head_branch: Option<&str>, pr: Option<PullRequest>) -> LocatedArtifact {
        LocatedArtifact {
            artifact: Artifact {
                id: 9,
                name: "pixi-linux-x86_64".into(),
                size_in_bytes: 10,
                archive_download_url: "https://example.invalid/a.zip".into(),
                expired: false,
            },
            run: WorkflowRun {
                id: 1234,
                name: Some("CI".into()),
                head_sha: "abc".into(),
                head_branch: head_branch.map(str::to_string),
                conclusion: Some("success".into()),
                created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            },
            pull_request: pr,
        }
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap()
    }

    #[test]
    fn branch_provenance_defaults_to_main() {
        let target = BuiltinTarget::Pixi.resolve(None);
        let selector = RunSelector::Branch("main".into());
        let meta = ArtifactMetadata::new(&target, &selector, &located(None, None), timestamp());
        assert_eq!(
            meta.provenance,
            Provenance::Branch {
                branch: "main".into()
            }
        );
        assert_eq!(meta.run_id, 1234);
        assert_eq!(meta.workflow, "CI");
    }

    #[test]
    fn pr_provenance_carries_head_details() {
        let target = BuiltinTarget::Pixi.resolve(Some("77"));
        let pr = PullRequest {
            number: 77,
            title: "Fix things".into(),
            head: PullRequestHead {
                sha: "abc".into(),
                ref_name: "fix".into(),
                label: "someone:fix".into(),
            },
        };
        let meta = ArtifactMetadata::new(
            &target,
            &RunSelector::PullRequest(77),
            &located(Some("fix"), Some(pr)),
            timestamp(),
        );
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["source"], "pr");
        assert_eq!(value["pr_number"], 77);
        assert_eq!(value["pr_title"], "Fix things");
        assert_eq!(value["head_label"], "someone:fix");
    }

    #[test]
    fn run_id_with_pr_env_records_pr_without_title() {
        let target = BuiltinTarget::Pixi.resolve(Some("5"));
        let meta = ArtifactMetadata::new(
            &target,
            &RunSelector::RunId(1234),
            &located(Some("feature"), None),
            timestamp(),
        );
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["source"], "pr");
        assert_eq!(value["pr_number"], 5);
        assert!(value.get("pr_title").is_none());
    }

    #[test]
    fn write_merges_per_repository() {
        let dir = tempfile::tempdir().unwrap();
        let pixi = BuiltinTarget::Pixi.resolve(None);
        let backends = BuiltinTarget::PixiBuildBackends.resolve(None);
        let selector = RunSelector::Branch("main".into());
        let meta = ArtifactMetadata::new(&pixi, &selector, &located(Some("main"), None), timestamp());

        write_metadata(dir.path(), &pixi.repository, &meta).unwrap();
        let path = write_metadata(dir.path(), &backends.repository, &meta).unwrap();

        let entries = load_metadata(&path).unwrap();
        let keys: Vec<_> = entries.keys().cloned().collect();
        assert_eq!(keys, vec!["prefix-dev/pixi", "prefix-dev/pixi-build-backends"]);
        let parsed: ArtifactMetadata =
            serde_json::from_value(entries["prefix-dev/pixi"].clone()).unwrap();
        assert_eq!(parsed, meta);
    }

    #[test]
    fn corrupt_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(METADATA_FILE_NAME), "{not json").unwrap();
        let target = BuiltinTarget::Pixi.resolve(None);
        let meta = ArtifactMetadata::new(
            &target,
            &RunSelector::Branch("main".into()),
            &located(None, None),
            timestamp(),
        );

        let path = write_metadata(dir.path(), &target.repository, &meta).unwrap();

        let entries = load_metadata(path).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key("prefix-dev/pixi"));
    }

    #[test]
    fn load_rejects_non_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(METADATA_FILE_NAME);
        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(load_metadata(&path), Err(Error::InvalidMetadata { .. })));
        assert!(load_metadata(dir.path().join("missing.json")).unwrap().is_empty());
    }

    #[test]
    fn provenance_from_loose_entries() {
        assert_eq!(
            Provenance::from_entry(&json!({"source": "pr", "pr_number": "12"})),
            Some(Provenance::Pr {
                pr_number: Some(12),
                pr_title: None,
                head_ref: None,
                head_label: None
            })
        );
        assert_eq!(
            Provenance::from_entry(&json!({"source": "branch"})),
            Some(Provenance::Branch {
                branch: "main".into()
            })
        );
        assert_eq!(Provenance::from_entry(&json!("pr")), None);
        assert_eq!(Provenance::from_entry(&json!({"source": "tag"})), None);
    }
}
