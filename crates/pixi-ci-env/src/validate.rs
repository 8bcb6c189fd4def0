use std::path::Path;

use pixi_ci_fetch::{BuiltinTarget, METADATA_FILE_NAME, Provenance, load_metadata};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::lookup::EnvLookup;

/// Check that recorded artifact provenance agrees with the PR selection in `env`.
///
/// Artifacts from a PR need the matching PR variable; artifacts from a branch
/// need it unset. Repositories without an entry are skipped.
pub fn validate_artifact_sources(metadata: &Map<String, Value>, env: &impl EnvLookup) -> Result<()> {
    for target in BuiltinTarget::DEFAULTS {
        let repo = target.repository().to_string();
        let var = target.pr_env_var();
        let Some(provenance) = metadata.get(&repo).and_then(Provenance::from_entry) else {
            continue;
        };
        let env_value = env.non_empty(var);

        match provenance {
            Provenance::Pr { pr_number, .. } => {
                let pr = pr_number.ok_or_else(|| Error::MissingPrNumber { repo: repo.clone() })?;
                match env_value {
                    None => return Err(Error::PrEnvUnset { repo, pr, var }),
                    Some(value) if value != pr.to_string() => {
                        return Err(Error::PrMismatch {
                            repo,
                            pr,
                            var,
                            value,
                        });
                    }
                    Some(_) => {}
                }
            }
            Provenance::Branch { branch } => {
                if let Some(value) = env_value {
                    return Err(Error::BranchWithPr {
                        repo,
                        branch,
                        var,
                        value,
                    });
                }
            }
        }
        debug!(%repo, "artifact provenance matches environment");
    }
    Ok(())
}

/// Validate the metadata file in `artifacts_dir`, if there is one.
#[instrument(skip(artifacts_dir, env), fields(dir = %artifacts_dir.as_ref().display()))]
pub fn validate_artifacts_dir(artifacts_dir: impl AsRef<Path>, env: &impl EnvLookup) -> Result<()> {
    let metadata = load_metadata(artifacts_dir.as_ref().join(METADATA_FILE_NAME))?;
    validate_artifact_sources(&metadata, env)
}
