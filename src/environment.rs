//! Reading the CI environment into a [DecisionContext].
//!
//! All required variables are checked up front and every missing name is
//! reported at once. A malformed release id aborts the run before any
//! storage is touched.

use crate::config::{EnvironmentConfig, StorageBackend};
use crate::domain::DecisionContext;
use crate::error::{BuildNumberError, Result};
use crate::store::ReleaseCoordinates;

/// Credentials and location of the storage release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubTarget {
    pub token: String,
    pub coordinates: ReleaseCoordinates,
}

/// Values taken from the local git repository when the CI variables are absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalFallback {
    pub branch: Option<String>,
    pub change_id: Option<String>,
}

/// Everything a run needs from its environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiEnvironment {
    pub context: DecisionContext,
    /// Present when the GitHub release backend is selected
    pub github: Option<GitHubTarget>,
}

impl CiEnvironment {
    /// Read from the process environment
    pub fn from_process(
        vars: &EnvironmentConfig,
        backend: StorageBackend,
        local: &LocalFallback,
    ) -> Result<Self> {
        Self::read(vars, backend, local, |name| std::env::var(name).ok())
    }

    /// Read through `lookup`, which returns the value of a variable by name.
    ///
    /// A variable that is unset or set to the empty string counts as missing.
    pub fn read<F>(
        vars: &EnvironmentConfig,
        backend: StorageBackend,
        local: &LocalFallback,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let mut missing = Vec::new();

        let branch = get(vars.branch.as_str()).or_else(|| local.branch.clone());
        if branch.is_none() {
            missing.push(vars.branch.as_str());
        }
        let change_id = get(vars.change_id.as_str()).or_else(|| local.change_id.clone());
        if change_id.is_none() {
            missing.push(vars.change_id.as_str());
        }
        let default_branch = get(vars.default_branch.as_str());
        if default_branch.is_none() {
            missing.push(vars.default_branch.as_str());
        }

        let github_vars = [
            &vars.token,
            &vars.repo_owner,
            &vars.repo_name,
            &vars.release_id,
        ];
        let github_values: Vec<Option<String>> = if backend == StorageBackend::GithubRelease {
            github_vars.iter().map(|name| get(name.as_str())).collect()
        } else {
            Vec::new()
        };
        for (name, value) in github_vars.iter().zip(&github_values) {
            if value.is_none() {
                missing.push(name.as_str());
            }
        }

        if !missing.is_empty() {
            return Err(BuildNumberError::environment(format!(
                "Missing {} environment variable(s); not running on CI?",
                missing.join(", ")
            )));
        }

        let github = github_target(vars, &github_values)?;

        // Checked above; the defaults are never used.
        let branch = branch.unwrap_or_default();
        let default_branch = default_branch.unwrap_or_default();

        Ok(CiEnvironment {
            context: DecisionContext {
                is_default_branch: branch == default_branch,
                is_pull_request: get(vars.pull_request.as_str()).is_some(),
                branch,
                fallback_change_id: change_id.unwrap_or_default(),
            },
            github,
        })
    }
}

/// Read only the storage release settings, e.g. to list the stored counters.
pub fn read_github_target<F>(vars: &EnvironmentConfig, lookup: F) -> Result<GitHubTarget>
where
    F: Fn(&str) -> Option<String>,
{
    let names = [
        &vars.token,
        &vars.repo_owner,
        &vars.repo_name,
        &vars.release_id,
    ];
    let values: Vec<Option<String>> = names
        .iter()
        .map(|name| lookup(name.as_str()).filter(|v| !v.is_empty()))
        .collect();
    let missing: Vec<&str> = names
        .iter()
        .zip(&values)
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(BuildNumberError::environment(format!(
            "Missing {} environment variable(s); not running on CI?",
            missing.join(", ")
        )));
    }

    github_target(vars, &values)?
        .ok_or_else(|| BuildNumberError::environment("incomplete GitHub release settings"))
}

fn github_target(
    vars: &EnvironmentConfig,
    values: &[Option<String>],
) -> Result<Option<GitHubTarget>> {
    match values {
        [Some(token), Some(owner), Some(repo), Some(release_id)] => Ok(Some(GitHubTarget {
            token: token.clone(),
            coordinates: ReleaseCoordinates {
                owner: owner.clone(),
                repo: repo.clone(),
                release_id: parse_release_id(&vars.release_id, release_id)?,
            },
        })),
        _ => Ok(None),
    }
}

fn parse_release_id(name: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|e| {
        BuildNumberError::environment(format!(
            "{} must be a numeric release id, got '{}': {}",
            name, value, e
        ))
    })
}
