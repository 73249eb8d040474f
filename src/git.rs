use crate::environment::LocalFallback;
use crate::error::{BuildNumberError, Result};
use git2::Repository;
use std::path::Path;

/// Local git checkout used to stand in for CI variables outside of CI.
pub struct LocalRepository {
    repo: Repository,
}

impl LocalRepository {
    /// Discover the repository containing `path` (or one of its parents).
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(LocalRepository { repo })
    }

    /// Shorthand name of the checked out branch, e.g. `0Afeature`.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(BuildNumberError::environment("HEAD is detached"));
        }
        head.shorthand()
            .map(|name| name.to_string())
            .ok_or_else(|| BuildNumberError::environment("branch name is not valid UTF-8"))
    }

    /// Full hash of the commit at HEAD
    pub fn head_commit_hash(&self) -> Result<String> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    /// Collect whatever the checkout can tell us; failures leave a field empty.
    pub fn fallback(&self) -> LocalFallback {
        LocalFallback {
            branch: self.current_branch().ok(),
            change_id: self.head_commit_hash().ok(),
        }
    }
}
