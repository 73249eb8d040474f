/// The inputs of a single run, fixed once the environment has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionContext {
    pub branch: String,
    pub is_default_branch: bool,
    pub is_pull_request: bool,
    /// Returned verbatim whenever no build number is minted, usually the commit hash.
    pub fallback_change_id: String,
}

impl DecisionContext {
    /// Create a context for a push build on `branch`
    pub fn new(branch: impl Into<String>, fallback_change_id: impl Into<String>) -> Self {
        DecisionContext {
            branch: branch.into(),
            is_default_branch: false,
            is_pull_request: false,
            fallback_change_id: fallback_change_id.into(),
        }
    }

    /// Mark the branch as the repository's default branch
    pub fn on_default_branch(mut self) -> Self {
        self.is_default_branch = true;
        self
    }

    /// Mark the build as triggered by a pull request
    pub fn for_pull_request(mut self) -> Self {
        self.is_pull_request = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_is_plain_push_build() {
        let ctx = DecisionContext::new("0Afeature", "abc123");
        assert_eq!(ctx.branch, "0Afeature");
        assert_eq!(ctx.fallback_change_id, "abc123");
        assert!(!ctx.is_default_branch);
        assert!(!ctx.is_pull_request);
    }

    #[test]
    fn test_builder_flags() {
        let ctx = DecisionContext::new("trunk", "abc123")
            .on_default_branch()
            .for_pull_request();
        assert!(ctx.is_default_branch);
        assert!(ctx.is_pull_request);
    }
}
