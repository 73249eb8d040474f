use regex::Regex;
use std::fmt;

/// Leading digit run followed by a leading uppercase run; the rest is ignored.
const BUILDTRAIN_MINOR_PATTERN: &str = r"^([0-9]*)([A-Z]*)";

/// A buildtrain and minor pair, e.g. `0` and `A` for a branch named `0Afeature`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchKey {
    pub buildtrain: String,
    pub minor: String,
}

impl BranchKey {
    /// Create a new key from its parts
    pub fn new(buildtrain: impl Into<String>, minor: impl Into<String>) -> Self {
        BranchKey {
            buildtrain: buildtrain.into(),
            minor: minor.into(),
        }
    }

    /// Canonical storage key: buildtrain immediately followed by minor.
    pub fn to_key(&self) -> String {
        format!("{}{}", self.buildtrain, self.minor)
    }

    /// Re-apply the branch rule to a key read back from storage.
    ///
    /// Unlike [`parse_branch`] this accepts a partial match, so `"7"` yields
    /// buildtrain `"7"` with an empty minor. Only a key with neither a digit
    /// prefix nor a letter prefix is rejected.
    pub fn from_store_key(key: &str) -> Option<Self> {
        let (buildtrain, minor) = split_prefixes(key)?;
        if buildtrain.is_empty() && minor.is_empty() {
            return None;
        }
        Some(BranchKey::new(buildtrain, minor))
    }

    /// Render the build number for a counter value, e.g. `0A12`.
    pub fn build_number(&self, counter: u64) -> String {
        format!("{}{}{}", self.buildtrain, self.minor, counter)
    }
}

impl fmt::Display for BranchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.buildtrain, self.minor)
    }
}

/// Extract the buildtrain and minor from a branch name.
///
/// Returns `None` when either the digit prefix or the letter prefix is
/// missing, meaning the branch is not on the buildtrain naming scheme.
///
/// # Example
/// ```
/// use get_build_number::domain::{parse_branch, BranchKey};
///
/// assert_eq!(parse_branch("0Afoo-bar"), Some(BranchKey::new("0", "A")));
/// assert_eq!(parse_branch("main"), None);
/// ```
pub fn parse_branch(branch: &str) -> Option<BranchKey> {
    let (buildtrain, minor) = split_prefixes(branch)?;
    if buildtrain.is_empty() || minor.is_empty() {
        return None;
    }
    Some(BranchKey::new(buildtrain, minor))
}

fn split_prefixes(input: &str) -> Option<(&str, &str)> {
    let re = Regex::new(BUILDTRAIN_MINOR_PATTERN).ok()?;
    let captures = re.captures(input)?;
    let buildtrain = captures.get(1).map(|m| m.as_str()).unwrap_or("");
    let minor = captures.get(2).map(|m| m.as_str()).unwrap_or("");
    Some((buildtrain, minor))
}
