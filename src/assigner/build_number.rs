use crate::domain::{parse_branch, BranchKey, BuildCounters, DecisionContext};
use crate::error::{BuildNumberError, Result};
use log::debug;
use std::fmt;

/// Why no build number is minted for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortCircuitReason {
    /// The build was triggered by a pull request
    PullRequest,
    /// The branch is not the default branch and has no buildtrain/minor prefix
    UnrecognizedBranch,
}

impl fmt::Display for ShortCircuitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortCircuitReason::PullRequest => write!(f, "pull request build"),
            ShortCircuitReason::UnrecognizedBranch => {
                write!(f, "branch is not on the buildtrain naming scheme")
            }
        }
    }
}

/// Where the buildtrain and minor of a minted build number came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Parsed from the branch name
    Branch,
    /// Default branch: reused from the highest key already in storage
    HighestExisting,
}

/// What a run has to do, decided from the context alone.
///
/// This is everything that can be settled before the counters are loaded, so
/// short-circuited runs never touch storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    ShortCircuit(ShortCircuitReason),
    AssignFromBranch(BranchKey),
    AssignFromHighestExisting,
}

impl Decision {
    /// Whether this decision needs the stored counters
    pub fn needs_counters(&self) -> bool {
        !matches!(self, Decision::ShortCircuit(_))
    }
}

/// The result of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// No build number; the fallback change id is the output
    ShortCircuit {
        reason: ShortCircuitReason,
        output: String,
    },
    /// A new build number was minted and `counters` holds the updated state
    Minted {
        source: KeySource,
        key: BranchKey,
        counter: u64,
        counters: BuildCounters,
    },
}

impl Assignment {
    /// The single line to print for this run
    pub fn output(&self) -> String {
        match self {
            Assignment::ShortCircuit { output, .. } => output.clone(),
            Assignment::Minted { key, counter, .. } => key.build_number(*counter),
        }
    }

    /// Counters to persist, `None` when nothing changed
    pub fn updated_counters(&self) -> Option<&BuildCounters> {
        match self {
            Assignment::ShortCircuit { .. } => None,
            Assignment::Minted { counters, .. } => Some(counters),
        }
    }
}

/// Decide what a run does, in this order:
/// 1. pull request builds short-circuit;
/// 2. a branch named like `0Afeature` assigns from its own buildtrain/minor;
/// 3. an unrecognized default branch reuses the highest stored key;
/// 4. any other unrecognized branch short-circuits.
pub fn classify(ctx: &DecisionContext) -> Decision {
    if ctx.is_pull_request {
        return Decision::ShortCircuit(ShortCircuitReason::PullRequest);
    }

    match parse_branch(&ctx.branch) {
        Some(key) => Decision::AssignFromBranch(key),
        None if ctx.is_default_branch => Decision::AssignFromHighestExisting,
        None => Decision::ShortCircuit(ShortCircuitReason::UnrecognizedBranch),
    }
}

/// Compute the output and updated counters for a run.
///
/// Pure: `counters` is consumed and handed back inside the assignment, so
/// loading and saving stay with the caller.
///
/// # Errors
/// [`BuildNumberError::NoFallbackKey`] on the default branch when the highest
/// stored key has neither a buildtrain nor a minor (including an empty store).
pub fn assign(ctx: &DecisionContext, counters: BuildCounters) -> Result<Assignment> {
    let decision = classify(ctx);
    debug!("Decision for branch '{}': {:?}", ctx.branch, decision);

    let (source, key) = match decision {
        Decision::ShortCircuit(reason) => {
            return Ok(Assignment::ShortCircuit {
                reason,
                output: ctx.fallback_change_id.clone(),
            });
        }
        Decision::AssignFromBranch(key) => (KeySource::Branch, key),
        Decision::AssignFromHighestExisting => {
            let key = highest_existing_key(&counters)?;
            debug!("Default branch reuses buildtrain/minor '{}'", key);
            (KeySource::HighestExisting, key)
        }
    };

    let mut counters = counters;
    let counter = counters.increment(&key)?;

    Ok(Assignment::Minted {
        source,
        key,
        counter,
        counters,
    })
}

fn highest_existing_key(counters: &BuildCounters) -> Result<BranchKey> {
    counters
        .highest_key()
        .and_then(BranchKey::from_store_key)
        .ok_or(BuildNumberError::NoFallbackKey)
}
