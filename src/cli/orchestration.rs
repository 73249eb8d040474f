//! Main workflow orchestration logic
//!
//! Ties environment, storage and the decision engine together for one CI
//! invocation. main.rs only parses arguments and maps errors to exit codes.

use std::io;

use log::{debug, info};

use crate::assigner::{self, Assignment};
use crate::boundary::BoundaryWarning;
use crate::config::{self, Config, StorageBackend};
use crate::domain::{BuildCounters, DecisionContext};
use crate::environment::{self, CiEnvironment, GitHubTarget, LocalFallback};
use crate::error::{BuildNumberError, Result};
use crate::git::LocalRepository;
use crate::store::{BuildNumberStore, FileStore, GitHubReleaseStore};

/// Arguments for a run
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunArgs {
    /// Path to custom config file
    pub config_path: Option<String>,

    /// Use this JSON file as the store, regardless of the configured backend
    pub store_file: Option<String>,

    /// Take branch and change id from the local git checkout when unset
    pub local: bool,

    /// Compute and print, but never save
    pub dry_run: bool,
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// The line printed on stdout
    pub output: String,

    pub assignment: Assignment,

    /// Whether updated counters were written back
    pub saved: bool,
}

/// Receives what a run produces, in order.
pub trait Reporter {
    /// The single result line
    fn output(&mut self, line: &str) -> io::Result<()>;

    fn warning(&mut self, warning: &BoundaryWarning);
}

/// Run against the real environment and configured store.
///
/// 1. Load configuration
/// 2. Read the CI environment (optionally backed by the local checkout)
/// 3. Open the store
/// 4. Decide, print and persist via [execute]
pub fn run<R: Reporter>(args: &RunArgs, reporter: &mut R) -> Result<RunOutcome> {
    let config = load(args)?;
    let backend = backend(args, &config);

    let local = if args.local {
        local_fallback(reporter)
    } else {
        LocalFallback::default()
    };

    let env = CiEnvironment::from_process(&config.environment, backend, &local)?;
    let store = open_store(args, &config, backend, env.github.as_ref())?;

    execute(&env.context, store.as_ref(), args.dry_run, reporter)
}

/// Decide the build number for `ctx`, print it, and persist the counters.
///
/// Short-circuited runs neither load nor save. Load and decode failures
/// degrade to empty counters, and a failed save is only a warning. After a
/// failed load nothing is saved, so the stored counters are never replaced
/// by a partial view. The only
/// errors are the missing default-branch fallback, counter overflow and a
/// failure to write the output line.
pub fn execute<S, R>(
    ctx: &DecisionContext,
    store: &S,
    dry_run: bool,
    reporter: &mut R,
) -> Result<RunOutcome>
where
    S: BuildNumberStore + ?Sized,
    R: Reporter,
{
    let decision = assigner::classify(ctx);
    let (counters, loaded) = if decision.needs_counters() {
        match load_counters(store, reporter) {
            Some(counters) => (counters, true),
            None => (BuildCounters::new(), false),
        }
    } else {
        (BuildCounters::new(), true)
    };

    let assignment = assigner::assign(ctx, counters)?;
    let output = assignment.output();
    reporter.output(&output)?;

    let saved = match assignment.updated_counters() {
        Some(_) if dry_run => {
            info!("Dry run: not saving build number {}", output);
            false
        }
        Some(_) if !loaded => {
            reporter.warning(&BoundaryWarning::SaveSkippedAfterLoadFailure {
                store: store.describe(),
                build_number: output.clone(),
            });
            false
        }
        Some(counters) => save_counters(store, counters, &output, reporter),
        None => false,
    };

    Ok(RunOutcome {
        output,
        assignment,
        saved,
    })
}

/// Load the stored counters for `--list`.
pub fn stored_counters<R: Reporter>(
    args: &RunArgs,
    reporter: &mut R,
) -> Result<(String, BuildCounters)> {
    let config = load(args)?;
    let backend = backend(args, &config);
    let github = match backend {
        StorageBackend::GithubRelease => Some(environment::read_github_target(
            &config.environment,
            |name| std::env::var(name).ok(),
        )?),
        StorageBackend::File => None,
    };
    let store = open_store(args, &config, backend, github.as_ref())?;
    let counters = load_counters(store.as_ref(), reporter).unwrap_or_default();
    Ok((store.describe(), counters))
}

fn load(args: &RunArgs) -> Result<Config> {
    config::load_config(args.config_path.as_deref())
        .map_err(|e| BuildNumberError::config(e.to_string()))
}

fn backend(args: &RunArgs, config: &Config) -> StorageBackend {
    if args.store_file.is_some() {
        StorageBackend::File
    } else {
        config.storage.backend
    }
}

fn local_fallback<R: Reporter>(reporter: &mut R) -> LocalFallback {
    match LocalRepository::discover(".") {
        Ok(repo) => repo.fallback(),
        Err(e) => {
            reporter.warning(&BoundaryWarning::LocalRepositoryUnavailable {
                reason: e.to_string(),
            });
            LocalFallback::default()
        }
    }
}

fn open_store(
    args: &RunArgs,
    config: &Config,
    backend: StorageBackend,
    github: Option<&GitHubTarget>,
) -> Result<Box<dyn BuildNumberStore>> {
    let store: Box<dyn BuildNumberStore> = match (backend, github) {
        (StorageBackend::File, _) => {
            let path = args
                .store_file
                .clone()
                .unwrap_or_else(|| config.storage.path.clone());
            Box::new(FileStore::new(path))
        }
        (StorageBackend::GithubRelease, Some(target)) => Box::new(GitHubReleaseStore::new(
            &config.storage.api_url,
            target.token.clone(),
            target.coordinates.clone(),
            &config.storage.user_agent,
        )?),
        (StorageBackend::GithubRelease, None) => {
            return Err(BuildNumberError::config(
                "GitHub release storage selected without release settings",
            ))
        }
    };
    debug!("Using {}", store.describe());
    Ok(store)
}

/// `None` when the store could not be reached; an undecodable payload still
/// counts as loaded and yields empty counters.
fn load_counters<S, R>(store: &S, reporter: &mut R) -> Option<BuildCounters>
where
    S: BuildNumberStore + ?Sized,
    R: Reporter,
{
    let payload = match store.load() {
        Ok(payload) => payload,
        Err(e) => {
            reporter.warning(&BoundaryWarning::StoreLoadFailed {
                store: store.describe(),
                reason: e.to_string(),
            });
            return None;
        }
    };
    debug!("Loaded {} bytes from {}", payload.len(), store.describe());

    match BuildCounters::decode(&payload) {
        Ok(counters) => Some(counters),
        Err(e) => {
            reporter.warning(&BoundaryWarning::UndecodableCounters {
                store: store.describe(),
                reason: e.to_string(),
            });
            Some(BuildCounters::new())
        }
    }
}

fn save_counters<S, R>(store: &S, counters: &BuildCounters, output: &str, reporter: &mut R) -> bool
where
    S: BuildNumberStore + ?Sized,
    R: Reporter,
{
    let result = counters.encode().and_then(|payload| store.save(&payload));
    match result {
        Ok(()) => {
            debug!("Saved build number {} to {}", output, store.describe());
            true
        }
        Err(e) => {
            reporter.warning(&BoundaryWarning::StoreSaveFailed {
                store: store.describe(),
                build_number: output.to_string(),
                reason: e.to_string(),
            });
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[derive(Default)]
    struct Recorder {
        lines: Vec<String>,
        warnings: Vec<BoundaryWarning>,
    }

    impl Reporter for Recorder {
        fn output(&mut self, line: &str) -> io::Result<()> {
            self.lines.push(line.to_string());
            Ok(())
        }

        fn warning(&mut self, warning: &BoundaryWarning) {
            self.warnings.push(warning.clone());
        }
    }

    #[test]
    fn test_short_circuit_never_touches_store() {
        let store = MemoryStore::with_payload("{}").failing_load().failing_save();
        let ctx = DecisionContext::new("0Afeature", "abc123").for_pull_request();
        let mut recorder = Recorder::default();

        let outcome = execute(&ctx, &store, false, &mut recorder).unwrap();
        assert_eq!(outcome.output, "abc123");
        assert!(!outcome.saved);
        assert!(store.saves().is_empty());
        assert!(recorder.warnings.is_empty());
        assert_eq!(recorder.lines, vec!["abc123"]);
    }

    #[test]
    fn test_assigns_and_saves() {
        init_logging();
        let store = MemoryStore::with_payload(r#"{"0A": 5}"#);
        let ctx = DecisionContext::new("0Afeature", "abc123");
        let mut recorder = Recorder::default();

        let outcome = execute(&ctx, &store, false, &mut recorder).unwrap();
        assert_eq!(outcome.output, "0A6");
        assert!(outcome.saved);
        assert_eq!(store.payload(), br#"{"0A":6}"#.to_vec());
    }

    #[test]
    fn test_dry_run_does_not_save() {
        let store = MemoryStore::with_payload(r#"{"0A": 5}"#);
        let ctx = DecisionContext::new("0Afeature", "abc123");
        let mut recorder = Recorder::default();

        let outcome = execute(&ctx, &store, true, &mut recorder).unwrap();
        assert_eq!(outcome.output, "0A6");
        assert!(!outcome.saved);
        assert!(store.saves().is_empty());
    }

    #[test]
    fn test_load_failure_starts_from_one() {
        init_logging();
        let store = MemoryStore::with_payload(r#"{"0A": 5}"#).failing_load();
        let ctx = DecisionContext::new("0Afeature", "abc123");
        let mut recorder = Recorder::default();

        let outcome = execute(&ctx, &store, false, &mut recorder).unwrap();
        assert_eq!(outcome.output, "0A1");
        assert_eq!(recorder.lines, vec!["0A1"]);
        assert!(matches!(
            recorder.warnings.as_slice(),
            [
                BoundaryWarning::StoreLoadFailed { .. },
                BoundaryWarning::SaveSkippedAfterLoadFailure { .. }
            ]
        ));
    }

    #[test]
    fn test_load_failure_keeps_stored_counters() {
        let store = MemoryStore::with_payload(r#"{"0A":41,"0B":9}"#).failing_load();
        let ctx = DecisionContext::new("0Afeature", "abc123");
        let mut recorder = Recorder::default();

        let outcome = execute(&ctx, &store, false, &mut recorder).unwrap();
        assert!(!outcome.saved);
        assert!(store.saves().is_empty());
        assert_eq!(store.payload(), br#"{"0A":41,"0B":9}"#.to_vec());
        assert!(recorder.warnings.iter().any(|w| matches!(
            w,
            BoundaryWarning::SaveSkippedAfterLoadFailure { build_number, .. } if build_number == "0A1"
        )));
    }

    #[test]
    fn test_undecodable_payload_is_still_replaced() {
        let store = MemoryStore::with_payload(r#"{"0A":12,"0B":-1}"#);
        let ctx = DecisionContext::new("0Afeature", "abc123");
        let mut recorder = Recorder::default();

        let outcome = execute(&ctx, &store, false, &mut recorder).unwrap();
        assert_eq!(outcome.output, "0A1");
        assert!(outcome.saved);
        assert_eq!(store.payload(), br#"{"0A":1}"#.to_vec());
        assert!(matches!(
            recorder.warnings.as_slice(),
            [BoundaryWarning::UndecodableCounters { .. }]
        ));
    }

    #[test]
    fn test_save_failure_is_only_a_warning() {
        let store = MemoryStore::with_payload(r#"{"0A": 5}"#).failing_save();
        let ctx = DecisionContext::new("0Afeature", "abc123");
        let mut recorder = Recorder::default();

        let outcome = execute(&ctx, &store, false, &mut recorder).unwrap();
        assert_eq!(outcome.output, "0A6");
        assert!(!outcome.saved);
        assert_eq!(recorder.lines, vec!["0A6"]);
        assert!(matches!(
            recorder.warnings.as_slice(),
            [BoundaryWarning::StoreSaveFailed { build_number, .. }] if build_number == "0A6"
        ));
    }

    #[test]
    fn test_fatal_prints_nothing_and_saves_nothing() {
        let store = MemoryStore::new();
        let ctx = DecisionContext::new("trunk", "abc123").on_default_branch();
        let mut recorder = Recorder::default();

        let err = execute(&ctx, &store, false, &mut recorder).unwrap_err();
        assert!(matches!(err, BuildNumberError::NoFallbackKey));
        assert!(recorder.lines.is_empty());
        assert!(store.saves().is_empty());
    }
}
