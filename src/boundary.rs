use std::fmt;

/// Non-fatal conditions at the storage and environment boundaries.
/// The run continues; these are reported to the user on stderr.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Loading failed; the run continues with empty counters
    StoreLoadFailed { store: String, reason: String },
    /// The stored payload is not a counter mapping; treated as empty
    UndecodableCounters { store: String, reason: String },
    /// Loading failed, so saving was skipped to keep the stored counters intact
    SaveSkippedAfterLoadFailure { store: String, build_number: String },
    /// Saving failed; the printed build number was not recorded
    StoreSaveFailed { store: String, build_number: String, reason: String },
    /// `--local` was given but no git repository could be used
    LocalRepositoryUnavailable { reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::StoreLoadFailed { store, reason } => {
                write!(
                    f,
                    "Could not load build numbers from {}: {}; starting from empty counters",
                    store, reason
                )
            }
            BoundaryWarning::UndecodableCounters { store, reason } => {
                write!(
                    f,
                    "Build numbers in {} are unreadable ({}); starting from empty counters, \
                     saving will overwrite the stored payload",
                    store, reason
                )
            }
            BoundaryWarning::SaveSkippedAfterLoadFailure {
                store,
                build_number,
            } => {
                write!(
                    f,
                    "Not saving build number {} to {}: the stored counters could not be loaded",
                    build_number, store
                )
            }
            BoundaryWarning::StoreSaveFailed {
                store,
                build_number,
                reason,
            } => {
                write!(
                    f,
                    "Could not save build number {} to {}: {}",
                    build_number, store, reason
                )
            }
            BoundaryWarning::LocalRepositoryUnavailable { reason } => {
                write!(f, "No local git repository to read from: {}", reason)
            }
        }
    }
}
