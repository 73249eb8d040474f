//! Persistence of the encoded build counters
//!
//! The decision engine never talks to storage directly. A run loads one
//! payload through [BuildNumberStore::load], and at most one updated payload is
//! written back through [BuildNumberStore::save]. Implementations:
//!
//! - [github::GitHubReleaseStore]: the description of a GitHub release
//! - [file::FileStore]: a local JSON file
//! - [memory::MemoryStore]: an in-process store for tests
//!
//! There is no compare-and-swap on save. Two CI jobs racing through
//! load and save can hand out the same number; the last save wins.

pub mod file;
pub mod github;
pub mod memory;

pub use file::FileStore;
pub use github::{GitHubReleaseStore, ReleaseCoordinates};
pub use memory::MemoryStore;

use crate::error::Result;

/// Load/save pair for the serialized build counters
pub trait BuildNumberStore {
    /// Fetch the stored payload; an absent payload is returned as empty bytes.
    fn load(&self) -> Result<Vec<u8>>;

    /// Replace the stored payload.
    fn save(&self, payload: &[u8]) -> Result<()>;

    /// Human readable location, used in logs and warnings
    fn describe(&self) -> String;
}
