use crate::error::{BuildNumberError, Result};
use crate::store::BuildNumberStore;
use std::sync::Mutex;

/// In-process store for testing without network or filesystem access
#[derive(Debug, Default)]
pub struct MemoryStore {
    payload: Mutex<Vec<u8>>,
    saves: Mutex<Vec<Vec<u8>>>,
    fail_load: bool,
    fail_save: bool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `payload`
    pub fn with_payload(payload: impl Into<Vec<u8>>) -> Self {
        MemoryStore {
            payload: Mutex::new(payload.into()),
            ..Self::default()
        }
    }

    /// Make every load fail, as an unreachable remote would
    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    /// Make every save fail
    pub fn failing_save(mut self) -> Self {
        self.fail_save = true;
        self
    }

    /// The payload currently stored
    pub fn payload(&self) -> Vec<u8> {
        self.payload.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Every payload passed to `save`, oldest first
    pub fn saves(&self) -> Vec<Vec<u8>> {
        self.saves.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl BuildNumberStore for MemoryStore {
    fn load(&self) -> Result<Vec<u8>> {
        if self.fail_load {
            return Err(BuildNumberError::store("memory store configured to fail loads"));
        }
        Ok(self.payload())
    }

    fn save(&self, payload: &[u8]) -> Result<()> {
        if let Ok(mut saves) = self.saves.lock() {
            saves.push(payload.to_vec());
        }
        if self.fail_save {
            return Err(BuildNumberError::store("memory store configured to fail saves"));
        }
        let mut current = self
            .payload
            .lock()
            .map_err(|_| BuildNumberError::store("memory store lock poisoned"))?;
        *current = payload.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}
