use crate::domain::BranchKey;
use crate::error::{BuildNumberError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Build counters keyed by `"<buildtrain><minor>"`.
///
/// Persisted as a flat JSON object such as `{"0A":12,"0B":1}`. Keys are held
/// in byte-wise order, which is also the order the default-branch fallback
/// uses to pick the highest existing key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildCounters(BTreeMap<String, u64>);

impl BuildCounters {
    /// Create an empty set of counters
    pub fn new() -> Self {
        BuildCounters(BTreeMap::new())
    }

    /// Decode a stored payload.
    ///
    /// An empty payload (or a JSON `null`) decodes to an empty mapping. Any
    /// other payload that is not a flat object of non-negative integers is
    /// an error; callers that must degrade gracefully fall back to
    /// [`BuildCounters::new`].
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| BuildNumberError::codec(format!("payload is not UTF-8: {}", e)))?;
        if text.trim().is_empty() {
            return Ok(BuildCounters::new());
        }

        let decoded: Option<BTreeMap<String, u64>> = serde_json::from_str(text)
            .map_err(|e| BuildNumberError::codec(format!("invalid build counters: {}", e)))?;
        Ok(BuildCounters(decoded.unwrap_or_default()))
    }

    /// Encode the counters as a compact JSON object with sorted keys.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.0)
            .map_err(|e| BuildNumberError::codec(format!("cannot encode build counters: {}", e)))
    }

    /// Current counter for a key, if any
    pub fn get(&self, key: &BranchKey) -> Option<u64> {
        self.0.get(&key.to_key()).copied()
    }

    /// Set the counter for a key, returning the previous value
    pub fn insert(&mut self, key: &BranchKey, counter: u64) -> Option<u64> {
        self.0.insert(key.to_key(), counter)
    }

    /// Advance the counter for `key`: previous value plus one, or 1 when the
    /// key has never been used. Returns the new value.
    pub fn increment(&mut self, key: &BranchKey) -> Result<u64> {
        let next = match self.get(key) {
            Some(current) => current
                .checked_add(1)
                .ok_or_else(|| BuildNumberError::CounterOverflow(key.to_key()))?,
            None => 1,
        };
        self.insert(key, next);
        Ok(next)
    }

    /// The greatest stored key string in byte-wise order
    pub fn highest_key(&self) -> Option<&str> {
        self.0.keys().next_back().map(String::as_str)
    }

    /// Iterate over `(key, counter)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, u64)> for BuildCounters {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        BuildCounters(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, u64); N]> for BuildCounters {
    fn from(entries: [(&str, u64); N]) -> Self {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_flat_object() {
        let counters = BuildCounters::decode(br#"{"0A": 12, "0B": 1}"#).unwrap();
        assert_eq!(counters, BuildCounters::from([("0A", 12), ("0B", 1)]));
    }

    #[test]
    fn test_decode_empty_and_null_payloads() {
        assert!(BuildCounters::decode(b"").unwrap().is_empty());
        assert!(BuildCounters::decode(b"  \n").unwrap().is_empty());
        assert!(BuildCounters::decode(b"null").unwrap().is_empty());
        assert!(BuildCounters::decode(b"{}").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(BuildCounters::decode(b"Release notes for the storage release").is_err());
        assert!(BuildCounters::decode(br#"{"0A": "twelve"}"#).is_err());
        assert!(BuildCounters::decode(br#"{"0A": -1}"#).is_err());
        assert!(BuildCounters::decode(br#"[1, 2]"#).is_err());
        assert!(BuildCounters::decode(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_encode_is_compact_and_sorted() {
        let counters = BuildCounters::from([("0B", 1), ("0A", 12)]);
        let encoded = counters.encode().unwrap();
        assert_eq!(encoded, br#"{"0A":12,"0B":1}"#.to_vec());
    }

    #[test]
    fn test_encode_then_decode_preserves_counters() {
        let counters = BuildCounters::from([("0A", 6), ("0B", 2), ("10C", 99)]);
        let decoded = BuildCounters::decode(&counters.encode().unwrap()).unwrap();
        assert_eq!(decoded, counters);
    }

    #[test]
    fn test_increment_existing_and_new() {
        let mut counters = BuildCounters::from([("0A", 5)]);
        assert_eq!(counters.increment(&BranchKey::new("0", "A")).unwrap(), 6);
        assert_eq!(counters.increment(&BranchKey::new("0", "B")).unwrap(), 1);
        assert_eq!(counters, BuildCounters::from([("0A", 6), ("0B", 1)]));
    }

    #[test]
    fn test_increment_overflow_is_an_error() {
        let mut counters = BuildCounters::from([("0A", u64::MAX)]);
        let err = counters.increment(&BranchKey::new("0", "A")).unwrap_err();
        assert!(matches!(err, BuildNumberError::CounterOverflow(ref k) if k == "0A"));
        assert_eq!(counters.get(&BranchKey::new("0", "A")), Some(u64::MAX));
    }

    #[test]
    fn test_highest_key_is_string_order() {
        let counters = BuildCounters::from([("9B", 1), ("10A", 4)]);
        assert_eq!(counters.highest_key(), Some("9B"));
        assert_eq!(BuildCounters::new().highest_key(), None);
    }
}
