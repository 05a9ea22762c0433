//! Read-through listing cache.
//!
//! Wraps pharmacy list/detail reads behind a fixed-TTL in-memory cache.
//! Keys are derived from the operation name plus the full, canonicalized
//! set of query parameters, so distinct filters get distinct entries.
//! Any write to the cached entity clears the entire namespace: a coarse
//! invalidation that favors correctness over cache efficiency.
//!
//! The cache is best-effort: callers treat any cache failure as a miss
//! and fall through to the store (see `ApiContext::cache_get`).

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default time-to-live for cached listings: 5 minutes.
pub const DEFAULT_TTL_SECS: u64 = 300;

struct CacheEntry {
    inserted_at: Instant,
    value: serde_json::Value,
}

/// TTL cache over serialized response bodies.
pub struct ListingCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ListingCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Build a cache key from an operation name and its query parameters.
    /// Parameters are sorted so `?a=1&b=2` and `?b=2&a=1` share an entry.
    pub fn key(operation: &str, params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<(&str, &str)> = params.to_vec();
        sorted.sort();
        let mut key = String::from(operation);
        for (name, value) in sorted {
            key.push_str(&format!("&{name}={value}"));
        }
        key
    }

    /// Fetch a fresh entry, or `None` on miss/expiry.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let entry = self.entries.get(key)?;
        if entry.inserted_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn put(&mut self, key: String, value: serde_json::Value) {
        self.entries.insert(
            key,
            CacheEntry {
                inserted_at: Instant::now(),
                value,
            },
        );
    }

    /// Clear the whole namespace. Called on every write to the cached
    /// entity so no stale read survives a write.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TTL_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn miss_then_hit() {
        let mut cache = ListingCache::default();
        let key = ListingCache::key("pharmacies:list", &[]);
        assert!(cache.get(&key).is_none());

        cache.put(key.clone(), json!({"pharmacies": []}));
        assert_eq!(cache.get(&key).unwrap(), json!({"pharmacies": []}));
    }

    #[test]
    fn distinct_params_get_distinct_entries() {
        let mut cache = ListingCache::default();
        let all = ListingCache::key("pharmacies:list", &[]);
        let filtered = ListingCache::key("pharmacies:list", &[("search", "apollo")]);
        assert_ne!(all, filtered);

        cache.put(all.clone(), json!(1));
        cache.put(filtered.clone(), json!(2));
        assert_eq!(cache.get(&all).unwrap(), json!(1));
        assert_eq!(cache.get(&filtered).unwrap(), json!(2));
    }

    #[test]
    fn key_is_order_insensitive() {
        let a = ListingCache::key("op", &[("a", "1"), ("b", "2")]);
        let b = ListingCache::key("op", &[("b", "2"), ("a", "1")]);
        assert_eq!(a, b);
    }

    #[test]
    fn entries_expire_after_ttl() {
        let mut cache = ListingCache::new(Duration::from_millis(0));
        cache.put("k".into(), json!(true));
        assert!(cache.get("k").is_none(), "zero TTL entry is already stale");
    }

    #[test]
    fn invalidate_all_clears_every_key() {
        let mut cache = ListingCache::default();
        cache.put("a".into(), json!(1));
        cache.put("b".into(), json!(2));
        assert_eq!(cache.len(), 2);

        cache.invalidate_all();
        assert!(cache.is_empty());
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn put_replaces_existing_value() {
        let mut cache = ListingCache::default();
        cache.put("k".into(), json!("old"));
        cache.put("k".into(), json!("new"));
        assert_eq!(cache.get("k").unwrap(), json!("new"));
        assert_eq!(cache.len(), 1);
    }
}
