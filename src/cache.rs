// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LRU cache for rendered read-only responses.
//!
//! Entries are keyed by request path (e.g. `/marketplace/collections/genesis`)
//! and hold the JSON body that was served. `POST /revalidate` drops a path
//! and everything beneath it. Paths are compared after [`normalize_path`],
//! so `/marketplace/collections/gen%65sis/` and
//! `/marketplace/collections/genesis` share one entry.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use percent_encoding::percent_decode_str;
use serde_json::Value;

/// Canonical cache key for a request path: percent-decoded, with empty
/// segments dropped and no trailing slash.
pub fn normalize_path(path: &str) -> String {
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    let segments: Vec<&str> = decoded.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Cached entry: response body + insertion timestamp.
struct CacheEntry {
    body: Value,
    inserted_at: Instant,
}

/// In-process LRU cache for hot read paths.
pub struct ResponseCache {
    cache: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a new cache with the given capacity and TTL.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl,
        }
    }

    /// Get the cached body for a path.
    ///
    /// Returns `None` if not cached or expired.
    pub fn get(&self, path: &str) -> Option<Value> {
        let key = normalize_path(path);
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(&key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.body.clone());
            }
            cache.pop(&key);
        }
        None
    }

    pub fn put(&self, path: &str, body: Value) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                normalize_path(path),
                CacheEntry {
                    body,
                    inserted_at: Instant::now(),
                },
            );
        }
    }

    /// Drop `path` and every cached path below it. Returns how many entries
    /// were removed.
    pub fn invalidate_path(&self, path: &str) -> usize {
        let Ok(mut cache) = self.cache.lock() else {
            return 0;
        };

        let path = normalize_path(path);
        let prefix = format!("{path}/");
        let stale: Vec<String> = cache
            .iter()
            .map(|(key, _)| key)
            .filter(|key| path == "/" || **key == path || key.starts_with(&prefix))
            .cloned()
            .collect();

        for key in &stale {
            cache.pop(key);
        }
        stale.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cache_put_and_get() {
        let cache = ResponseCache::new(10, Duration::from_secs(300));

        assert!(cache.get("/marketplace/collections").is_none());
        cache.put("/marketplace/collections", json!([{"slug": "genesis"}]));

        let body = cache.get("/marketplace/collections").unwrap();
        assert_eq!(body[0]["slug"], "genesis");
    }

    #[test]
    fn cache_expiry() {
        let cache = ResponseCache::new(10, Duration::from_millis(1));
        cache.put("/a", json!(1));

        std::thread::sleep(Duration::from_millis(10));

        assert!(cache.get("/a").is_none());
    }

    #[test]
    fn cache_lru_eviction() {
        let cache = ResponseCache::new(2, Duration::from_secs(300));
        cache.put("/a", json!(1));
        cache.put("/b", json!(2));
        cache.put("/c", json!(3));

        assert!(cache.get("/a").is_none());
        assert!(cache.get("/b").is_some());
        assert!(cache.get("/c").is_some());
    }

    #[test]
    fn invalidate_covers_sub_paths_only() {
        let cache = ResponseCache::new(10, Duration::from_secs(300));
        cache.put("/marketplace/collections", json!([]));
        cache.put("/marketplace/collections/genesis", json!({}));
        cache.put("/marketplace/collections-archive", json!([]));
        cache.put("/contract", json!([]));

        assert_eq!(cache.invalidate_path("/marketplace/collections"), 2);
        assert!(cache.get("/marketplace/collections").is_none());
        assert!(cache.get("/marketplace/collections/genesis").is_none());
        assert!(cache.get("/marketplace/collections-archive").is_some());
        assert!(cache.get("/contract").is_some());
    }

    #[test]
    fn paths_are_normalized() {
        assert_eq!(normalize_path("/marketplace/collections/"), "/marketplace/collections");
        assert_eq!(normalize_path("//marketplace//collections"), "/marketplace/collections");
        assert_eq!(
            normalize_path("/marketplace/collections/gen%65sis"),
            "/marketplace/collections/genesis"
        );
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn encoded_variants_share_an_entry() {
        let cache = ResponseCache::new(10, Duration::from_secs(300));
        cache.put("/marketplace/collections/gen%65sis", json!({"slug": "genesis"}));

        assert!(cache.get("/marketplace/collections/genesis/").is_some());
        assert_eq!(cache.invalidate_path("/marketplace/collections/genesis"), 1);
        assert!(cache.get("/marketplace/collections/gen%65sis").is_none());

        cache.put("/marketplace/collections/genesis", json!({}));
        assert_eq!(cache.invalidate_path("/marketplace/%63ollections/"), 1);
    }

    #[test]
    fn invalidate_root_clears_everything() {
        let cache = ResponseCache::new(10, Duration::from_secs(300));
        cache.put("/a", json!(1));
        cache.put("/b/c", json!(2));

        assert_eq!(cache.invalidate_path("/"), 2);
        assert!(cache.get("/a").is_none());
    }
}
