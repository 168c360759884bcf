//! Scoped in-memory query cache.
//!
//! Read paths register each cached query under a named scope (e.g.
//! `settings`, `pages`); write paths call [`ScopedCache::invalidate`] with
//! the scope so every projection derived from the mutated table is dropped
//! at once. Entries also carry a TTL so other sessions converge even
//! without a local write.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Duration,
};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.map_or(false, |exp| Utc::now() > exp)
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub invalidations: u64,
}

#[derive(Clone)]
pub struct ScopedCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    scopes: Arc<RwLock<HashMap<String, HashSet<String>>>>,
    stats: Arc<RwLock<CacheStats>>,
    default_ttl: Option<Duration>,
}

impl ScopedCache {
    pub fn new(default_ttl: Option<Duration>) -> Self {
        ScopedCache {
            entries: Arc::new(RwLock::new(HashMap::new())),
            scopes: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(CacheStats::default())),
            default_ttl,
        }
    }

    pub async fn get<V>(&self, key: &str) -> Option<V>
    where
        V: DeserializeOwned,
    {
        let cached = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(e) if !e.is_expired() => Some(e.value.clone()),
                _ => None,
            }
        };

        match cached {
            Some(value) => {
                self.stats.write().await.hits += 1;
                serde_json::from_value(value).ok()
            }
            None => {
                self.stats.write().await.misses += 1;
                None
            }
        }
    }

    pub async fn set<V>(&self, scope: &str, key: &str, value: &V)
    where
        V: Serialize,
    {
        let json = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Failed to serialize cache value for {}: {}", key, e);
                return;
            }
        };

        let expires_at = self
            .default_ttl
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .map(|d| Utc::now() + d);

        self.entries.write().await.insert(
            key.to_string(),
            CacheEntry {
                value: json,
                expires_at,
            },
        );
        self.scopes
            .write()
            .await
            .entry(scope.to_string())
            .or_default()
            .insert(key.to_string());
        self.stats.write().await.sets += 1;
    }

    /// Drops every entry registered under `scope`.
    pub async fn invalidate(&self, scope: &str) {
        let keys = self.scopes.write().await.remove(scope);
        if let Some(keys) = keys {
            let mut entries = self.entries.write().await;
            for key in &keys {
                entries.remove(key);
            }
            self.stats.write().await.invalidations += 1;
            tracing::debug!("Invalidated cache scope '{}' ({} entries)", scope, keys.len());
        }
    }

    /// Drops a single entry, leaving the rest of its scope intact.
    pub async fn invalidate_key(&self, key: &str) {
        if self.entries.write().await.remove(key).is_some() {
            self.deregister(&[key.to_string()]).await;
            self.stats.write().await.invalidations += 1;
        }
    }

    /// Removes dropped keys from the scope index so it tracks live entries
    /// only. Scopes left empty are removed outright.
    async fn deregister(&self, keys: &[String]) {
        let mut scopes = self.scopes.write().await;
        for members in scopes.values_mut() {
            for key in keys {
                members.remove(key);
            }
        }
        scopes.retain(|_, members| !members.is_empty());
    }

    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }

    /// Removes expired entries; called from a periodic background task.
    pub async fn cleanup_expired(&self) -> usize {
        let expired: Vec<String> = {
            let mut entries = self.entries.write().await;
            let expired: Vec<String> = entries
                .iter()
                .filter(|(_, e)| e.is_expired())
                .map(|(k, _)| k.clone())
                .collect();
            for key in &expired {
                entries.remove(key);
            }
            expired
        };
        if !expired.is_empty() {
            self.deregister(&expired).await;
        }
        expired.len()
    }

    /// Number of keys currently registered in the scope index.
    pub async fn scope_index_len(&self) -> usize {
        self.scopes.read().await.values().map(HashSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let cache = ScopedCache::new(None);
        cache.set("settings", "settings:list", &vec!["a", "b"]).await;

        let value: Option<Vec<String>> = cache.get("settings:list").await;
        assert_eq!(value, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[tokio::test]
    async fn test_invalidate_scope_drops_all_entries() {
        let cache = ScopedCache::new(None);
        cache.set("settings", "settings:list", &1u32).await;
        cache.set("settings", "settings:map", &2u32).await;
        cache.set("pages", "pages:list", &3u32).await;

        cache.invalidate("settings").await;

        assert_eq!(cache.get::<u32>("settings:list").await, None);
        assert_eq!(cache.get::<u32>("settings:map").await, None);
        // Other scopes are untouched
        assert_eq!(cache.get::<u32>("pages:list").await, Some(3));
    }

    #[tokio::test]
    async fn test_invalidate_single_key() {
        let cache = ScopedCache::new(None);
        cache.set("pages", "pages:about", &"x").await;
        cache.set("pages", "pages:list", &"y").await;

        cache.invalidate_key("pages:about").await;

        assert_eq!(cache.get::<String>("pages:about").await, None);
        assert_eq!(cache.get::<String>("pages:list").await, Some("y".to_string()));
    }

    #[tokio::test]
    async fn test_cleanup_deregisters_expired_keys_from_scope_index() {
        let cache = ScopedCache::new(Some(Duration::from_secs(0)));
        for i in 0..100 {
            cache
                .set("settings", &format!("settings:category:{}", i), &i)
                .await;
        }
        assert_eq!(cache.scope_index_len().await, 100);

        assert_eq!(cache.cleanup_expired().await, 100);

        // The scope index must not retain names for entries that no longer
        // exist, or it grows without bound under per-string cache keys.
        assert_eq!(cache.scope_index_len().await, 0);
        assert!(cache.entries.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_key_deregisters_from_scope_index() {
        let cache = ScopedCache::new(None);
        cache.set("pages", "pages:about", &"x").await;
        cache.set("pages", "pages:list", &"y").await;

        cache.invalidate_key("pages:about").await;

        assert_eq!(cache.scope_index_len().await, 1);
        let scopes = cache.scopes.read().await;
        assert!(!scopes["pages"].contains("pages:about"));
        assert!(scopes["pages"].contains("pages:list"));
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = ScopedCache::new(Some(Duration::from_secs(0)));
        cache.set("settings", "settings:list", &1u32).await;

        assert_eq!(cache.get::<u32>("settings:list").await, None);
        assert_eq!(cache.cleanup_expired().await, 1);
    }
}
