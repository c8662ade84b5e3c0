//! Tag-indexed read cache.
//!
//! Cached queries register under one or more tags; a mutation invalidates a
//! tag and every entry filed under it is dropped in one call. Loads for the
//! same key are coalesced by `moka`; load errors are returned, not cached.

use std::{
    collections::{HashMap, HashSet},
    future::Future,
    sync::Arc,
    time::Duration,
};

use moka::future::Cache;
use tokio::sync::RwLock;

use crate::errors::ServiceError;

pub struct TagCache<V> {
    entries: Cache<String, V>,
    tags: RwLock<HashMap<String, HashSet<String>>>,
}

impl<V: Clone + Send + Sync + 'static> TagCache<V> {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            entries: Cache::builder().max_capacity(max_capacity).time_to_live(ttl).build(),
            tags: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch through the cache. On a miss the loader runs once and the key is
    /// registered under every given tag.
    pub async fn get_with<F>(
        &self,
        key: &str,
        tags: &[&str],
        loader: F,
    ) -> Result<V, ServiceError>
    where
        F: Future<Output = Result<V, ServiceError>>,
    {
        let value = self
            .entries
            .try_get_with(key.to_string(), loader)
            .await
            .map_err(|e: Arc<ServiceError>| (*e).clone())?;
        let mut index = self.tags.write().await;
        for tag in tags {
            index.entry((*tag).to_string()).or_default().insert(key.to_string());
        }
        Ok(value)
    }

    /// Drop every entry registered under `tag`.
    pub async fn invalidate(&self, tag: &str) {
        let keys = {
            let mut index = self.tags.write().await;
            index.remove(tag)
        };
        if let Some(keys) = keys {
            for key in keys {
                self.entries.invalidate(&key).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn cache() -> TagCache<u64> {
        TagCache::new(100, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn loader_runs_once_until_invalidated() {
        let cache = cache();
        let loads = AtomicUsize::new(0);

        for _ in 0..3 {
            let v = cache
                .get_with("contacts:count", &["contacts:count"], async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await
                .unwrap();
            assert_eq!(v, 7);
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        cache.invalidate("contacts:count").await;
        let v = cache
            .get_with("contacts:count", &["contacts:count"], async {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok(8)
            })
            .await
            .unwrap();
        assert_eq!(v, 8);
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_only_touches_tagged_keys() {
        let cache = cache();
        cache.get_with("a", &["contacts", "contacts:a"], async { Ok(1) }).await.unwrap();
        cache.get_with("b", &["contacts", "contacts:b"], async { Ok(2) }).await.unwrap();

        cache.invalidate("contacts:a").await;

        let loads = AtomicUsize::new(0);
        let b = cache
            .get_with("b", &["contacts", "contacts:b"], async {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok(99)
            })
            .await
            .unwrap();
        assert_eq!(b, 2, "untouched key must stay cached");
        let a = cache
            .get_with("a", &["contacts", "contacts:a"], async {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok(10)
            })
            .await
            .unwrap();
        assert_eq!(a, 10, "invalidated key must reload");
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn shared_tag_drops_every_registered_key() {
        let cache = cache();
        cache.get_with("a", &["contacts"], async { Ok(1) }).await.unwrap();
        cache.get_with("b", &["contacts"], async { Ok(2) }).await.unwrap();

        cache.invalidate("contacts").await;

        let loads = AtomicUsize::new(0);
        for key in ["a", "b"] {
            cache
                .get_with(key, &["contacts"], async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(0)
                })
                .await
                .unwrap();
        }
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn load_errors_are_not_cached() {
        let cache = cache();
        let err = cache
            .get_with("x", &["contacts"], async {
                Err(ServiceError::Db("boom".into()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Db(_)));

        let v = cache.get_with("x", &["contacts"], async { Ok(5) }).await.unwrap();
        assert_eq!(v, 5);
    }
}
