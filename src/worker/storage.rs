//! Cache bucket storage abstraction.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::CachedResponse;
use crate::error::Result;

/// Named buckets of URL → response entries.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Lists the names of all existing buckets.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Deletes a bucket. Returns false if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool>;

    /// Stores all entries in a bucket, creating the bucket if needed.
    ///
    /// Entries already present under the same URL are replaced.
    async fn put_all(&self, name: &str, entries: Vec<(String, CachedResponse)>) -> Result<()>;

    /// Looks up the entry stored for `url` in a bucket.
    ///
    /// A missing bucket behaves like an empty one.
    async fn match_url(&self, name: &str, url: &str) -> Result<Option<CachedResponse>>;
}

/// In-memory cache storage.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    buckets: RwLock<BTreeMap<String, HashMap<String, CachedResponse>>>,
}

impl MemoryCacheStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether a bucket exists.
    pub async fn has(&self, name: &str) -> bool {
        self.buckets.read().await.contains_key(name)
    }

    /// Returns the number of entries in a bucket, if it exists.
    pub async fn entry_count(&self, name: &str) -> Option<usize> {
        self.buckets.read().await.get(name).map(HashMap::len)
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.buckets.read().await.keys().cloned().collect())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        Ok(self.buckets.write().await.remove(name).is_some())
    }

    async fn put_all(&self, name: &str, entries: Vec<(String, CachedResponse)>) -> Result<()> {
        self.buckets
            .write()
            .await
            .entry(name.to_string())
            .or_default()
            .extend(entries);
        Ok(())
    }

    async fn match_url(&self, name: &str, url: &str) -> Result<Option<CachedResponse>> {
        Ok(self
            .buckets
            .read()
            .await
            .get(name)
            .and_then(|bucket| bucket.get(url))
            .cloned())
    }
}
