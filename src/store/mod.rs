//! Sharded key-value store
//!
//! Shared in-memory storage used by both the credential and session stores.
//! Keys hash to one of N shards, each behind its own RwLock, so a write only
//! contends with operations on the same shard rather than a global lock.
//! Every lock acquisition is bounded by a timeout; elapse surfaces as
//! `StoreError::Unavailable` instead of blocking indefinitely.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::time::timeout;

use crate::error::StoreError;

/// Sharded map with bounded lock acquisition
pub struct ShardedMap<V> {
    shards: Vec<RwLock<HashMap<String, V>>>,
    op_timeout: Duration,
}

impl<V: Clone> ShardedMap<V> {
    pub fn new(shard_count: usize, op_timeout: Duration) -> Self {
        let shards = (0..shard_count.max(1))
            .map(|_| RwLock::new(HashMap::new()))
            .collect();
        Self { shards, op_timeout }
    }

    fn shard_index(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    async fn read_shard(
        &self,
        index: usize,
        op: &str,
    ) -> Result<RwLockReadGuard<'_, HashMap<String, V>>, StoreError> {
        timeout(self.op_timeout, self.shards[index].read())
            .await
            .map_err(|_| StoreError::Unavailable(op.to_string()))
    }

    async fn write_shard(
        &self,
        index: usize,
        op: &str,
    ) -> Result<RwLockWriteGuard<'_, HashMap<String, V>>, StoreError> {
        timeout(self.op_timeout, self.shards[index].write())
            .await
            .map_err(|_| StoreError::Unavailable(op.to_string()))
    }

    /// Look up a value by key, returning a clone
    pub async fn get(&self, key: &str) -> Result<Option<V>, StoreError> {
        let shard = self.read_shard(self.shard_index(key), "get").await?;
        Ok(shard.get(key).cloned())
    }

    /// Insert a value, returning the previous one if any
    pub async fn insert(&self, key: String, value: V) -> Result<Option<V>, StoreError> {
        let mut shard = self.write_shard(self.shard_index(&key), "insert").await?;
        Ok(shard.insert(key, value))
    }

    /// Remove a value, returning it if present
    pub async fn remove(&self, key: &str) -> Result<Option<V>, StoreError> {
        let mut shard = self.write_shard(self.shard_index(key), "remove").await?;
        Ok(shard.remove(key))
    }

    /// Apply a mutation to an existing value in place
    pub async fn update<F, R>(&self, key: &str, apply: F) -> Result<Option<R>, StoreError>
    where
        F: FnOnce(&mut V) -> R,
    {
        let mut shard = self.write_shard(self.shard_index(key), "update").await?;
        Ok(shard.get_mut(key).map(apply))
    }

    /// Drop every entry the predicate rejects, returning how many were removed
    pub async fn retain<F>(&self, keep: F) -> Result<usize, StoreError>
    where
        F: Fn(&String, &V) -> bool,
    {
        let mut removed = 0;
        for index in 0..self.shards.len() {
            let mut shard = self.write_shard(index, "retain").await?;
            let before = shard.len();
            shard.retain(|k, v| keep(k, v));
            removed += before - shard.len();
        }
        Ok(removed)
    }

    /// Total number of entries across all shards
    pub async fn len(&self) -> Result<usize, StoreError> {
        let mut total = 0;
        for index in 0..self.shards.len() {
            let shard = self.read_shard(index, "len").await?;
            total += shard.len();
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> ShardedMap<u32> {
        ShardedMap::new(4, Duration::from_millis(100))
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let map = map();
        assert_eq!(map.insert("a".to_string(), 1).await.unwrap(), None);
        assert_eq!(map.insert("a".to_string(), 2).await.unwrap(), Some(1));
        assert_eq!(map.get("a").await.unwrap(), Some(2));
        assert_eq!(map.remove("a").await.unwrap(), Some(2));
        assert_eq!(map.get("a").await.unwrap(), None);
        assert_eq!(map.remove("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_in_place() {
        let map = map();
        map.insert("n".to_string(), 10).await.unwrap();
        let doubled = map.update("n", |v| { *v *= 2; *v }).await.unwrap();
        assert_eq!(doubled, Some(20));
        assert_eq!(map.update("missing", |v| *v).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_retain_counts_removals() {
        let map = map();
        for i in 0..10u32 {
            map.insert(format!("k{}", i), i).await.unwrap();
        }
        let removed = map.retain(|_, v| *v % 2 == 0).await.unwrap();
        assert_eq!(removed, 5);
        assert_eq!(map.len().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_held_write_lock_times_out() {
        let map = ShardedMap::new(1, Duration::from_millis(20));
        map.insert("k".to_string(), 1).await.unwrap();

        // Hold the only shard's write lock so the get cannot acquire it
        let guard = map.shards[0].write().await;
        let result = map.get("k").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        drop(guard);

        assert_eq!(map.get("k").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_keys_spread_across_shards() {
        let map = ShardedMap::new(8, Duration::from_millis(100));
        for i in 0..64u32 {
            map.insert(format!("key-{}", i), i).await.unwrap();
        }
        assert_eq!(map.len().await.unwrap(), 64);
        let populated = map
            .shards
            .iter()
            .filter(|s| !s.try_read().unwrap().is_empty())
            .count();
        assert!(populated > 1);
    }
}
