//! In-memory object store.
//!
//! Data is lost on restart. Counts writes so callers can assert on them.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ObjectStore, PutOutcome, StoreError};

/// In-memory store keyed by `(bucket, key)`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: DashMap<(String, String), Vec<u8>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without counting it as a write.
    pub fn with_object(self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) -> Self {
        self.objects
            .insert((bucket.to_string(), key.to_string()), body.into());
        self
    }

    /// Number of successful writes performed through the trait.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|r| r.value().clone())
            .ok_or_else(|| StoreError::not_found(bucket, key))
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        self.objects.insert((bucket.to_string(), key.to_string()), body);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn put_if_absent(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<PutOutcome, StoreError> {
        match self.objects.entry((bucket.to_string(), key.to_string())) {
            Entry::Occupied(_) => Ok(PutOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(body);
                self.writes.fetch_add(1, Ordering::SeqCst);
                Ok(PutOutcome::Created)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get("bucket", "key").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_buckets_are_separate() {
        let store = MemoryStore::new().with_object("a", "key", "one");
        assert_eq!(store.get("a", "key").await.unwrap(), b"one");
        assert!(store.get("b", "key").await.unwrap_err().is_not_found());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_put_if_absent_keeps_first_value() {
        let store = MemoryStore::new();
        let first = store.put_if_absent("b", "k", b"first".to_vec()).await.unwrap();
        let second = store.put_if_absent("b", "k", b"second".to_vec()).await.unwrap();

        assert_eq!(first, PutOutcome::Created);
        assert_eq!(second, PutOutcome::AlreadyExists);
        assert_eq!(store.get("b", "k").await.unwrap(), b"first");
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryStore::new().with_object("b", "k", "old");
        store.put("b", "k", b"new".to_vec()).await.unwrap();
        assert_eq!(store.get("b", "k").await.unwrap(), b"new");
        assert_eq!(store.len(), 1);
    }
}
