//! # CRUD semantics over storage.
//!
//! [`Service`] enforces the distinction between `create` and `update` (a key
//! may only be created once, and only an existing key may be updated) and
//! attaches the user-facing messages the controller returns verbatim.

use std::sync::Arc;

use crate::error::AppError;
use crate::model::{Key, Value};
use crate::storage::Storage;

/// Message returned when `create` hits an existing key.
const MSG_ALREADY_EXISTS: &str = "Specified key already exists. Use update for existing key.";
/// Message returned when a lookup misses.
const MSG_NOT_FOUND: &str = "Specified key does not exist.";

/// CRUD operations over a [`Storage`] backend.
#[derive(Clone)]
pub struct Service {
    storage: Arc<dyn Storage>,
}

impl Service {
    /// Creates a service over the given storage backend.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Stores a new key; rejects keys that already exist.
    pub async fn create(&self, key: &Key, value: Value) -> Result<(), AppError> {
        match self.storage.get(key).await {
            Ok(_) => Err(AppError::already_exists(MSG_ALREADY_EXISTS)),
            Err(AppError::NotFound { .. }) => self.storage.put(key, value).await,
            Err(err) => Err(err),
        }
    }

    /// Reads the value stored under a key.
    pub async fn read(&self, key: &Key) -> Result<Value, AppError> {
        self.storage.get(key).await.map_err(Self::friendly_missing)
    }

    /// Replaces the value of an existing key; rejects missing keys.
    pub async fn update(&self, key: &Key, value: Value) -> Result<(), AppError> {
        self.storage
            .get(key)
            .await
            .map_err(Self::friendly_missing)?;
        self.storage.put(key, value).await
    }

    /// Removes a key; rejects missing keys.
    pub async fn delete(&self, key: &Key) -> Result<(), AppError> {
        self.storage
            .delete(key)
            .await
            .map_err(Self::friendly_missing)
    }

    /// Rewrites a storage-level `NotFound` into the user-facing message.
    fn friendly_missing(err: AppError) -> AppError {
        match err {
            AppError::NotFound { .. } => AppError::not_found(MSG_NOT_FOUND),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// In-memory storage double for service tests.
    #[derive(Default)]
    struct MemoryStorage {
        map: Mutex<HashMap<String, i64>>,
    }

    #[async_trait]
    impl Storage for MemoryStorage {
        async fn get(&self, key: &Key) -> Result<Value, AppError> {
            self.map
                .lock()
                .await
                .get(key.as_str())
                .copied()
                .map(Value::from)
                .ok_or_else(|| AppError::not_found("key not found"))
        }

        async fn put(&self, key: &Key, value: Value) -> Result<(), AppError> {
            self.map
                .lock()
                .await
                .insert(key.as_str().to_string(), value.get());
            Ok(())
        }

        async fn delete(&self, key: &Key) -> Result<(), AppError> {
            self.map
                .lock()
                .await
                .remove(key.as_str())
                .map(|_| ())
                .ok_or_else(|| AppError::not_found("key not found"))
        }
    }

    fn service() -> Service {
        Service::new(Arc::new(MemoryStorage::default()))
    }

    fn key(s: &str) -> Key {
        Key::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let svc = service();
        svc.create(&key("a"), Value::from(1)).await.unwrap();
        assert_eq!(svc.read(&key("a")).await.unwrap().get(), 1);
    }

    #[tokio::test]
    async fn test_create_existing_key_conflicts() {
        let svc = service();
        svc.create(&key("a"), Value::from(1)).await.unwrap();

        let err = svc.create(&key("a"), Value::from(2)).await.unwrap_err();
        assert_eq!(err.as_label(), "already_exists");
        assert_eq!(err.to_string(), MSG_ALREADY_EXISTS);
        // Original value untouched.
        assert_eq!(svc.read(&key("a")).await.unwrap().get(), 1);
    }

    #[tokio::test]
    async fn test_read_missing_key_is_not_found() {
        let err = service().read(&key("ghost")).await.unwrap_err();
        assert_eq!(err.as_label(), "not_found");
        assert_eq!(err.to_string(), MSG_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_requires_existing_key() {
        let svc = service();
        let err = svc.update(&key("a"), Value::from(2)).await.unwrap_err();
        assert_eq!(err.as_label(), "not_found");

        svc.create(&key("a"), Value::from(1)).await.unwrap();
        svc.update(&key("a"), Value::from(2)).await.unwrap();
        assert_eq!(svc.read(&key("a")).await.unwrap().get(), 2);
    }

    #[tokio::test]
    async fn test_delete_removes_and_rejects_missing() {
        let svc = service();
        svc.create(&key("a"), Value::from(1)).await.unwrap();
        svc.delete(&key("a")).await.unwrap();

        let err = svc.delete(&key("a")).await.unwrap_err();
        assert_eq!(err.as_label(), "not_found");
        assert_eq!(err.to_string(), MSG_NOT_FOUND);
    }
}
