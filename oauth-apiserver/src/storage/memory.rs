use super::{ResourceStore, StorageError};
use crate::models::ApiObject;
use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache as MokaCache;
use moka::ops::compute::Op;

/// In-memory store backed by Moka.
///
/// Objects are never evicted. Creates are rejected once `capacity` objects
/// are stored.
#[derive(Clone)]
pub struct InMemoryStore<T: Clone + Send + Sync + 'static> {
    resource: &'static str,
    capacity: u64,
    objects: MokaCache<String, T>,
}

impl<T: Clone + Send + Sync + 'static> InMemoryStore<T> {
    /// Initialize a new store for `resource` holding up to `capacity` objects
    pub fn new(resource: &'static str, capacity: u64) -> Self {
        let objects = MokaCache::builder().build();
        Self {
            resource,
            capacity,
            objects,
        }
    }

    fn not_found(&self, name: &str) -> StorageError {
        StorageError::NotFound {
            resource: self.resource,
            name: name.to_string(),
        }
    }
}

/// Server-owned metadata filled in on create
pub trait Persisted {
    fn stamp_creation(&mut self);
}

impl Persisted for crate::models::OAuthAccessToken {
    fn stamp_creation(&mut self) {
        if self.metadata.creation_timestamp.is_none() {
            self.metadata.creation_timestamp = Some(Utc::now());
        }
    }
}

impl Persisted for crate::models::User {
    fn stamp_creation(&mut self) {
        if self.metadata.creation_timestamp.is_none() {
            self.metadata.creation_timestamp = Some(Utc::now());
        }
    }
}

#[async_trait]
impl<T> ResourceStore<T> for InMemoryStore<T>
where
    T: ApiObject + Persisted + Clone + 'static,
{
    async fn create(&self, mut object: T) -> Result<T, StorageError> {
        let name = object.name().to_string();
        if name.is_empty() {
            return Err(StorageError::EmptyName);
        }
        object.stamp_creation();

        // entry_count lags behind writes until pending tasks run
        self.objects.run_pending_tasks().await;
        if self.objects.entry_count() >= self.capacity && !self.objects.contains_key(&name) {
            return Err(StorageError::CapacityExceeded {
                resource: self.resource,
                capacity: self.capacity,
            });
        }

        let entry = self
            .objects
            .entry(name.clone())
            .or_insert_with(async { object.clone() })
            .await;
        if !entry.is_fresh() {
            return Err(StorageError::AlreadyExists {
                resource: self.resource,
                name,
            });
        }
        Ok(entry.into_value())
    }

    async fn get(&self, name: &str) -> Result<Option<T>, StorageError> {
        Ok(self.objects.get(name).await)
    }

    async fn update(&self, object: T) -> Result<T, StorageError> {
        let name = object.name().to_string();
        let replacement = object.clone();
        let result = self
            .objects
            .entry(name.clone())
            .and_compute_with(|existing| async move {
                match existing {
                    Some(_) => Op::Put(replacement),
                    None => Op::Nop,
                }
            })
            .await;

        match result.into_entry() {
            Some(_) => Ok(object),
            None => Err(self.not_found(&name)),
        }
    }

    async fn delete(&self, name: &str) -> Result<T, StorageError> {
        self.objects
            .remove(name)
            .await
            .ok_or_else(|| self.not_found(name))
    }

    async fn health_check(&self) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ObjectMeta, OAuthAccessToken, User};

    fn token(name: &str) -> OAuthAccessToken {
        OAuthAccessToken {
            metadata: ObjectMeta::named(name),
            user_name: "alice".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_store_operations() {
        let store = InMemoryStore::new("oauthaccesstokens", 128);

        let created = store.create(token("tok")).await.unwrap();
        assert!(created.metadata.creation_timestamp.is_some());

        let fetched = store.get("tok").await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(store.get("missing").await.unwrap().is_none());

        let deleted = store.delete("tok").await.unwrap();
        assert_eq!(deleted.user_name, "alice");
        assert!(store.get("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate() {
        let store = InMemoryStore::new("users", 128);
        let user = User {
            metadata: ObjectMeta::named("alice"),
            ..Default::default()
        };

        store.create(user.clone()).await.unwrap();
        let result = store.create(user).await;
        assert_eq!(
            result,
            Err(StorageError::AlreadyExists {
                resource: "users",
                name: "alice".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_create_rejected_at_capacity() {
        let store = InMemoryStore::new("oauthaccesstokens", 2);
        store.create(token("first")).await.unwrap();
        store.create(token("second")).await.unwrap();

        let result = store.create(token("third")).await;
        assert_eq!(
            result,
            Err(StorageError::CapacityExceeded {
                resource: "oauthaccesstokens",
                capacity: 2
            })
        );
        assert!(matches!(
            store.create(token("first")).await,
            Err(StorageError::AlreadyExists { .. })
        ));

        assert!(store.get("first").await.unwrap().is_some());
        assert!(store.get("second").await.unwrap().is_some());
        assert!(store.get("third").await.unwrap().is_none());

        store.delete("first").await.unwrap();
        store.create(token("third")).await.unwrap();
        assert!(store.get("second").await.unwrap().is_some());
        assert!(store.get("third").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let store: InMemoryStore<User> = InMemoryStore::new("users", 128);
        let result = store.create(User::default()).await;
        assert_eq!(result, Err(StorageError::EmptyName));
    }

    #[tokio::test]
    async fn test_update() {
        let store = InMemoryStore::new("oauthaccesstokens", 128);
        let result = store.update(token("tok")).await;
        assert!(matches!(result, Err(StorageError::NotFound { .. })));

        let mut created = store.create(token("tok")).await.unwrap();
        created.inactivity_timeout_seconds = 600;
        store.update(created).await.unwrap();

        let fetched = store.get("tok").await.unwrap().unwrap();
        assert_eq!(fetched.inactivity_timeout_seconds, 600);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let store: InMemoryStore<OAuthAccessToken> = InMemoryStore::new("oauthaccesstokens", 128);
        let result = store.delete("missing").await;
        assert_eq!(
            result,
            Err(StorageError::NotFound {
                resource: "oauthaccesstokens",
                name: "missing".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_health_check() {
        let store: InMemoryStore<User> = InMemoryStore::new("users", 1);
        let result = store.health_check().await;
        assert!(result.is_ok(), "health check failed: {:?}", result);
    }
}
