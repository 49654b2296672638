use crate::errors::ApiError;
use crate::models::ApiObject;
use thiserror::Error;

pub mod memory;

pub use memory::InMemoryStore;

/// Errors that can occur during store operations
#[derive(Debug, Error, PartialEq)]
pub enum StorageError {
    #[error("{resource} \"{name}\" not found")]
    NotFound { resource: &'static str, name: String },
    #[error("{resource} \"{name}\" already exists")]
    AlreadyExists { resource: &'static str, name: String },
    #[error("object name must not be empty")]
    EmptyName,
    #[error("{resource} store is full ({capacity} objects)")]
    CapacityExceeded { resource: &'static str, capacity: u64 },
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { resource, name } => ApiError::not_found(resource, &name),
            StorageError::AlreadyExists { resource, name } => {
                ApiError::already_exists(resource, &name)
            }
            StorageError::EmptyName => ApiError::bad_request(err.to_string()),
            StorageError::CapacityExceeded { .. } => ApiError::internal(err),
        }
    }
}

/// Typed store for a single resource, keyed by object name.
///
/// Implementations must be thread-safe so a single store can be shared by
/// every handler and authenticator.
#[async_trait::async_trait]
pub trait ResourceStore<T>: Send + Sync
where
    T: ApiObject + Clone + 'static,
{
    /// Persist a new object, failing if the name is taken
    async fn create(&self, object: T) -> Result<T, StorageError>;

    /// Look up an object by name
    async fn get(&self, name: &str) -> Result<Option<T>, StorageError>;

    /// Replace an existing object
    async fn update(&self, object: T) -> Result<T, StorageError>;

    /// Remove an object and return what was stored
    async fn delete(&self, name: &str) -> Result<T, StorageError>;

    /// Returns Ok(()) if healthy, or Err with a descriptive message if unhealthy.
    async fn health_check(&self) -> Result<(), String>;
}
