use confique::Config;

/// Configuration for the in-memory resource stores
#[derive(Debug, Config, Clone)]
pub struct StorageConfig {
    /// Maximum number of objects kept per resource (default: 100000)
    #[config(env = "OAUTH_APISERVER_STORAGE_CAPACITY", default = 100000)]
    pub capacity: u64,
}
