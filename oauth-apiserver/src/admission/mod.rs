//! Admission control for mutating requests.
//!
//! Plugins are registered by name in an explicitly constructed [`Plugins`]
//! registry and assembled into an [`AdmissionChain`] at startup.

use crate::authn::UserInfo;
use crate::errors::ApiError;
use crate::models::ApiObject;
use log::warn;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub mod audit_logouts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Connect,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupResource {
    pub group: String,
    pub resource: String,
}

impl GroupResource {
    pub fn new(group: &str, resource: &str) -> Self {
        Self {
            group: group.to_string(),
            resource: resource.to_string(),
        }
    }
}

impl fmt::Display for GroupResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

/// Everything an admission plugin may inspect about a request
#[derive(Debug)]
pub struct AdmissionAttributes {
    pub resource: GroupResource,
    pub operation: Operation,
    pub name: String,
    pub namespace: String,
    pub user: Option<UserInfo>,
    pub object: Option<Arc<dyn ApiObject>>,
    pub old_object: Option<Arc<dyn ApiObject>>,
    annotations: BTreeMap<String, String>,
}

impl AdmissionAttributes {
    pub fn new(resource: GroupResource, operation: Operation, name: &str) -> Self {
        Self {
            resource,
            operation,
            name: name.to_string(),
            namespace: String::new(),
            user: None,
            object: None,
            old_object: None,
            annotations: BTreeMap::new(),
        }
    }

    pub fn with_user(mut self, user: Option<UserInfo>) -> Self {
        self.user = user;
        self
    }

    pub fn with_object(mut self, object: Arc<dyn ApiObject>) -> Self {
        self.object = Some(object);
        self
    }

    pub fn with_old_object(mut self, object: Arc<dyn ApiObject>) -> Self {
        self.old_object = Some(object);
        self
    }

    /// Record an audit annotation. Keys are write-once: a second write with
    /// a different value is dropped.
    pub fn add_annotation(&mut self, key: &str, value: &str) {
        match self.annotations.get(key) {
            Some(existing) if existing != value => {
                warn!(
                    "Ignoring conflicting admission annotation {key}={value}, already set to {existing}"
                );
            }
            Some(_) => {}
            None => {
                self.annotations.insert(key.to_string(), value.to_string());
            }
        }
    }

    pub fn annotations(&self) -> &BTreeMap<String, String> {
        &self.annotations
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdmissionError {
    #[error("{resource} \"{name}\" is forbidden: {reason}")]
    Forbidden {
        resource: String,
        name: String,
        reason: String,
    },
    #[error("admission plugin \"{0}\" is not registered")]
    UnknownPlugin(String),
    #[error("failed to configure admission plugin \"{plugin}\": {reason}")]
    Config { plugin: String, reason: String },
}

impl AdmissionError {
    pub fn forbidden(attributes: &AdmissionAttributes, reason: String) -> Self {
        Self::Forbidden {
            resource: attributes.resource.to_string(),
            name: attributes.name.clone(),
            reason,
        }
    }
}

impl From<AdmissionError> for ApiError {
    fn from(err: AdmissionError) -> Self {
        match err {
            AdmissionError::Forbidden { .. } => ApiError::forbidden(err.to_string()),
            _ => ApiError::internal(err),
        }
    }
}

/// A validating admission plugin.
///
/// Plugins declare the operations they care about; the chain never calls
/// `validate` for any other operation.
pub trait AdmissionPlugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn operations(&self) -> &'static [Operation];

    fn validate(&self, attributes: &mut AdmissionAttributes) -> Result<(), AdmissionError>;

    fn handles(&self, operation: Operation) -> bool {
        self.operations().contains(&operation)
    }
}

/// Ordered list of plugins run for each mutating request
#[derive(Default)]
pub struct AdmissionChain {
    plugins: Vec<Box<dyn AdmissionPlugin>>,
}

impl AdmissionChain {
    pub fn new(plugins: Vec<Box<dyn AdmissionPlugin>>) -> Self {
        Self { plugins }
    }

    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run every interested plugin in order, stopping at the first error
    pub fn validate(&self, attributes: &mut AdmissionAttributes) -> Result<(), AdmissionError> {
        let operation = attributes.operation;
        for plugin in self.plugins.iter().filter(|p| p.handles(operation)) {
            plugin.validate(attributes)?;
        }
        Ok(())
    }
}

/// Builds a plugin from its optional configuration stream
pub type PluginFactory =
    Box<dyn Fn(Option<&mut dyn Read>) -> Result<Box<dyn AdmissionPlugin>, AdmissionError> + Send + Sync>;

/// Registry of admission plugins known to this server
#[derive(Default)]
pub struct Plugins {
    factories: BTreeMap<String, PluginFactory>,
    recommended_order: Vec<String>,
}

impl Plugins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every plugin this server ships
    pub fn with_builtin() -> Self {
        let mut plugins = Self::new();
        audit_logouts::register(&mut plugins);
        plugins
    }

    /// Register a plugin factory. Later registrations under the same name
    /// replace earlier ones without changing the plugin's position.
    pub fn register(&mut self, name: &str, factory: PluginFactory) {
        if self.factories.insert(name.to_string(), factory).is_some() {
            warn!("Admission plugin {name} registered twice, replacing");
        } else {
            self.recommended_order.push(name.to_string());
        }
    }

    /// Build a chain from the enabled plugin names, in recommended order.
    ///
    /// When `config_dir` holds a file named after the plugin (with `/`
    /// replaced by `_`), it is handed to the plugin factory.
    pub fn new_chain(
        &self,
        enabled: &[String],
        config_dir: Option<&Path>,
    ) -> Result<AdmissionChain, AdmissionError> {
        if let Some(unknown) = enabled.iter().find(|n| !self.factories.contains_key(*n)) {
            return Err(AdmissionError::UnknownPlugin(unknown.clone()));
        }

        let mut chain = Vec::new();
        for name in self.recommended_order.iter().filter(|n| enabled.contains(*n)) {
            let factory = &self.factories[name];
            let config_path = config_dir.map(|dir| dir.join(name.replace('/', "_")));

            let plugin = match config_path.filter(|p| p.is_file()) {
                Some(path) => {
                    let mut file = File::open(&path).map_err(|e| AdmissionError::Config {
                        plugin: name.clone(),
                        reason: format!("{}: {e}", path.display()),
                    })?;
                    let reader: &mut dyn Read = &mut file;
                    factory(Some(reader))?
                }
                None => factory(None)?,
            };
            chain.push(plugin);
        }

        Ok(AdmissionChain::new(chain))
    }
}
