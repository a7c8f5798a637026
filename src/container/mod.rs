//! Service container seam.
//!
//! # Responsibilities
//! - Define what the provider needs from a host: an application handle,
//!   a container reachable from it, and a typed `config` capability
//! - Provide an in-memory container for hosts without their own
//!
//! # Design Decisions
//! - The config capability is a typed accessor, so a container either can
//!   or cannot supply it; there is no runtime cast of an untyped value
//! - Instances are stored type-erased by name and downcast only on `make`
//! - Resolution order across providers is the host's concern

pub mod app;

use std::any::Any;
use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use thiserror::Error;

use crate::config::ConfigManager;

pub use app::App;

/// Name under which the configuration capability is bound.
pub const CONFIG_SERVICE: &str = "config";

/// A type-erased service instance.
pub type Service = Arc<dyn Any + Send + Sync>;

/// Errors from typed container lookups.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Service '{0}' is not bound")]
    NotBound(String),

    #[error("Service '{name}' is not a {expected}")]
    TypeMismatch { name: String, expected: &'static str },
}

/// The registry a host exposes to service providers.
pub trait Container: Send + Sync {
    /// Whether anything is bound under `name`.
    fn bound(&self, name: &str) -> bool;

    /// The configuration capability, if the host supplies one.
    fn config(&self) -> Option<Arc<dyn ConfigManager>>;

    /// Publish a singleton instance under `name`, replacing any previous one.
    fn instance(&self, name: &str, service: Service);
}

/// The host application handed to providers.
pub trait Application {
    fn container(&self) -> Option<Arc<dyn Container>>;
}

/// In-memory [`Container`].
#[derive(Clone, Default)]
pub struct ServiceContainer {
    instances: Arc<DashMap<String, Service>>,
    config: Arc<RwLock<Option<Arc<dyn ConfigManager>>>>,
}

impl ServiceContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a container with the config capability already bound.
    pub fn with_config(manager: Arc<dyn ConfigManager>) -> Self {
        let container = Self::new();
        container.bind_config(manager);
        container
    }

    /// Bind the configuration capability.
    pub fn bind_config(&self, manager: Arc<dyn ConfigManager>) {
        match self.config.write() {
            Ok(mut slot) => *slot = Some(manager),
            Err(poisoned) => *poisoned.into_inner() = Some(manager),
        }
    }

    /// Resolve `name` as a `T`.
    pub fn make<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, ContainerError> {
        let service = self
            .instances
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ContainerError::NotBound(name.to_string()))?;

        service.downcast::<T>().map_err(|_| ContainerError::TypeMismatch {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }

    /// Names of all published instances, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.instances.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of published instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Container for ServiceContainer {
    fn bound(&self, name: &str) -> bool {
        if name == CONFIG_SERVICE {
            return self.config().is_some();
        }
        self.instances.contains_key(name)
    }

    fn config(&self) -> Option<Arc<dyn ConfigManager>> {
        match self.config.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn instance(&self, name: &str, service: Service) {
        self.instances.insert(name.to_string(), service);
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("instances", &self.names())
            .field("config_bound", &self.config().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TomlConfigManager;

    #[test]
    fn test_instance_and_make() {
        let container = ServiceContainer::new();
        assert!(container.is_empty());

        container.instance("answer", Arc::new(42u32));
        assert!(container.bound("answer"));
        assert_eq!(*container.make::<u32>("answer").unwrap(), 42);
        assert_eq!(container.names(), vec!["answer".to_string()]);
    }

    #[test]
    fn test_make_errors() {
        let container = ServiceContainer::new();
        container.instance("answer", Arc::new(42u32));

        assert!(matches!(
            container.make::<u32>("missing"),
            Err(ContainerError::NotBound(ref name)) if name == "missing"
        ));
        assert!(matches!(
            container.make::<String>("answer"),
            Err(ContainerError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_config_binding() {
        let container = ServiceContainer::new();
        assert!(!container.bound(CONFIG_SERVICE));
        assert!(container.config().is_none());

        let manager = TomlConfigManager::parse("[mongodb]\ndatabase = \"x\"").unwrap();
        container.bind_config(Arc::new(manager));
        assert!(container.bound(CONFIG_SERVICE));
        assert!(container.config().unwrap().has("mongodb.database"));
    }

    #[test]
    fn test_clones_share_instances() {
        let container = ServiceContainer::new();
        let clone = container.clone();
        clone.instance("shared", Arc::new("value".to_string()));
        assert_eq!(container.len(), 1);
    }
}
