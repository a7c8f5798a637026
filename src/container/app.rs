//! Minimal host application.

use std::path::Path;
use std::sync::Arc;

use crate::config::{ConfigError, TomlConfigManager};
use crate::container::{Application, Container, ServiceContainer};

/// An [`Application`] backed by a [`ServiceContainer`].
#[derive(Debug, Clone, Default)]
pub struct App {
    container: Option<ServiceContainer>,
}

impl App {
    pub fn new(container: ServiceContainer) -> Self {
        Self {
            container: Some(container),
        }
    }

    /// An application that exposes no container.
    pub fn without_container() -> Self {
        Self { container: None }
    }

    /// Build an application whose `config` capability reads `path`.
    pub fn from_config_path(path: &Path) -> Result<Self, ConfigError> {
        let manager = TomlConfigManager::from_path(path)?;
        Ok(Self::new(ServiceContainer::with_config(Arc::new(manager))))
    }

    /// The concrete container, for typed lookups.
    pub fn services(&self) -> Option<&ServiceContainer> {
        self.container.as_ref()
    }
}

impl Application for App {
    fn container(&self) -> Option<Arc<dyn Container>> {
        self.container
            .clone()
            .map(|c| Arc::new(c) as Arc<dyn Container>)
    }
}
