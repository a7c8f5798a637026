//! MongoDB service provider.
//!
//! # Responsibilities
//! - Register: resolve configuration, build the Manager, publish services
//! - Boot: second-phase hook, runs after every provider has registered
//! - Declare the capabilities the host must register first
//!
//! # Design Decisions
//! - Fail fast: every precondition or decode failure aborts Register
//! - Nothing is published until every fallible step has succeeded
//! - Register is not idempotent; a repeat re-resolves and records the
//!   published names again

use std::sync::Arc;

use crate::config::resolve;
use crate::container::{Application, Container, Service, CONFIG_SERVICE};
use crate::manager::Manager;
use crate::provider::types::{
    ProviderError, ProviderResult, ProviderState, CLIENT_SERVICE, DATABASE_SERVICE,
    MONGODB_SERVICE,
};

const REQUIRES: [&str; 1] = [CONFIG_SERVICE];

/// Two-phase contract between a host application and a service provider.
///
/// The host calls `register` on every provider (in an order derived from
/// `requires`) before calling `boot` on any of them.
pub trait ServiceProvider {
    fn register(&mut self, app: Option<&dyn Application>) -> ProviderResult<()>;

    fn boot(&mut self, app: Option<&dyn Application>) -> ProviderResult<()>;

    /// Names published by `register`, in publication order.
    fn providers(&self) -> &[String];

    /// Capability names that must be registered before this provider.
    fn requires(&self) -> &'static [&'static str];
}

/// Publishes the MongoDB manager, client and default database.
#[derive(Debug, Default)]
pub struct MongoServiceProvider {
    providers: Vec<String>,
    state: ProviderState,
}

impl MongoServiceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ProviderState {
        self.state
    }

    fn try_register(&mut self, container: &dyn Container) -> ProviderResult<()> {
        let config_manager = container
            .config()
            .ok_or_else(|| ProviderError::ConfigCapabilityMissing(CONFIG_SERVICE.to_string()))?;

        let config = resolve(config_manager.as_ref())?;
        let manager = Manager::new(config);
        tracing::info!(
            database = %manager.config().database,
            max_pool_size = manager.config().max_pool_size,
            "MongoDB manager created"
        );

        let client = manager.client();
        let database = manager.database();
        let services: [(&str, Service); 3] = [
            (MONGODB_SERVICE, Arc::new(manager)),
            (CLIENT_SERVICE, Arc::new(client)),
            (DATABASE_SERVICE, Arc::new(database)),
        ];

        for (name, service) in services {
            container.instance(name, service);
            tracing::info!(service = name, "Service published");
            self.providers.push(name.to_string());
        }
        Ok(())
    }
}

impl ServiceProvider for MongoServiceProvider {
    fn register(&mut self, app: Option<&dyn Application>) -> ProviderResult<()> {
        let app = app.ok_or(ProviderError::NullApplication)?;
        let container = app.container().ok_or(ProviderError::NullContainer)?;

        if self.state != ProviderState::Unregistered {
            tracing::warn!(state = ?self.state, "MongoDB provider registered again");
        }

        let previous = self.state;
        self.state = ProviderState::Registering;
        match self.try_register(container.as_ref()) {
            Ok(()) => {
                self.state = ProviderState::Registered;
                Ok(())
            }
            Err(e) => {
                self.state = previous;
                Err(e)
            }
        }
    }

    fn boot(&mut self, app: Option<&dyn Application>) -> ProviderResult<()> {
        if app.is_none() {
            return Err(ProviderError::NullApplication);
        }

        match self.state {
            ProviderState::Registered => self.state = ProviderState::Booted,
            ProviderState::Unregistered => {
                tracing::warn!("MongoDB provider booted before registration");
            }
            _ => {}
        }
        Ok(())
    }

    fn providers(&self) -> &[String] {
        &self.providers
    }

    fn requires(&self) -> &'static [&'static str] {
        &REQUIRES
    }
}
