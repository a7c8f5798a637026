//! MongoDB service provider for dependency-injection containers.
//!
//! Resolves a `[mongodb]` configuration section over a complete set of
//! defaults, builds a [`Manager`], and publishes it together with its client
//! and default database handles into the host's container.

pub mod config;
pub mod container;
pub mod manager;
pub mod observability;
pub mod provider;

pub use config::schema::MongoConfig;
pub use container::{App, Application, Container, ServiceContainer};
pub use manager::Manager;
pub use provider::{MongoServiceProvider, ProviderError, ServiceProvider};
