//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, env substitution in string values)
//!     → TomlConfigManager (the `config` capability)
//!
//! On provider registration:
//!     schema.rs default_config() (fresh value)
//!     → resolver.rs overlays the [mongodb] section in place
//!     → MongoConfig moved into the Manager (immutable from then on)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - No cross-field validation; values are handed to the driver as given
//! - Millisecond fields are exposed as `Duration` through durations.rs

pub mod durations;
pub mod loader;
pub mod resolver;
pub mod schema;

pub use loader::{ConfigError, ConfigManager, TomlConfigManager};
pub use resolver::resolve;
pub use schema::{default_config, MongoConfig, SECTION_KEY};
pub use schema::{
    Acknowledgment, AuthConfig, AutoEncryptionConfig, BsonConfig, ReadConcernConfig,
    ReadPreferenceConfig, ReadPreferenceMode, ServerApiConfig, ServerMonitoringMode, SrvConfig,
    TlsConfig, UnknownMode, WriteConcernConfig,
};
