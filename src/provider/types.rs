//! Provider names, states and error definitions.

use thiserror::Error;

use crate::config::ConfigError;

/// Primary service name: the [`Manager`](crate::manager::Manager).
pub const MONGODB_SERVICE: &str = "mongodb";

/// Raw client handle.
pub const CLIENT_SERVICE: &str = "mongodb.client";

/// Default database handle.
pub const DATABASE_SERVICE: &str = "mongodb.database";

/// Registration lifecycle of a provider instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderState {
    #[default]
    Unregistered,
    Registering,
    Registered,
    Booted,
}

/// Errors that abort provider registration or boot.
///
/// None of these are recoverable inside the provider; they are meant to
/// stop application startup.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No application was handed to the provider.
    #[error("Application cannot be absent")]
    NullApplication,

    /// The application exposes no container.
    #[error("Container cannot be absent")]
    NullContainer,

    /// The container cannot supply a required capability.
    #[error("MongoDB provider requires the '{0}' service to be registered")]
    ConfigCapabilityMissing(String),

    /// The `mongodb` section could not be decoded.
    #[error("MongoDB config unmarshal error: {0}")]
    ConfigDecode(#[from] ConfigError),
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
