//! Service provider subsystem.
//!
//! # Data Flow
//! ```text
//! Register(app):
//!     app → container → `config` capability
//!     → resolve [mongodb] over defaults
//!     → Manager::new(config)
//!     → publish mongodb, mongodb.client, mongodb.database
//!
//! Boot(app):
//!     validate app → no container changes
//! ```
//!
//! # Design Decisions
//! - Ordering across providers is computed by the host from `requires()`
//! - All errors surface as `ProviderError` for the host to abort startup

pub mod service_provider;
pub mod types;

pub use service_provider::{MongoServiceProvider, ServiceProvider};
pub use types::{
    ProviderError, ProviderResult, ProviderState, CLIENT_SERVICE, DATABASE_SERVICE,
    MONGODB_SERVICE,
};
