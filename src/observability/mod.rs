//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config / container / provider / manager
//!     → tracing events (structured fields)
//!     → logging.rs subscriber (stdout)
//! ```

pub mod logging;

pub use logging::init_logging;
