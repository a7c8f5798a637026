//! Database access facade.
//!
//! # Data Flow
//! ```text
//! MongoConfig (resolved, moved in)
//!     → Manager
//!         → Client handle
//!             → Database → Collection
//!             → driver(): mongodb::Client built from ClientOptions on first use
//! ```
//!
//! # Design Decisions
//! - No network I/O at construction; the driver client is created on the
//!   first `driver()` call and connects in the background
//! - Handles are cheap clones over shared state

pub mod client;
pub mod facade;

pub use client::{apply_config, connection_string, Client, ClientError, Collection, Database};
pub use facade::Manager;
