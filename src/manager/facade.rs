//! The MongoDB manager published into the container.

use std::sync::Arc;

use crate::config::MongoConfig;
use crate::manager::client::{Client, Collection, Database};

/// Entry point for database access.
///
/// Owns its configuration; mutating the value it was built from has no
/// effect on it. All clones share one client handle, whose driver client is
/// created on first use.
#[derive(Debug, Clone)]
pub struct Manager {
    config: Arc<MongoConfig>,
    client: Client,
}

impl Manager {
    /// Create a manager from a resolved configuration. No I/O.
    pub fn new(config: MongoConfig) -> Self {
        let config = Arc::new(config);
        Self {
            client: Client::new(Arc::clone(&config)),
            config,
        }
    }

    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    /// The shared client handle.
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// The configured default database.
    pub fn database(&self) -> Database {
        self.database_with_name(&self.config.database)
    }

    pub fn database_with_name(&self, name: &str) -> Database {
        self.client().database(name)
    }

    /// Collection in the default database.
    pub fn collection(&self, name: &str) -> Collection {
        self.database().collection(name)
    }

    pub fn collection_with_database(&self, database: &str, collection: &str) -> Collection {
        self.database_with_name(database).collection(collection)
    }
}
