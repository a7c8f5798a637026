//! Shared fakes for provider integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use mongodb_provider::config::{ConfigError, ConfigManager, MongoConfig, TomlConfigManager};
use mongodb_provider::container::{Application, Container, Service};

/// Container that records every publish call and never stores anything.
#[derive(Default)]
pub struct RecordingContainer {
    config: Option<Arc<dyn ConfigManager>>,
    published: Mutex<Vec<String>>,
}

impl RecordingContainer {
    pub fn new(config: Option<Arc<dyn ConfigManager>>) -> Self {
        Self {
            config,
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

impl Container for RecordingContainer {
    fn bound(&self, name: &str) -> bool {
        (name == "config" && self.config.is_some()) || self.published().iter().any(|n| n == name)
    }

    fn config(&self) -> Option<Arc<dyn ConfigManager>> {
        self.config.clone()
    }

    fn instance(&self, name: &str, _service: Service) {
        self.published.lock().unwrap().push(name.to_string());
    }
}

/// Application whose container is whatever the test supplies.
pub struct FakeApp {
    pub container: Option<Arc<dyn Container>>,
}

impl Application for FakeApp {
    fn container(&self) -> Option<Arc<dyn Container>> {
        self.container.clone()
    }
}

/// Config capability whose decode call always fails.
pub struct FailingConfig {
    pub message: &'static str,
}

impl ConfigManager for FailingConfig {
    fn has(&self, _key: &str) -> bool {
        true
    }

    fn get(&self, _key: &str) -> Option<toml::Value> {
        None
    }

    fn unmarshal_key(&self, key: &str, _out: &mut MongoConfig) -> Result<(), ConfigError> {
        Err(ConfigError::Decode {
            section: key.to_string(),
            message: self.message.to_string(),
        })
    }
}

/// Config capability that replaces the target with a fixed configuration.
pub struct FixedConfig(pub MongoConfig);

impl ConfigManager for FixedConfig {
    fn has(&self, key: &str) -> bool {
        key == "mongodb"
    }

    fn get(&self, _key: &str) -> Option<toml::Value> {
        toml::Value::try_from(&self.0).ok()
    }

    fn unmarshal_key(&self, _key: &str, out: &mut MongoConfig) -> Result<(), ConfigError> {
        *out = self.0.clone();
        Ok(())
    }
}

/// Test configuration mirroring a small single-node deployment.
pub fn test_mongo_config() -> MongoConfig {
    let mut cfg = MongoConfig::default();
    cfg.database = "testdb".into();
    cfg.connect_timeout = 10_000;
    cfg.max_pool_size = 10;
    cfg.min_pool_size = 1;
    cfg.max_conn_idle_time = 300_000;
    cfg.heartbeat_interval = 30_000;
    cfg.socket_timeout = 5000;
    cfg
}

pub fn toml_config(content: &str) -> Arc<dyn ConfigManager> {
    Arc::new(TomlConfigManager::parse(content).unwrap())
}

pub fn recording_app(config: Option<Arc<dyn ConfigManager>>) -> (FakeApp, Arc<RecordingContainer>) {
    let container = Arc::new(RecordingContainer::new(config));
    let app = FakeApp {
        container: Some(container.clone() as Arc<dyn Container>),
    };
    (app, container)
}
