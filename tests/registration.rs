//! Register/Boot lifecycle tests against fake hosts.

use std::sync::Arc;
use std::time::Duration;

use mongodb_provider::container::{App, Container, ServiceContainer};
use mongodb_provider::manager::{Client, Database, Manager};
use mongodb_provider::provider::{
    MongoServiceProvider, ProviderError, ProviderState, ServiceProvider,
};

mod common;

use common::{recording_app, test_mongo_config, toml_config, FailingConfig, FakeApp, FixedConfig};

const EXPECTED: [&str; 3] = ["mongodb", "mongodb.client", "mongodb.database"];

#[test]
fn test_register_publishes_each_service_once() {
    let (app, container) = recording_app(Some(Arc::new(FixedConfig(test_mongo_config()))));
    let mut provider = MongoServiceProvider::new();
    assert!(provider.providers().is_empty());

    provider.register(Some(&app)).unwrap();

    assert_eq!(container.published(), EXPECTED);
    assert_eq!(provider.providers(), EXPECTED);
}

#[test]
fn test_register_without_app() {
    let mut provider = MongoServiceProvider::new();
    let err = provider.register(None).unwrap_err();
    assert!(matches!(err, ProviderError::NullApplication));
    assert!(provider.providers().is_empty());
}

#[test]
fn test_register_without_container() {
    let app = FakeApp { container: None };
    let mut provider = MongoServiceProvider::new();
    let err = provider.register(Some(&app)).unwrap_err();
    assert!(matches!(err, ProviderError::NullContainer));
}

#[test]
fn test_register_without_config_capability() {
    let (app, container) = recording_app(None);
    let mut provider = MongoServiceProvider::new();

    let err = provider.register(Some(&app)).unwrap_err();
    assert!(matches!(err, ProviderError::ConfigCapabilityMissing(ref name) if name == "config"));
    assert!(err.to_string().contains("config"));
    assert!(container.published().is_empty());
    assert!(provider.providers().is_empty());
}

#[test]
fn test_register_decode_error_carries_message() {
    let (app, container) = recording_app(Some(Arc::new(FailingConfig {
        message: "invalid type: string \"lots\", expected u64",
    })));
    let mut provider = MongoServiceProvider::new();

    let err = provider.register(Some(&app)).unwrap_err();
    assert!(matches!(err, ProviderError::ConfigDecode(_)));
    assert!(err.to_string().contains("expected u64"));
    assert!(container.published().is_empty());
    assert_eq!(provider.state(), ProviderState::Unregistered);
}

#[test]
fn test_register_twice_appends_duplicates() {
    let (app, container) = recording_app(Some(toml_config("")));
    let mut provider = MongoServiceProvider::new();

    provider.register(Some(&app)).unwrap();
    provider.register(Some(&app)).unwrap();

    assert_eq!(provider.providers().len(), 6);
    assert_eq!(&provider.providers()[3..], EXPECTED);
    assert_eq!(container.published().len(), 6);
}

#[test]
fn test_requires_config_only() {
    let provider = MongoServiceProvider::new();
    assert_eq!(provider.requires(), ["config"]);
}

#[test]
fn test_boot_without_app() {
    let mut provider = MongoServiceProvider::new();
    assert!(matches!(provider.boot(None), Err(ProviderError::NullApplication)));
}

#[test]
fn test_boot_after_register_publishes_nothing() {
    let (app, container) = recording_app(Some(toml_config("[mongodb]\ndatabase = \"boot\"")));
    let mut provider = MongoServiceProvider::new();

    provider.register(Some(&app)).unwrap();
    provider.boot(Some(&app)).unwrap();

    assert_eq!(container.published().len(), 3);
    assert_eq!(provider.state(), ProviderState::Booted);
}

#[test]
fn test_boot_with_container_less_app() {
    let app = FakeApp { container: None };
    let mut provider = MongoServiceProvider::new();
    assert!(provider.boot(Some(&app)).is_ok());
}

#[test]
fn test_in_memory_container_end_to_end() {
    let container = ServiceContainer::with_config(toml_config(
        r#"
        [mongodb]
        uri = "mongodb://db.internal:27017"
        database = "inventory"
        socket_timeout = 0

        [mongodb.auth]
        username = "inventory-svc"
        "#,
    ));
    let app = App::new(container.clone());
    let mut provider = MongoServiceProvider::new();

    provider.register(Some(&app)).unwrap();
    provider.boot(Some(&app)).unwrap();

    assert!(container.bound("mongodb"));
    assert!(container.bound("mongodb.client"));
    assert!(container.bound("mongodb.database"));
    assert!(container.bound("config"));

    let manager = container.make::<Manager>("mongodb").unwrap();
    let client = container.make::<Client>("mongodb.client").unwrap();
    let database = container.make::<Database>("mongodb.database").unwrap();

    assert_eq!(manager.config().uri, "mongodb://db.internal:27017");
    assert_eq!(manager.config().auth.auth_source, "admin");
    assert!(client.same_client(&manager.client()));
    assert!(!client.has_driver());
    assert_eq!(client.config().auth.username, "inventory-svc");
    assert_eq!(client.config().get_socket_timeout(), Duration::ZERO);
    assert_eq!(database.name(), "inventory");
}

#[tokio::test]
async fn test_published_database_resolves_to_driver_database() {
    let container = ServiceContainer::with_config(toml_config(
        r#"
        [mongodb]
        database = "inventory"

        [mongodb.read_preference]
        mode = "SecondaryPreferred"
        "#,
    ));
    let app = App::new(container.clone());
    let mut provider = MongoServiceProvider::new();
    provider.register(Some(&app)).unwrap();

    let database = container.make::<Database>("mongodb.database").unwrap();
    let driver = database.driver().await.unwrap();
    assert_eq!(driver.name(), "inventory");

    let client = container.make::<Client>("mongodb.client").unwrap();
    assert!(client.has_driver());
}
