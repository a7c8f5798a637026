//! Driver-facing client handles.
//!
//! # Responsibilities
//! - Translate a resolved `MongoConfig` into `mongodb::options::ClientOptions`
//! - Provide cheap, cloneable client/database/collection handles over one
//!   lazily created driver client
//!
//! # Design Decisions
//! - Constructing a handle performs no I/O and needs no runtime; the driver
//!   client is created on the first `driver()` call
//! - Options the driver only reads from a connection string (SRV, compressors,
//!   monitoring mode) are appended to the URI; everything else is set on the
//!   parsed `ClientOptions`
//! - All handles derived from one client share the same driver client

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use mongodb::bson::Document;
use mongodb::options::{
    self, AuthMechanism, ClientOptions, Credential, ReadConcern, ReadPreference,
    ReadPreferenceOptions, SelectionCriteria, ServerApi, ServerApiVersion, Tls, TlsOptions,
    WriteConcern,
};
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::config::{
    Acknowledgment, AuthConfig, MongoConfig, ReadPreferenceConfig, ReadPreferenceMode,
    ServerApiConfig, ServerMonitoringMode,
};

/// Errors raised while creating the driver client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("MongoDB driver error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("Unsupported server API version '{0}'")]
    UnsupportedServerApi(String),
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn count(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// The configured URI with the connection-string-only options appended.
pub fn connection_string(config: &MongoConfig) -> String {
    let mut params = Vec::new();

    if config.uri.starts_with("mongodb+srv://") {
        if config.srv.max_hosts > 0 {
            params.push(format!("srvMaxHosts={}", config.srv.max_hosts));
        }
        if !config.srv.service_name.is_empty() && config.srv.service_name != "mongodb" {
            params.push(format!("srvServiceName={}", config.srv.service_name));
        }
    }

    if !config.compressors.is_empty() {
        params.push(format!("compressors={}", config.compressors.join(",")));
        if config.compressors.iter().any(|c| c == "zlib") {
            params.push(format!("zlibCompressionLevel={}", config.zlib_level));
        }
    }

    if config.server_monitoring_mode != ServerMonitoringMode::Auto {
        params.push(format!(
            "serverMonitoringMode={}",
            config.server_monitoring_mode.as_str()
        ));
    }

    if params.is_empty() {
        return config.uri.clone();
    }

    let has_path = config
        .uri
        .split_once("://")
        .is_some_and(|(_, rest)| rest.contains('/'));
    let separator = if config.uri.contains('?') {
        "&"
    } else if has_path {
        "?"
    } else {
        "/?"
    };
    format!("{}{}{}", config.uri, separator, params.join("&"))
}

/// Overlay the resolved configuration onto driver options.
///
/// Pure: no I/O, no runtime. Credentials are set only when a username is
/// configured and TLS only when enabled.
pub fn apply_config(options: &mut ClientOptions, config: &MongoConfig) -> Result<(), ClientError> {
    options.app_name = non_empty(&config.app_name);
    options.default_database = non_empty(&config.database);
    if let Some(name) = non_empty(&config.replica_set) {
        options.repl_set_name = Some(name);
    }
    if config.direct {
        options.direct_connection = Some(true);
    }
    if config.load_balanced {
        options.load_balanced = Some(true);
    }

    options.max_pool_size = Some(count(config.max_pool_size));
    options.min_pool_size = Some(count(config.min_pool_size));
    options.max_connecting = Some(count(config.max_connecting));
    options.max_idle_time = Some(config.get_max_conn_idle_time());
    options.connect_timeout = Some(config.get_connect_timeout());
    options.server_selection_timeout = Some(config.get_server_selection_timeout());
    options.heartbeat_freq = Some(config.get_heartbeat_interval());
    options.local_threshold = Some(config.get_local_threshold());
    options.retry_writes = Some(config.retry_writes);
    options.retry_reads = Some(config.retry_reads);

    if let Some(credential) = credential(&config.auth)? {
        options.credential = Some(credential);
    }
    if config.tls.enabled {
        let mut tls = TlsOptions::default();
        tls.allow_invalid_certificates = Some(config.tls.insecure_skip_verify);
        tls.ca_file_path = non_empty(&config.tls.ca_file).map(PathBuf::from);
        tls.cert_key_file_path = non_empty(&config.tls.cert_file)
            .or_else(|| non_empty(&config.tls.key_file))
            .map(PathBuf::from);
        options.tls = Some(Tls::Enabled(tls));
    }

    options.selection_criteria = Some(SelectionCriteria::ReadPreference(read_preference(
        &config.read_preference,
    )));
    if !config.read_concern.level.is_empty() {
        options.read_concern = Some(ReadConcern::custom(config.read_concern.level.as_str()));
    }

    let mut write_concern = WriteConcern::default();
    write_concern.w = Some(acknowledgment(&config.write_concern.w));
    write_concern.journal = Some(config.write_concern.journal);
    write_concern.w_timeout = (config.write_concern.w_timeout > 0).then(|| config.get_w_timeout());
    options.write_concern = Some(write_concern);

    options.server_api = server_api(&config.server_api)?;
    Ok(())
}

fn credential(auth: &AuthConfig) -> Result<Option<Credential>, ClientError> {
    let Some(username) = non_empty(&auth.username) else {
        return Ok(None);
    };

    let mut credential = Credential::default();
    credential.username = Some(username);
    credential.password = non_empty(&auth.password);
    credential.source = non_empty(&auth.auth_source);
    credential.mechanism = match non_empty(&auth.auth_mechanism) {
        Some(name) => Some(AuthMechanism::from_str(&name)?),
        None => None,
    };
    if !auth.auth_mechanism_properties.is_empty() {
        let mut properties = Document::new();
        for (key, value) in &auth.auth_mechanism_properties {
            properties.insert(key.clone(), value.clone());
        }
        credential.mechanism_properties = Some(properties);
    }
    Ok(Some(credential))
}

fn read_preference(config: &ReadPreferenceConfig) -> ReadPreference {
    if config.mode == ReadPreferenceMode::Primary {
        return ReadPreference::Primary;
    }

    let mut opts = ReadPreferenceOptions::default();
    if !config.tag_sets.is_empty() {
        opts.tag_sets = Some(
            config
                .tag_sets
                .iter()
                .map(|set| {
                    set.iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect::<HashMap<_, _>>()
                })
                .collect(),
        );
    }
    if config.max_staleness > 0 {
        opts.max_staleness = Some(Duration::from_secs(config.max_staleness));
    }

    let options = Some(opts);
    match config.mode {
        ReadPreferenceMode::Primary => ReadPreference::Primary,
        ReadPreferenceMode::PrimaryPreferred => ReadPreference::PrimaryPreferred { options },
        ReadPreferenceMode::Secondary => ReadPreference::Secondary { options },
        ReadPreferenceMode::SecondaryPreferred => ReadPreference::SecondaryPreferred { options },
        ReadPreferenceMode::Nearest => ReadPreference::Nearest { options },
    }
}

fn acknowledgment(w: &Acknowledgment) -> options::Acknowledgment {
    if let Some(nodes) = w.nodes() {
        return options::Acknowledgment::Nodes(nodes);
    }
    match w {
        Acknowledgment::Nodes(nodes) => options::Acknowledgment::Nodes(*nodes),
        Acknowledgment::Tag(tag) if tag == "majority" => options::Acknowledgment::Majority,
        Acknowledgment::Tag(tag) => options::Acknowledgment::Custom(tag.clone()),
    }
}

fn server_api(config: &ServerApiConfig) -> Result<Option<ServerApi>, ClientError> {
    let version = match config.version.as_str() {
        "" => return Ok(None),
        "1" => ServerApiVersion::V1,
        other => return Err(ClientError::UnsupportedServerApi(other.to_string())),
    };
    let mut api = ServerApi::builder().version(version).build();
    api.strict = Some(config.strict);
    api.deprecation_errors = Some(config.deprecation_errors);
    Ok(Some(api))
}

async fn create_driver(config: &MongoConfig) -> Result<mongodb::Client, ClientError> {
    let uri = connection_string(config);
    let mut options = ClientOptions::parse(uri.as_str()).await?;
    apply_config(&mut options, config)?;
    tracing::debug!(
        app_name = ?options.app_name,
        hosts = options.hosts.len(),
        "Creating MongoDB driver client"
    );
    Ok(mongodb::Client::with_options(options)?)
}

#[derive(Debug)]
struct Shared {
    config: Arc<MongoConfig>,
    driver: OnceCell<mongodb::Client>,
}

/// Client handle published as `mongodb.client`.
#[derive(Debug, Clone)]
pub struct Client {
    shared: Arc<Shared>,
}

impl Client {
    /// Create a handle. The driver client is not built yet.
    pub fn new(config: Arc<MongoConfig>) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                driver: OnceCell::new(),
            }),
        }
    }

    pub fn config(&self) -> &MongoConfig {
        &self.shared.config
    }

    /// The driver client, created on first call and shared afterwards.
    ///
    /// Must run inside a Tokio runtime; the driver spawns its monitors there.
    pub async fn driver(&self) -> Result<mongodb::Client, ClientError> {
        self.shared
            .driver
            .get_or_try_init(|| create_driver(&self.shared.config))
            .await
            .cloned()
    }

    /// Whether the driver client has been created.
    pub fn has_driver(&self) -> bool {
        self.shared.driver.initialized()
    }

    /// Handle to the named database.
    pub fn database(&self, name: &str) -> Database {
        Database {
            client: self.clone(),
            name: name.to_string(),
        }
    }

    /// Whether both handles refer to the same underlying client.
    pub fn same_client(&self, other: &Client) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

/// Database handle.
#[derive(Debug, Clone)]
pub struct Database {
    client: Client,
    name: String,
}

impl Database {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn collection(&self, name: &str) -> Collection {
        Collection {
            database: self.clone(),
            name: name.to_string(),
        }
    }

    pub async fn driver(&self) -> Result<mongodb::Database, ClientError> {
        Ok(self.client.driver().await?.database(&self.name))
    }
}

/// Collection handle.
#[derive(Debug, Clone)]
pub struct Collection {
    database: Database,
    name: String,
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// `database.collection`
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database.name, self.name)
    }

    /// Typed driver collection.
    pub async fn driver<T: Send + Sync>(&self) -> Result<mongodb::Collection<T>, ClientError> {
        Ok(self.database.driver().await?.collection::<T>(&self.name))
    }
}
