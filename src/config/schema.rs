//! Configuration schema definitions.
//!
//! This module defines the complete `[mongodb]` configuration section.
//! All types derive Serde traits and carry `#[serde(default)]`, so a config
//! file only needs to name the keys it overrides.
//!
//! # Design Decisions
//! - Every `Default` impl allocates its own collections; there is no shared
//!   static default value.
//! - Durations are stored as integer milliseconds; see `durations.rs` for
//!   the `Duration` accessors.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Key of the configuration section read by the provider.
pub const SECTION_KEY: &str = "mongodb";

/// Root configuration for the MongoDB provider.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MongoConfig {
    /// Connection string (e.g., "mongodb://localhost:27017").
    pub uri: String,

    /// Default database name.
    pub database: String,

    /// Application name reported to the server in the handshake.
    pub app_name: String,

    /// Replica set name. Empty when not connecting to a replica set.
    pub replica_set: String,

    /// Connect directly to a single host, bypassing topology discovery.
    pub direct: bool,

    /// Connect through a load balancer.
    pub load_balanced: bool,

    /// Maximum connections in the pool.
    pub max_pool_size: u64,

    /// Minimum connections kept open in the pool.
    pub min_pool_size: u64,

    /// Maximum connections being established concurrently.
    pub max_connecting: u64,

    /// Idle time before a pooled connection is closed (ms).
    pub max_conn_idle_time: u64,

    /// Connection establishment timeout (ms).
    pub connect_timeout: u64,

    /// Server selection timeout (ms).
    pub server_selection_timeout: u64,

    /// Socket read/write timeout (ms). Zero means no timeout.
    pub socket_timeout: u64,

    /// Interval between server monitor checks (ms).
    pub heartbeat_interval: u64,

    /// Latency window for selecting among suitable servers (ms).
    pub local_threshold: u64,

    /// Client-side operation timeout (ms).
    pub timeout: u64,

    pub tls: TlsConfig,

    pub auth: AuthConfig,

    pub read_preference: ReadPreferenceConfig,

    pub read_concern: ReadConcernConfig,

    pub write_concern: WriteConcernConfig,

    /// Retry supported writes once on transient errors.
    pub retry_writes: bool,

    /// Retry supported reads once on transient errors.
    pub retry_reads: bool,

    /// Wire compressors in order of preference ("zstd", "zlib", "snappy").
    pub compressors: Vec<String>,

    /// zlib compression level (-1 to 9).
    pub zlib_level: i32,

    /// zstd compression level.
    pub zstd_level: i32,

    pub srv: SrvConfig,

    pub server_api: ServerApiConfig,

    pub server_monitoring_mode: ServerMonitoringMode,

    /// Skip contacting OCSP responders when validating certificates.
    pub disable_ocsp_endpoint_check: bool,

    pub bson: BsonConfig,

    pub auto_encryption: AutoEncryptionConfig,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "myapp".to_string(),
            app_name: "rust-app".to_string(),
            replica_set: String::new(),
            direct: false,
            load_balanced: false,
            max_pool_size: 100,
            min_pool_size: 5,
            max_connecting: 10,
            max_conn_idle_time: 600_000,
            connect_timeout: 30_000,
            server_selection_timeout: 30_000,
            socket_timeout: 0,
            heartbeat_interval: 10_000,
            local_threshold: 15_000,
            timeout: 30_000,
            tls: TlsConfig::default(),
            auth: AuthConfig::default(),
            read_preference: ReadPreferenceConfig::default(),
            read_concern: ReadConcernConfig::default(),
            write_concern: WriteConcernConfig::default(),
            retry_writes: true,
            retry_reads: true,
            compressors: Vec::new(),
            zlib_level: 6,
            zstd_level: 6,
            srv: SrvConfig::default(),
            server_api: ServerApiConfig::default(),
            server_monitoring_mode: ServerMonitoringMode::default(),
            disable_ocsp_endpoint_check: false,
            bson: BsonConfig::default(),
            auto_encryption: AutoEncryptionConfig::default(),
        }
    }
}

/// Build the canonical default configuration.
///
/// Each call returns a value with freshly allocated maps and vectors, so
/// callers may mutate the result without affecting any other configuration.
pub fn default_config() -> MongoConfig {
    MongoConfig::default()
}

/// TLS configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Enable TLS for all connections.
    pub enabled: bool,

    /// Accept invalid certificates and hostnames. Testing only.
    pub insecure_skip_verify: bool,

    /// Path to the client certificate (PEM).
    pub cert_file: String,

    /// Path to the client private key (PEM).
    pub key_file: String,

    /// Path to the CA bundle (PEM).
    pub ca_file: String,
}

/// Authentication configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,

    pub password: String,

    /// Database holding the user's credentials.
    pub auth_source: String,

    /// SCRAM-SHA-1, SCRAM-SHA-256, MONGODB-X509, MONGODB-AWS, GSSAPI, PLAIN.
    pub auth_mechanism: String,

    /// Mechanism-specific properties (e.g., SERVICE_NAME for GSSAPI).
    pub auth_mechanism_properties: BTreeMap<String, String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            auth_source: "admin".to_string(),
            auth_mechanism: "SCRAM-SHA-256".to_string(),
            auth_mechanism_properties: BTreeMap::new(),
        }
    }
}

/// Read preference modes.
///
/// Decoding ignores case, so `"primaryPreferred"`, `"PrimaryPreferred"` and
/// `"primarypreferred"` all name the same mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadPreferenceMode {
    #[default]
    Primary,
    PrimaryPreferred,
    Secondary,
    SecondaryPreferred,
    Nearest,
}

impl ReadPreferenceMode {
    /// Name as written in connection strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadPreferenceMode::Primary => "primary",
            ReadPreferenceMode::PrimaryPreferred => "primaryPreferred",
            ReadPreferenceMode::Secondary => "secondary",
            ReadPreferenceMode::SecondaryPreferred => "secondaryPreferred",
            ReadPreferenceMode::Nearest => "nearest",
        }
    }
}

/// A mode name that matches no known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode `{}`", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for ReadPreferenceMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" => Ok(ReadPreferenceMode::Primary),
            "primarypreferred" => Ok(ReadPreferenceMode::PrimaryPreferred),
            "secondary" => Ok(ReadPreferenceMode::Secondary),
            "secondarypreferred" => Ok(ReadPreferenceMode::SecondaryPreferred),
            "nearest" => Ok(ReadPreferenceMode::Nearest),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ReadPreferenceMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Read preference configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadPreferenceConfig {
    pub mode: ReadPreferenceMode,

    /// Replica tag sets, tried in order.
    pub tag_sets: Vec<BTreeMap<String, String>>,

    /// Maximum replication lag of an eligible secondary, in seconds.
    pub max_staleness: u64,

    /// Enable hedged reads on sharded clusters.
    pub hedge_enabled: bool,
}

impl Default for ReadPreferenceConfig {
    fn default() -> Self {
        Self {
            mode: ReadPreferenceMode::Primary,
            tag_sets: Vec::new(),
            max_staleness: 90,
            hedge_enabled: false,
        }
    }
}

/// Read concern configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadConcernConfig {
    /// local, available, majority, linearizable, snapshot.
    pub level: String,
}

impl Default for ReadConcernConfig {
    fn default() -> Self {
        Self {
            level: "majority".to_string(),
        }
    }
}

/// Write acknowledgment requirement (`w`).
///
/// Accepts either a node count (`w = 2`) or a tag such as `"majority"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Acknowledgment {
    Nodes(u32),
    Tag(String),
}

impl Acknowledgment {
    /// Node count, also when the count was written as a string (`w = "2"`).
    pub fn nodes(&self) -> Option<u32> {
        match self {
            Acknowledgment::Nodes(n) => Some(*n),
            Acknowledgment::Tag(tag) => tag.parse().ok(),
        }
    }
}

impl Default for Acknowledgment {
    fn default() -> Self {
        Acknowledgment::Tag("majority".to_string())
    }
}

/// Write concern configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WriteConcernConfig {
    pub w: Acknowledgment,

    /// Wait for the write to reach the on-disk journal.
    pub journal: bool,

    /// Time limit for write concern acknowledgment (ms).
    #[serde(rename = "wtimeout")]
    pub w_timeout: u64,
}

impl Default for WriteConcernConfig {
    fn default() -> Self {
        Self {
            w: Acknowledgment::default(),
            journal: true,
            w_timeout: 30_000,
        }
    }
}

/// DNS seed list (`mongodb+srv://`) configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SrvConfig {
    /// Maximum hosts taken from the SRV record. Zero means no limit.
    pub max_hosts: u32,

    /// SRV service name.
    pub service_name: String,
}

impl Default for SrvConfig {
    fn default() -> Self {
        Self {
            max_hosts: 0,
            service_name: "mongodb".to_string(),
        }
    }
}

/// Stable API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerApiConfig {
    pub version: String,

    /// Reject commands outside the declared API version.
    pub strict: bool,

    /// Fail on deprecated commands.
    pub deprecation_errors: bool,
}

impl Default for ServerApiConfig {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            strict: false,
            deprecation_errors: false,
        }
    }
}

/// Server monitoring protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerMonitoringMode {
    #[default]
    Auto,
    Stream,
    Poll,
}

impl ServerMonitoringMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerMonitoringMode::Auto => "auto",
            ServerMonitoringMode::Stream => "stream",
            ServerMonitoringMode::Poll => "poll",
        }
    }
}

impl FromStr for ServerMonitoringMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ServerMonitoringMode::Auto),
            "stream" => Ok(ServerMonitoringMode::Stream),
            "poll" => Ok(ServerMonitoringMode::Poll),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ServerMonitoringMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Document encoding options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BsonConfig {
    /// Fall back to JSON field tags when no BSON tag is present.
    pub use_json_struct_tags: bool,

    /// Error when an inline map collides with a struct field.
    pub error_on_inline_map: bool,

    /// Allow floats to be truncated when decoding into integers.
    pub allow_truncating_floats: bool,
}

/// Client-side field level encryption configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AutoEncryptionConfig {
    pub enabled: bool,

    /// KMS provider credentials keyed by provider name.
    pub kms_providers: BTreeMap<String, toml::Value>,

    /// JSON schemas keyed by namespace.
    pub schema_map: BTreeMap<String, toml::Value>,

    /// Disable automatic encryption while keeping automatic decryption.
    pub bypass_auto_encryption: bool,

    pub extra_options: BTreeMap<String, toml::Value>,
}
