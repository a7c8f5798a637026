//! Configuration loading and the `config` capability.
//!
//! # Responsibilities
//! - Read TOML documents from disk or memory
//! - Substitute `${VAR_NAME}` references in string values from the environment
//! - Overlay a named section onto an existing `MongoConfig` in place
//!
//! # Design Decisions
//! - Overlay is a deep merge of TOML tables: keys absent from the document
//!   keep whatever value the target already holds
//! - Arrays and scalars replace wholesale; only tables merge
//! - Substitution runs on parsed string values, so comments and keys are
//!   never expanded

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::config::schema::MongoConfig;

/// Error type for configuration loading and decoding.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A section could not be decoded into the target type.
    #[error("Decode error in section '{section}': {message}")]
    Decode { section: String, message: String },

    /// `${VAR}` referenced an unset environment variable.
    #[error("Environment variable '{0}' is not set")]
    MissingEnv(String),
}

/// The configuration-decoding capability a host container supplies under
/// the `config` name.
pub trait ConfigManager: Send + Sync {
    /// Whether the document contains `key` (dotted paths allowed).
    fn has(&self, key: &str) -> bool;

    /// Raw value stored at `key`.
    fn get(&self, key: &str) -> Option<toml::Value>;

    /// Decode the section at `key` into `out`, overriding only the fields
    /// the section specifies.
    fn unmarshal_key(&self, key: &str, out: &mut MongoConfig) -> Result<(), ConfigError>;
}

/// `ConfigManager` backed by a parsed TOML document.
#[derive(Debug, Clone)]
pub struct TomlConfigManager {
    root: toml::Table,
}

impl TomlConfigManager {
    /// Parse a TOML document and substitute environment variables in its
    /// string values.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut root: toml::Table = toml::from_str(content)?;
        expand_table(&mut root)?;
        Ok(Self { root })
    }

    /// Load a TOML file from disk.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let manager = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "Configuration file loaded");
        Ok(manager)
    }

    /// Wrap an already parsed table.
    pub fn from_table(root: toml::Table) -> Self {
        Self { root }
    }

    fn lookup(&self, key: &str) -> Option<&toml::Value> {
        let mut parts = key.split('.');
        let mut current = self.root.get(parts.next()?)?;
        for part in parts {
            current = current.as_table()?.get(part)?;
        }
        Some(current)
    }
}

impl ConfigManager for TomlConfigManager {
    fn has(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    fn get(&self, key: &str) -> Option<toml::Value> {
        self.lookup(key).cloned()
    }

    fn unmarshal_key(&self, key: &str, out: &mut MongoConfig) -> Result<(), ConfigError> {
        let Some(section) = self.lookup(key) else {
            return Ok(());
        };
        let decode_err = |message: String| ConfigError::Decode {
            section: key.to_string(),
            message,
        };

        let mut base = toml::Value::try_from(&*out).map_err(|e| decode_err(e.to_string()))?;
        merge(&mut base, section.clone());
        *out = base.try_into().map_err(|e: toml::de::Error| decode_err(e.to_string()))?;
        Ok(())
    }
}

/// Deep-merge `overlay` into `base`. Tables merge key by key; any other
/// value replaces the base value.
fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

static ENV_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env pattern")
});

fn expand_table(table: &mut toml::Table) -> Result<(), ConfigError> {
    for (_, value) in table.iter_mut() {
        expand_value(value)?;
    }
    Ok(())
}

fn expand_value(value: &mut toml::Value) -> Result<(), ConfigError> {
    match value {
        toml::Value::String(text) => *text = expand_env(text)?,
        toml::Value::Array(items) => {
            for item in items {
                expand_value(item)?;
            }
        }
        toml::Value::Table(table) => expand_table(table)?,
        _ => {}
    }
    Ok(())
}

/// Replace `${VAR_NAME}` references with environment values.
pub fn expand_env(content: &str) -> Result<String, ConfigError> {
    let pattern = &*ENV_PATTERN;
    let mut expanded = String::with_capacity(content.len());
    let mut last = 0;
    for caps in pattern.captures_iter(content) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = std::env::var(name.as_str())
            .map_err(|_| ConfigError::MissingEnv(name.as_str().to_string()))?;
        expanded.push_str(&content[last..whole.start()]);
        expanded.push_str(&value);
        last = whole.end();
    }
    expanded.push_str(&content[last..]);
    Ok(expanded)
}
