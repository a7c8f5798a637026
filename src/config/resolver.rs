//! Resolution of the `[mongodb]` section over the defaults.

use crate::config::loader::{ConfigError, ConfigManager};
use crate::config::schema::{default_config, MongoConfig, SECTION_KEY};

/// Resolve the provider configuration.
///
/// Starts from a fresh [`default_config`] and lets `manager` overlay the
/// `mongodb` section onto it. Either the fully resolved value is returned or
/// the decode error is, never a partially overlaid configuration.
pub fn resolve(manager: &dyn ConfigManager) -> Result<MongoConfig, ConfigError> {
    let mut config = default_config();
    tracing::debug!(
        section = SECTION_KEY,
        present = manager.has(SECTION_KEY),
        "Resolving configuration"
    );
    manager.unmarshal_key(SECTION_KEY, &mut config)?;
    Ok(config)
}
