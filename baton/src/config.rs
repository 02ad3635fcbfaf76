//! Process-wide protocol configuration.
//!
//! The only knob is the default [`BoundaryPolicy`]. Individual operations
//! can still override it through [`crate::Completion::with_policy`].
//!
//! Resolution order: an explicit [`install`], otherwise the `BATON_BOUNDARY`
//! environment variable, otherwise [`BoundaryPolicy::Abort`]. The first
//! call to [`current`] or [`install`] fixes the value for the rest of the
//! process.

use crate::boundary::BoundaryPolicy;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Environment variable read by [`Config::from_env`].
pub const BOUNDARY_ENV: &str = "BATON_BOUNDARY";

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Protocol configuration.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Policy applied when a receiver panics during delivery.
    pub boundary: BoundaryPolicy,
}

impl Config {
    /// Create a config with the given boundary policy.
    pub fn new(boundary: BoundaryPolicy) -> Self {
        Self { boundary }
    }

    /// Read configuration from the environment.
    ///
    /// An unset variable yields the default. A set but unparseable one is an
    /// error rather than a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let boundary = match lookup(BOUNDARY_ENV) {
            Some(raw) => raw.parse()?,
            None => BoundaryPolicy::default(),
        };
        Ok(Self { boundary })
    }
}

/// Install `config` as the process-wide configuration.
///
/// Fails with [`ConfigError::AlreadyInstalled`] if a config was installed
/// before, or [`current`] has already been read.
pub fn install(config: Config) -> Result<(), ConfigError> {
    CONFIG.set(config).map_err(|_| ConfigError::AlreadyInstalled)
}

/// The process-wide configuration.
///
/// If nothing was installed, the environment is read once. An invalid
/// environment value is logged and the default is used.
pub fn current() -> &'static Config {
    CONFIG.get_or_init(|| match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "baton.config.invalid_env");
            Config::default()
        }
    })
}
