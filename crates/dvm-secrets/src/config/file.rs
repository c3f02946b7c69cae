//! YAML secrets configuration
//!
//! ```yaml
//! default_provider: keychain
//! cache_ttl_secs: 300
//! env:
//!   prefix: DVM_SECRET_
//! keychain:
//!   service: devopsmaestro
//!   not_found_phrases: ["item not present"]
//!   not_found_exit_codes: [44]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CACHE_TTL;
use crate::providers::{
    EnvProviderConfig, KeychainConfig, SecretError, SecretResult, DEFAULT_ENV_PREFIX,
    DEFAULT_KEYCHAIN_SERVICE, DEFAULT_NOT_FOUND_EXIT_CODES,
};

pub const ENV_DEFAULT_PROVIDER: &str = "DVM_SECRETS_DEFAULT_PROVIDER";
pub const ENV_CACHE_TTL_SECS: &str = "DVM_SECRETS_CACHE_TTL_SECS";
pub const ENV_ENV_PREFIX: &str = "DVM_SECRETS_ENV_PREFIX";
pub const ENV_KEYCHAIN_SERVICE: &str = "DVM_SECRETS_KEYCHAIN_SERVICE";

/// Top-level secrets configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// Overrides the first-registered default provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,
    pub cache_ttl_secs: u64,
    pub env: EnvSection,
    pub keychain: KeychainSection,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            default_provider: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
            env: EnvSection::default(),
            keychain: KeychainSection::default(),
        }
    }
}

/// `env:` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvSection {
    pub prefix: String,
}

impl Default for EnvSection {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }
}

/// `keychain:` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeychainSection {
    pub service: String,
    /// Helper binary, `security` unless overridden
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Added to the built-in phrases
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_found_phrases: Vec<String>,
    pub not_found_exit_codes: Vec<i32>,
}

impl Default for KeychainSection {
    fn default() -> Self {
        Self {
            service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
            program: None,
            not_found_phrases: Vec::new(),
            not_found_exit_codes: DEFAULT_NOT_FOUND_EXIT_CODES.to_vec(),
        }
    }
}

impl SecretsConfig {
    /// User-level config path (`~/.config/devopsmaestro/secrets.yaml` on Linux)
    pub fn user_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join("devopsmaestro").join("secrets.yaml")
    }

    /// Load from a YAML file, falling back to defaults when it does not exist
    pub fn load(path: impl AsRef<Path>) -> SecretResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            SecretError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            SecretError::Config(message) => {
                SecretError::Config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Load the user-level file and apply environment overrides
    pub fn load_user() -> SecretResult<Self> {
        let mut config = Self::load(Self::user_path())?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a YAML document; an empty document yields defaults
    pub fn from_yaml(content: &str) -> SecretResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| SecretError::Config(format!("failed to parse YAML: {}", e)))
    }

    /// Apply `DVM_SECRETS_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from any variable source
    ///
    /// Empty values are ignored, as are TTLs that are not a whole number of seconds.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(provider) = get(ENV_DEFAULT_PROVIDER) {
            self.default_provider = Some(provider);
        }
        if let Some(ttl) = get(ENV_CACHE_TTL_SECS).and_then(|v| v.trim().parse().ok()) {
            self.cache_ttl_secs = ttl;
        }
        if let Some(prefix) = get(ENV_ENV_PREFIX) {
            self.env.prefix = prefix;
        }
        if let Some(service) = get(ENV_KEYCHAIN_SERVICE) {
            self.keychain.service = service;
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn env_config(&self) -> EnvProviderConfig {
        EnvProviderConfig {
            prefix: self.env.prefix.clone(),
        }
    }

    /// Keychain settings, with configured phrases appended to the built-in list
    pub fn keychain_config(&self) -> KeychainConfig {
        let mut config = KeychainConfig::default().with_service(self.keychain.service.clone());
        if let Some(program) = &self.keychain.program {
            config.program = program.clone();
        }
        config.not_found_exit_codes = self.keychain.not_found_exit_codes.clone();
        for phrase in &self.keychain.not_found_phrases {
            if !config.not_found_phrases.contains(phrase) {
                config.not_found_phrases.push(phrase.clone());
            }
        }
        config
    }
}
