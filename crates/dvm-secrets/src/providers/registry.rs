//! Provider registry: named providers plus a default pointer
//!
//! The registry is an explicit value built once at startup and shared by
//! reference (usually `Arc<ProviderRegistry>`) with every resolver.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::SecretsConfig;
use crate::logging::{NoOpLogger, SharedLogger};
use crate::{log_debug, log_info};
use super::env_provider::EnvProvider;
use super::error::{SecretError, SecretResult};
use super::keychain_provider::KeychainProvider;
use super::traits::SecretProvider;

#[derive(Default)]
struct RegistryState {
    default_provider: Option<String>,
    providers: HashMap<String, Arc<dyn SecretProvider>>,
}

/// Registry of secret providers keyed by `SecretProvider::name()`
///
/// The first provider registered becomes the default. Reads take a shared
/// lock and writes an exclusive one, so the registry can be used from many
/// resolution sessions at once. Availability is checked on every lookup,
/// outside the lock.
pub struct ProviderRegistry {
    state: RwLock<RegistryState>,
    logger: SharedLogger,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::with_logger(NoOpLogger::shared())
    }

    pub fn with_logger(logger: SharedLogger) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            logger,
        }
    }

    /// Build the startup registry from configuration
    ///
    /// Registers the keychain provider when it is available on this OS,
    /// then the environment provider, so the keychain is the default on
    /// macOS and env elsewhere. `default_provider` from the config then
    /// overrides that choice.
    pub fn from_config(config: &SecretsConfig, logger: SharedLogger) -> SecretResult<Self> {
        let registry = Self::with_logger(logger.clone());

        let keychain = KeychainProvider::with_config(config.keychain_config()).with_logger(logger);
        if keychain.is_available() {
            registry.register(Arc::new(keychain));
        }
        registry.register(Arc::new(EnvProvider::with_config(config.env_config())));

        if let Some(name) = &config.default_provider {
            registry.set_default(name)?;
        }
        Ok(registry)
    }

    /// Add a provider, replacing any provider with the same name
    ///
    /// Becomes the default if no default is set.
    pub fn register(&self, provider: Arc<dyn SecretProvider>) {
        let name = provider.name().to_string();
        let mut state = self.state.write();
        let replaced = state.providers.insert(name.clone(), provider).is_some();
        if state.default_provider.is_none() {
            state.default_provider = Some(name.clone());
            log_info!(self.logger, "registered secret provider '{}' (default)", name);
        } else if replaced {
            log_info!(self.logger, "replaced secret provider '{}'", name);
        } else {
            log_info!(self.logger, "registered secret provider '{}'", name);
        }
    }

    /// Remove a provider, clearing the default if it pointed at it
    ///
    /// Returns whether a provider was removed.
    pub fn unregister(&self, name: &str) -> bool {
        let mut state = self.state.write();
        let removed = state.providers.remove(name).is_some();
        if state.default_provider.as_deref() == Some(name) {
            state.default_provider = None;
            log_info!(self.logger, "unregistered default secret provider '{}'", name);
        } else if removed {
            log_info!(self.logger, "unregistered secret provider '{}'", name);
        }
        removed
    }

    /// Look up a registered, currently available provider
    pub fn get(&self, name: &str) -> SecretResult<Arc<dyn SecretProvider>> {
        let provider = self
            .state
            .read()
            .providers
            .get(name)
            .cloned()
            .ok_or_else(|| SecretError::ProviderNotFound(name.to_string()))?;

        if !provider.is_available() {
            log_debug!(self.logger, "secret provider '{}' is not available", name);
            return Err(SecretError::ProviderNotAvailable(name.to_string()));
        }
        Ok(provider)
    }

    /// Look up the default provider
    pub fn get_default(&self) -> SecretResult<Arc<dyn SecretProvider>> {
        let name = self.default_name().ok_or(SecretError::NoDefaultProvider)?;
        self.get(&name)
    }

    /// Name of the default provider, if one is set
    pub fn default_name(&self) -> Option<String> {
        self.state.read().default_provider.clone()
    }

    /// Make a registered provider the default
    pub fn set_default(&self, name: &str) -> SecretResult<()> {
        let mut state = self.state.write();
        if !state.providers.contains_key(name) {
            return Err(SecretError::ProviderNotFound(name.to_string()));
        }
        state.default_provider = Some(name.to_string());
        log_info!(self.logger, "default secret provider set to '{}'", name);
        Ok(())
    }

    /// Whether a provider is registered under this name
    pub fn contains(&self, name: &str) -> bool {
        self.state.read().providers.contains_key(name)
    }

    /// Names of all registered providers, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.read().providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Names of registered providers that are available right now, sorted
    pub fn list_available(&self) -> Vec<String> {
        let providers: Vec<Arc<dyn SecretProvider>> =
            self.state.read().providers.values().cloned().collect();
        let mut names: Vec<String> = providers
            .iter()
            .filter(|p| p.is_available())
            .map(|p| p.name().to_string())
            .collect();
        names.sort();
        names
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.list())
            .field("default_provider", &self.default_name())
            .finish()
    }
}
