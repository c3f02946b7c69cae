//! Mock provider for testing
//!
//! Deterministic, in-memory secrets with call counting, so resolver and
//! registry behaviour can be tested without a real backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::types::{CancellationToken, SecretRequest};
use super::error::{SecretError, SecretResult};
use super::traits::SecretProvider;

/// Configuration for the mock provider
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Provider name reported by `name()`
    pub name: String,
    /// Initial availability
    pub available: bool,
    /// Secrets keyed by `name`, or `name/key` for keyed lookups
    pub secrets: HashMap<String, String>,
    /// When set, every lookup fails with a provider error carrying this message
    pub error: Option<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            available: true,
            secrets: HashMap::new(),
            error: None,
        }
    }
}

/// In-memory `SecretProvider` that records every lookup
#[derive(Debug)]
pub struct MockProvider {
    name: String,
    available: AtomicBool,
    secrets: RwLock<HashMap<String, String>>,
    error: Option<String>,
    calls: RwLock<Vec<String>>,
}

impl MockProvider {
    /// Create an empty, available mock provider with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(MockConfig {
            name: name.into(),
            ..Default::default()
        })
    }

    /// Create with specific config
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            name: config.name,
            available: AtomicBool::new(config.available),
            secrets: RwLock::new(config.secrets),
            error: config.error,
            calls: RwLock::new(Vec::new()),
        }
    }

    /// Create an unavailable provider
    pub fn unavailable(name: impl Into<String>) -> Self {
        Self::with_config(MockConfig {
            name: name.into(),
            available: false,
            ..Default::default()
        })
    }

    /// Create a provider whose every lookup fails
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_config(MockConfig {
            name: name.into(),
            error: Some(message.into()),
            ..Default::default()
        })
    }

    /// Add a secret
    pub fn with_secret(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_secret(name, value);
        self
    }

    /// Add or replace a secret
    pub fn set_secret(&self, name: impl Into<String>, value: impl Into<String>) {
        self.secrets.write().insert(name.into(), value.into());
    }

    /// Toggle availability
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Total number of `get_secret` calls
    pub fn call_count(&self) -> usize {
        self.calls.read().len()
    }

    /// Number of `get_secret` calls for a secret name
    pub fn calls_for(&self, name: &str) -> usize {
        self.calls.read().iter().filter(|n| n.as_str() == name).count()
    }

    /// Forget recorded calls
    pub fn reset_calls(&self) {
        self.calls.write().clear();
    }
}

impl SecretProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn get_secret(&self, cancel: &CancellationToken, request: &SecretRequest) -> SecretResult<String> {
        cancel.check()?;
        self.calls.write().push(request.name.clone());

        if let Some(message) = &self.error {
            return Err(SecretError::provider(&self.name, message.clone()));
        }

        let lookup = match &request.key {
            Some(key) => format!("{}/{}", request.name, key),
            None => request.name.clone(),
        };
        self.secrets
            .read()
            .get(&lookup)
            .cloned()
            .ok_or_else(|| SecretError::not_found(&self.name, &request.name))
    }
}
