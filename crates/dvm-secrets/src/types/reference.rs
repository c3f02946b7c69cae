//! Secret requests and document-level secret references

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The minimal ask passed to a `SecretProvider`
///
/// `key` selects a field inside a structured secret; `options` carries
/// provider-specific overrides (for example `service` for the keychain).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretRequest {
    pub name: String,
    pub key: Option<String>,
    pub options: HashMap<String, String>,
}

impl SecretRequest {
    /// Create a request for a named secret
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
            options: HashMap::new(),
        }
    }

    /// Select a field within the secret
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add a provider-specific option
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Look up a provider-specific option
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}

/// A structured secret reference, as embedded under `valueFrom.secretRef`
///
/// ```yaml
/// valueFrom:
///   secretRef:
///     name: github-token
///     provider: keychain
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub options: HashMap<String, String>,
}

impl SecretReference {
    /// Reference a secret through the default provider
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Pin the reference to a specific provider
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Select a field within the secret
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add a provider-specific option
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Build the provider-level request for this reference
    pub fn to_request(&self) -> SecretRequest {
        SecretRequest {
            name: self.name.clone(),
            key: self.key.clone(),
            options: self.options.clone(),
        }
    }
}

/// The `valueFrom` indirection wrapping a `SecretReference`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueFrom {
    #[serde(rename = "secretRef")]
    pub secret_ref: SecretReference,
}

impl From<SecretReference> for ValueFrom {
    fn from(secret_ref: SecretReference) -> Self {
        Self { secret_ref }
    }
}
