//! Environment variable secret provider

use std::env::{self, VarError};

use crate::resolver::convert_name_to_env_var;
use crate::types::{CancellationToken, SecretRequest};
use super::error::{SecretError, SecretResult};
use super::traits::SecretProvider;

/// Default prefix for secret environment variables
pub const DEFAULT_ENV_PREFIX: &str = "DVM_SECRET_";

/// Configuration for `EnvProvider`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvProviderConfig {
    /// Prepended to the converted secret name
    pub prefix: String,
}

impl Default for EnvProviderConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }
}

/// Secret provider that reads environment variables
///
/// A secret name is converted with `convert_name_to_env_var` and looked up
/// with the prefix first, then without it:
/// - `github-token` → `DVM_SECRET_GITHUB_TOKEN`, then `GITHUB_TOKEN`
///
/// A `key` on the request is accepted but ignored; the whole variable
/// value is returned.
///
/// # Example
///
/// ```
/// use dvm_secrets::{CancellationToken, EnvProvider, SecretProvider, SecretRequest};
///
/// std::env::set_var("DVM_SECRET_DOC_EXAMPLE_TOKEN", "value");
/// let provider = EnvProvider::new();
/// let value = provider
///     .get_secret(&CancellationToken::new(), &SecretRequest::new("doc-example-token"))
///     .unwrap();
/// assert_eq!(value, "value");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvProvider {
    config: EnvProviderConfig,
}

impl EnvProvider {
    /// Create a provider with the default `DVM_SECRET_` prefix
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with an explicit configuration
    pub fn with_config(config: EnvProviderConfig) -> Self {
        Self { config }
    }

    /// Create a provider with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::with_config(EnvProviderConfig {
            prefix: prefix.into(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.config.prefix
    }

    /// The prefixed variable name for a secret name
    pub fn env_var_name(&self, name: &str) -> String {
        format!("{}{}", self.config.prefix, convert_name_to_env_var(name))
    }
}

impl SecretProvider for EnvProvider {
    fn name(&self) -> &str {
        "env"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn get_secret(&self, cancel: &CancellationToken, request: &SecretRequest) -> SecretResult<String> {
        cancel.check()?;

        let unprefixed = convert_name_to_env_var(&request.name);
        let prefixed = format!("{}{}", self.config.prefix, unprefixed);

        for var in [&prefixed, &unprefixed] {
            match env::var(var) {
                Ok(value) => return Ok(value),
                Err(VarError::NotPresent) => continue,
                Err(VarError::NotUnicode(_)) => {
                    return Err(SecretError::provider(
                        self.name(),
                        format!("environment variable {} is not valid UTF-8", var),
                    ));
                }
            }
        }
        Err(SecretError::not_found(self.name(), &request.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(provider: &EnvProvider, name: &str) -> SecretResult<String> {
        provider.get_secret(&CancellationToken::new(), &SecretRequest::new(name))
    }

    #[test]
    fn test_env_provider_name() {
        let provider = EnvProvider::new();
        assert_eq!(provider.name(), "env");
        assert!(provider.is_available());
        assert_eq!(provider.prefix(), DEFAULT_ENV_PREFIX);
    }

    #[test]
    fn test_env_var_name() {
        let provider = EnvProvider::new();
        assert_eq!(provider.env_var_name("github-token"), "DVM_SECRET_GITHUB_TOKEN");
        assert_eq!(provider.env_var_name("api.key"), "DVM_SECRET_API_KEY");
    }

    #[test]
    fn test_env_provider_prefixed() {
        env::set_var("DVM_SECRET_ENV_TEST_PREFIXED", "prefixed-value");

        let provider = EnvProvider::new();
        assert_eq!(get(&provider, "env-test.prefixed").unwrap(), "prefixed-value");

        env::remove_var("DVM_SECRET_ENV_TEST_PREFIXED");
    }

    #[test]
    fn test_env_provider_unprefixed_fallback() {
        env::set_var("ENV_TEST_FALLBACK_ONLY", "legacy-value");

        let provider = EnvProvider::new();
        assert_eq!(get(&provider, "env-test-fallback-only").unwrap(), "legacy-value");

        env::remove_var("ENV_TEST_FALLBACK_ONLY");
    }

    #[test]
    fn test_env_provider_prefers_prefixed() {
        env::set_var("DVM_SECRET_ENV_TEST_BOTH", "prefixed");
        env::set_var("ENV_TEST_BOTH", "unprefixed");

        let provider = EnvProvider::new();
        assert_eq!(get(&provider, "env-test-both").unwrap(), "prefixed");

        env::remove_var("DVM_SECRET_ENV_TEST_BOTH");
        env::remove_var("ENV_TEST_BOTH");
    }

    #[test]
    fn test_env_provider_custom_prefix() {
        env::set_var("CUSTOM_PFX_ENV_TEST_CUSTOM", "custom");

        let provider = EnvProvider::with_prefix("CUSTOM_PFX_");
        assert_eq!(get(&provider, "env-test-custom").unwrap(), "custom");

        env::remove_var("CUSTOM_PFX_ENV_TEST_CUSTOM");
    }

    #[test]
    fn test_env_provider_ignores_key() {
        env::set_var("DVM_SECRET_ENV_TEST_KEYED", "whole-value");

        let provider = EnvProvider::new();
        let request = SecretRequest::new("env-test-keyed").with_key("field");
        let value = provider.get_secret(&CancellationToken::new(), &request).unwrap();
        assert_eq!(value, "whole-value");

        env::remove_var("DVM_SECRET_ENV_TEST_KEYED");
    }

    #[test]
    fn test_env_provider_not_found() {
        let provider = EnvProvider::new();
        let err = get(&provider, "env-test-definitely-missing-xyz").unwrap_err();
        assert!(err.is_not_found());
    }

    #[cfg(unix)]
    #[test]
    fn test_env_provider_non_unicode_is_provider_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        env::set_var("DVM_SECRET_ENV_TEST_NON_UNICODE", OsStr::from_bytes(b"bad\xff"));
        env::set_var("ENV_TEST_NON_UNICODE", "fallback");

        let err = get(&EnvProvider::new(), "env-test-non-unicode").unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(err.kind(), crate::providers::ErrorKind::Provider);
        assert!(err.to_string().contains("DVM_SECRET_ENV_TEST_NON_UNICODE"));
        assert!(!err.to_string().contains("fallback"));

        env::remove_var("DVM_SECRET_ENV_TEST_NON_UNICODE");
        env::remove_var("ENV_TEST_NON_UNICODE");
    }

    #[test]
    fn test_env_provider_cancelled() {
        env::set_var("DVM_SECRET_ENV_TEST_CANCELLED", "value");

        let cancel = CancellationToken::new();
        cancel.cancel();
        let provider = EnvProvider::new();
        let err = provider
            .get_secret(&cancel, &SecretRequest::new("env-test-cancelled"))
            .unwrap_err();
        assert!(err.is_cancelled());

        env::remove_var("DVM_SECRET_ENV_TEST_CANCELLED");
    }
}
