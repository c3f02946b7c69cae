//! Secret resolution: inline placeholders and structured references
//!
//! Every lookup goes provider selection → cache → provider. Only successful
//! lookups are cached, and a failed inline substitution never yields a
//! partially substituted document.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::cache::SecretCache;
use crate::config::SecretsConfig;
use crate::logging::{NoOpLogger, SharedLogger};
use crate::providers::{ProviderRegistry, SecretError, SecretProvider, SecretResult};
use crate::types::{CancellationToken, SecretReference, ValueFrom};
use crate::{log_debug, log_warn};
use super::patterns::{extract_secret_references, inline_secret_regex, reference_from_captures};

const DEFAULT_PROVIDER_LABEL: &str = "(default)";

/// Resolves secret references against a `ProviderRegistry`
///
/// Construct one resolver per logical operation (e.g. one `apply`) and call
/// `clear_cache()` when it finishes.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use dvm_secrets::{CancellationToken, MockProvider, ProviderRegistry, SecretResolver};
///
/// let registry = Arc::new(ProviderRegistry::new());
/// registry.register(Arc::new(MockProvider::new("mock").with_secret("github-token", "ghp_test123")));
///
/// let resolver = SecretResolver::new(registry);
/// let cancel = CancellationToken::new();
/// let out = resolver.resolve_inline(&cancel, "token: ${secret:github-token}").unwrap();
/// assert_eq!(out, "token: ghp_test123");
/// resolver.clear_cache();
/// ```
pub struct SecretResolver {
    registry: Arc<ProviderRegistry>,
    cache: Arc<SecretCache>,
    logger: SharedLogger,
}

impl SecretResolver {
    /// Create a resolver with its own cache using the default TTL
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self::with_cache(registry, Arc::new(SecretCache::default()))
    }

    /// Create a resolver with an injected cache
    pub fn with_cache(registry: Arc<ProviderRegistry>, cache: Arc<SecretCache>) -> Self {
        Self {
            registry,
            cache,
            logger: NoOpLogger::shared(),
        }
    }

    /// Create a resolver whose cache uses the configured TTL
    pub fn from_config(registry: Arc<ProviderRegistry>, config: &SecretsConfig) -> Self {
        Self::with_cache(registry, Arc::new(SecretCache::new(config.cache_ttl())))
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<SecretCache> {
        &self.cache
    }

    /// Replace every `${secret:...}` placeholder in `content`
    ///
    /// Placeholders are resolved left to right. If any one fails the whole
    /// call fails and no output is returned.
    pub fn resolve_inline(&self, cancel: &CancellationToken, content: &str) -> SecretResult<String> {
        cancel.check()?;

        let regex = inline_secret_regex();
        if !regex.is_match(content) {
            return Ok(content.to_string());
        }

        // Wiped on drop, so an early error return leaves no substituted values behind
        let mut output = Zeroizing::new(String::with_capacity(content.len()));
        let mut last = 0;
        for captures in regex.captures_iter(content) {
            let Some(whole) = captures.get(0) else { continue };
            let reference = reference_from_captures(&captures);
            let value = Zeroizing::new(self.resolve(cancel, &reference, "resolve inline")?);

            output.push_str(&content[last..whole.start()]);
            output.push_str(&value);
            last = whole.end();
        }
        output.push_str(&content[last..]);

        Ok(std::mem::take(&mut *output))
    }

    /// Resolve one structured reference
    pub fn resolve_reference(&self, cancel: &CancellationToken, reference: &SecretReference) -> SecretResult<String> {
        cancel.check()?;
        if reference.name.is_empty() {
            return Err(SecretError::invalid_reference("secret name is empty"));
        }
        self.resolve(cancel, reference, "resolve")
    }

    /// Resolve a `valueFrom.secretRef` record
    pub fn resolve_value_from(&self, cancel: &CancellationToken, value_from: &ValueFrom) -> SecretResult<String> {
        self.resolve_reference(cancel, &value_from.secret_ref)
    }

    /// Resolve every inline reference in `content`, discarding the values
    ///
    /// Stops at the first failure.
    pub fn validate_secret_references(&self, cancel: &CancellationToken, content: &str) -> SecretResult<()> {
        cancel.check()?;
        for reference in extract_secret_references(content) {
            drop(Zeroizing::new(self.resolve(cancel, &reference, "validate")?));
        }
        Ok(())
    }

    /// Drop every cached value
    pub fn clear_cache(&self) {
        log_debug!(self.logger, "clearing {} cached secret(s)", self.cache.size());
        self.cache.clear();
    }

    fn select_provider(&self, reference: &SecretReference) -> SecretResult<Arc<dyn SecretProvider>> {
        match &reference.provider {
            Some(name) => self.registry.get(name),
            None => self.registry.get_default(),
        }
    }

    fn resolve(
        &self,
        cancel: &CancellationToken,
        reference: &SecretReference,
        operation: &'static str,
    ) -> SecretResult<String> {
        cancel.check()?;

        let provider = self.select_provider(reference).map_err(|e| {
            let label = reference.provider.as_deref().unwrap_or(DEFAULT_PROVIDER_LABEL);
            log_warn!(self.logger, "{}: no usable provider '{}' for secret '{}': {}", operation, label, reference.name, e);
            e.context(operation, label, &reference.name)
        })?;
        let provider_name = provider.name();
        let key = reference.key.as_deref();

        if let Some(value) = self.cache.get(provider_name, &reference.name, key) {
            log_debug!(self.logger, "{}: cache hit for secret '{}' via '{}'", operation, reference.name, provider_name);
            return Ok(value);
        }
        log_debug!(self.logger, "{}: cache miss for secret '{}' via '{}'", operation, reference.name, provider_name);

        let value = provider
            .get_secret(cancel, &reference.to_request())
            .map_err(|e| {
                log_warn!(self.logger, "{}: secret '{}' via '{}' failed: {}", operation, reference.name, provider_name, e);
                e.context(operation, provider_name, &reference.name)
            })?;

        self.cache.set(provider_name, &reference.name, key, value.as_str());
        log_debug!(self.logger, "{}: resolved secret '{}' via '{}'", operation, reference.name, provider_name);
        Ok(value)
    }
}

impl std::fmt::Debug for SecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretResolver")
            .field("registry", &self.registry)
            .field("cache", &self.cache)
            .finish()
    }
}
