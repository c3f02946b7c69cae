//! DevOpsMaestro secrets
//!
//! Pluggable secret providers and placeholder resolution for DVM
//! configuration documents.
//!
//! A document may reference secrets inline:
//!
//! ```yaml
//! env:
//!   GITHUB_TOKEN: ${secret:github-token}
//!   DB_PASSWORD: ${secret:db-password:env}
//! ```
//!
//! or through a structured `valueFrom.secretRef` record. A [`SecretResolver`]
//! replaces each reference with the value fetched from a registered
//! [`SecretProvider`], caching results for the lifetime of one operation.
//!
//! ```no_run
//! use std::sync::Arc;
//! use dvm_secrets::{
//!     CancellationToken, ProviderRegistry, SecretResolver, SecretsConfig, TracingLogger,
//! };
//!
//! let config = SecretsConfig::load_user()?;
//! let registry = Arc::new(ProviderRegistry::from_config(&config, Arc::new(TracingLogger))?);
//! let resolver = SecretResolver::from_config(registry, &config);
//!
//! let cancel = CancellationToken::new();
//! let rendered = resolver.resolve_inline(&cancel, "token: ${secret:github-token}")?;
//! resolver.clear_cache();
//! # let _ = rendered;
//! # Ok::<(), dvm_secrets::SecretError>(())
//! ```

pub mod types;
pub mod providers;
pub mod cache;
pub mod resolver;
pub mod logging;
pub mod config;

// Re-export commonly used types
pub use types::{CancellationToken, SecretReference, SecretRequest, ValueFrom};

pub use providers::{
    ErrorKind, SecretError, SecretResult, SecretProvider,
    EnvProvider, KeychainProvider, MockProvider,
    ProviderRegistry,
};

pub use cache::SecretCache;

pub use resolver::{
    SecretResolver,
    convert_name_to_env_var, extract_secret_references, has_secret_references,
};

pub use logging::{Logger, NoOpLogger, ConsoleLogger, TracingLogger};

pub use config::SecretsConfig;
