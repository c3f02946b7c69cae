//! Secrets subsystem configuration
//!
//! Loaded from `<config_dir>/devopsmaestro/secrets.yaml`, then adjusted by
//! `DVM_SECRETS_*` environment variables.

mod file;

pub use file::{
    EnvSection, KeychainSection, SecretsConfig,
    ENV_CACHE_TTL_SECS, ENV_DEFAULT_PROVIDER, ENV_ENV_PREFIX, ENV_KEYCHAIN_SERVICE,
};
