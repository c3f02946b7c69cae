//! Secret providers
//!
//! A provider retrieves a secret value by name from one backend:
//!
//! - `KeychainProvider`: macOS Keychain via the `security` helper
//! - `EnvProvider`: process environment variables
//! - `MockProvider`: in-memory, for tests and embedding
//!
//! Providers are looked up by name through a `ProviderRegistry`.

mod traits;
mod error;
mod command;
mod env_provider;
mod keychain_provider;
mod mock;
mod registry;

pub use traits::SecretProvider;
pub use error::{ErrorKind, SecretError, SecretResult};
pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use env_provider::{EnvProvider, EnvProviderConfig, DEFAULT_ENV_PREFIX};
pub use keychain_provider::{
    KeychainConfig, KeychainProvider, DEFAULT_KEYCHAIN_SERVICE, DEFAULT_NOT_FOUND_EXIT_CODES,
    DEFAULT_NOT_FOUND_PHRASES, SERVICE_OPTION,
};
pub use mock::{MockConfig, MockProvider};
pub use registry::ProviderRegistry;
