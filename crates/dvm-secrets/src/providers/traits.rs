//! Secret provider capability trait

use crate::types::{CancellationToken, SecretRequest};
use super::error::SecretResult;

/// A pluggable backend that can retrieve named secrets
///
/// Implementations:
/// - `EnvProvider`: environment variables, always available
/// - `KeychainProvider`: macOS Keychain through the `security` helper
/// - `MockProvider`: in-memory test double with call counting
///
/// A single instance is shared across concurrent resolution sessions, so
/// every method must be safe to call from several threads at once.
pub trait SecretProvider: Send + Sync {
    /// Stable identifier, used as the registry key and as the provider
    /// override in `${secret:name:provider}`
    fn name(&self) -> &str;

    /// Whether this provider can operate in the current environment
    ///
    /// Called on every retrieval; the result must not be cached by callers.
    fn is_available(&self) -> bool;

    /// Retrieve a secret
    ///
    /// Must check `cancel` before doing expensive work, must return
    /// `SecretError::NotFound` when the name/key has no value, and must never
    /// put the secret value in an error.
    fn get_secret(&self, cancel: &CancellationToken, request: &SecretRequest) -> SecretResult<String>;
}

impl std::fmt::Debug for dyn SecretProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretProvider")
            .field("name", &self.name())
            .finish()
    }
}
