//! Secret resolution error types

use thiserror::Error;

/// Classification of a `SecretError`, independent of any context wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ProviderNotFound,
    ProviderNotAvailable,
    InvalidReference,
    NoDefaultProvider,
    Cancelled,
    Provider,
    Io,
    Config,
}

/// Errors that can occur while retrieving or substituting secrets
///
/// No variant ever carries a resolved secret value, and reference errors
/// never echo the raw `${secret:...}` text they were parsed from.
#[derive(Error, Debug)]
pub enum SecretError {
    /// The provider has no value for the requested name/key
    #[error("secret '{name}' not found in provider '{provider}'")]
    NotFound { provider: String, name: String },

    /// No provider is registered under this name
    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    /// The provider is registered but cannot operate in this environment
    #[error("provider not available: {0}")]
    ProviderNotAvailable(String),

    /// The reference is empty or malformed
    #[error("invalid secret reference: {0}")]
    InvalidReference(String),

    /// No default provider has been configured
    #[error("no default secret provider configured")]
    NoDefaultProvider,

    /// The operation was cancelled before it completed
    #[error("secret resolution cancelled")]
    Cancelled,

    /// The backend failed for a reason other than "not found"
    #[error("provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    /// Spawning or waiting on an external helper failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// An error annotated with the operation, provider and secret involved
    #[error("{operation} secret '{secret}' via provider '{provider}': {source}")]
    Context {
        operation: &'static str,
        provider: String,
        secret: String,
        #[source]
        source: Box<SecretError>,
    },
}

impl SecretError {
    /// Create a not found error
    pub fn not_found(provider: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            provider: provider.into(),
            name: name.into(),
        }
    }

    /// Create a generic provider failure
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an invalid reference error
    pub fn invalid_reference(reason: impl Into<String>) -> Self {
        Self::InvalidReference(reason.into())
    }

    /// Wrap this error with the operation, provider and secret it relates to
    pub fn context(
        self,
        operation: &'static str,
        provider: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self::Context {
            operation,
            provider: provider.into(),
            secret: secret.into(),
            source: Box::new(self),
        }
    }

    /// The underlying error kind, looking through any context wrapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ProviderNotFound(_) => ErrorKind::ProviderNotFound,
            Self::ProviderNotAvailable(_) => ErrorKind::ProviderNotAvailable,
            Self::InvalidReference(_) => ErrorKind::InvalidReference,
            Self::NoDefaultProvider => ErrorKind::NoDefaultProvider,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Provider { .. } => ErrorKind::Provider,
            Self::Io(_) => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
            Self::Context { source, .. } => source.kind(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_provider_not_found(&self) -> bool {
        self.kind() == ErrorKind::ProviderNotFound
    }

    pub fn is_provider_not_available(&self) -> bool {
        self.kind() == ErrorKind::ProviderNotAvailable
    }

    pub fn is_invalid_reference(&self) -> bool {
        self.kind() == ErrorKind::InvalidReference
    }

    pub fn is_no_default_provider(&self) -> bool {
        self.kind() == ErrorKind::NoDefaultProvider
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }
}

pub type SecretResult<T> = Result<T, SecretError>;
