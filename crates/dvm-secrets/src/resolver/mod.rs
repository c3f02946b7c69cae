//! Placeholder detection and secret resolution
//!
//! Inline placeholders take the form `${secret:NAME}` or
//! `${secret:NAME:PROVIDER}`. Structured references use
//! [`SecretReference`](crate::types::SecretReference).

mod patterns;
mod secret_resolver;

pub use patterns::{convert_name_to_env_var, extract_secret_references, has_secret_references};
pub use secret_resolver::SecretResolver;
