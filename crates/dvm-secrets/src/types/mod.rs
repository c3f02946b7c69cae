//! Core types shared by providers and the resolver

mod cancellation;
mod reference;

pub use cancellation::CancellationToken;
pub use reference::{SecretReference, SecretRequest, ValueFrom};
