//! Inline `${secret:...}` reference grammar

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::types::SecretReference;

/// Matches `${secret:<name>}` and `${secret:<name>:<provider>}`
///
/// `<name>` excludes `:` and `}`; `<provider>` excludes `}`.
static INLINE_SECRET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{secret:([^:}]+)(?::([^}]+))?\}").expect("inline secret pattern is valid")
});

pub(crate) fn inline_secret_regex() -> &'static Regex {
    &INLINE_SECRET_REGEX
}

/// Build a reference from one inline match
pub(crate) fn reference_from_captures(captures: &Captures<'_>) -> SecretReference {
    SecretReference {
        name: captures[1].to_string(),
        provider: captures.get(2).map(|m| m.as_str().to_string()),
        ..Default::default()
    }
}

/// Check whether `content` contains any inline secret reference
pub fn has_secret_references(content: &str) -> bool {
    INLINE_SECRET_REGEX.is_match(content)
}

/// Extract every inline secret reference in `content`, in scan order
///
/// Duplicates are kept, one entry per occurrence.
pub fn extract_secret_references(content: &str) -> Vec<SecretReference> {
    INLINE_SECRET_REGEX
        .captures_iter(content)
        .map(|captures| reference_from_captures(&captures))
        .collect()
}

/// Convert a secret name to its environment variable form
///
/// `-` and `.` become `_` and the result is upper-cased:
/// `github-token` → `GITHUB_TOKEN`, `api.key` → `API_KEY`.
pub fn convert_name_to_env_var(name: &str) -> String {
    name.replace(['-', '.'], "_").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_secret_references() {
        assert!(has_secret_references("token: ${secret:github-token}"));
        assert!(has_secret_references("${secret:db:keychain}"));
        assert!(!has_secret_references("token: plain"));
        assert!(!has_secret_references("${env:HOME}"));
        assert!(!has_secret_references("${secret:}"));
        assert!(!has_secret_references("${secret:unterminated"));
    }

    #[test]
    fn test_extract_secret_references() {
        let content = "a: ${secret:one}\nb: ${secret:two:env}\nc: ${secret:one}";
        let refs = extract_secret_references(content);

        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0], SecretReference::new("one"));
        assert_eq!(refs[1], SecretReference::new("two").with_provider("env"));
        assert_eq!(refs[2], SecretReference::new("one"));
    }

    #[test]
    fn test_provider_may_contain_colons() {
        let refs = extract_secret_references("${secret:name:vault:kv}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "name");
        assert_eq!(refs[0].provider.as_deref(), Some("vault:kv"));
    }

    #[test]
    fn test_malformed_patterns_are_ignored() {
        assert!(extract_secret_references("${secret:name:}").is_empty());
        assert!(extract_secret_references("$secret:name}").is_empty());
        assert!(extract_secret_references("{secret:name}").is_empty());
    }

    #[test]
    fn test_convert_name_to_env_var() {
        assert_eq!(convert_name_to_env_var("github-token"), "GITHUB_TOKEN");
        assert_eq!(convert_name_to_env_var("api.key"), "API_KEY");
        assert_eq!(convert_name_to_env_var("a-b.c_d"), "A_B_C_D");
        assert_eq!(convert_name_to_env_var("PLAIN"), "PLAIN");
    }
}
