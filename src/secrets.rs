use std::collections::HashMap;

use crate::error::{AppError, Result};

/// Resolves named credentials from the process environment.
///
/// The identifier names an environment variable whose value is a JSON object,
/// e.g. `GITHUB_TOKEN={"token": "ghp_..."}`. This stands in for an external
/// secret store; the contract is the same: a mapping comes back, or the
/// secret is unavailable. Secrets are resolved once per job run, never
/// cached.
pub struct SecretResolver;

impl SecretResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, identifier: &str) -> Result<HashMap<String, String>> {
        let raw = std::env::var(identifier).map_err(|_| {
            AppError::SecretUnavailable(format!("secret {} is not set", identifier))
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            AppError::SecretUnavailable(format!("secret {} is not valid JSON: {}", identifier, e))
        })
    }

    /// Resolve a secret and pull a single required field out of it.
    pub fn resolve_field(&self, identifier: &str, field: &str) -> Result<String> {
        let mut secret = self.resolve(identifier)?;
        secret.remove(field).ok_or_else(|| {
            AppError::SecretUnavailable(format!(
                "secret {} is missing the {:?} field",
                identifier, field
            ))
        })
    }
}

impl Default for SecretResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_json_object_from_env() {
        std::env::set_var("TEST_SECRET_OK", r#"{"token": "abc", "extra": "1"}"#);
        let resolver = SecretResolver::new();
        let secret = resolver.resolve("TEST_SECRET_OK").unwrap();
        assert_eq!(secret.get("token").map(String::as_str), Some("abc"));
        assert_eq!(
            resolver.resolve_field("TEST_SECRET_OK", "token").unwrap(),
            "abc"
        );
    }

    #[test]
    fn missing_identifier_is_unavailable() {
        let resolver = SecretResolver::new();
        let err = resolver.resolve("TEST_SECRET_DOES_NOT_EXIST").unwrap_err();
        assert!(matches!(err, AppError::SecretUnavailable(_)));
    }

    #[test]
    fn malformed_payload_is_unavailable() {
        std::env::set_var("TEST_SECRET_BAD", "not json");
        let resolver = SecretResolver::new();
        let err = resolver.resolve("TEST_SECRET_BAD").unwrap_err();
        assert!(matches!(err, AppError::SecretUnavailable(_)));
    }

    #[test]
    fn missing_field_is_unavailable() {
        std::env::set_var("TEST_SECRET_NO_FIELD", r#"{"other": "x"}"#);
        let resolver = SecretResolver::new();
        let err = resolver
            .resolve_field("TEST_SECRET_NO_FIELD", "token")
            .unwrap_err();
        assert!(matches!(err, AppError::SecretUnavailable(_)));
    }
}
