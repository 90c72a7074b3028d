//! Validation traits and utilities for OpenAPI document structure.

use crate::error::{OpenApiError, OpenApiResult};

/// Trait for validating OpenAPI document objects.
pub trait Validate {
    /// Validate this object against the structural constraints of the document model.
    ///
    /// Returns `Ok(())` if valid, or an `OpenApiError` describing the validation failure.
    fn validate(&self) -> OpenApiResult<()>;
}

/// Validate URL format
pub fn validate_url(url: &str) -> OpenApiResult<()> {
    if url.is_empty() {
        return Err(OpenApiError::invalid_url("URL cannot be empty"));
    }

    // Relative references like `pet.yaml#/Pet` are allowed
    if url.chars().any(char::is_whitespace) {
        return Err(OpenApiError::invalid_url(url));
    }

    Ok(())
}

/// Validate the `openapi` version field of a document
pub fn validate_openapi_version(version: &str) -> OpenApiResult<()> {
    if version.is_empty() {
        return Err(OpenApiError::missing_field("openapi"));
    }

    if !crate::version::is_supported(version) {
        return Err(OpenApiError::unsupported_version(version));
    }

    Ok(())
}

/// Validate that a string contains only valid key characters for components
pub fn validate_component_key(key: &str) -> OpenApiResult<()> {
    if key.is_empty() {
        return Err(OpenApiError::validation("Component key cannot be empty"));
    }

    // OpenAPI: ^[a-zA-Z0-9\.\-_]+$
    for ch in key.chars() {
        if !ch.is_ascii_alphanumeric() && ch != '.' && ch != '-' && ch != '_' {
            return Err(OpenApiError::validation(format!(
                "Invalid component key character '{}' in key '{}'",
                ch, key
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com/schemas.json").is_ok());
        assert!(validate_url("pet.yaml#/Pet").is_ok());
        assert!(validate_url("/relative/path").is_ok());

        assert!(validate_url("").is_err());
        assert!(validate_url("has space.json").is_err());
    }

    #[test]
    fn test_validate_openapi_version() {
        assert!(validate_openapi_version("3.0.3").is_ok());
        assert!(validate_openapi_version("3.0.0").is_ok());

        assert!(validate_openapi_version("").is_err());
        assert!(validate_openapi_version("2.0").is_err());
        assert!(validate_openapi_version("3.1.0").is_err());
    }

    #[test]
    fn test_validate_component_key() {
        assert!(validate_component_key("validKey").is_ok());
        assert!(validate_component_key("valid.key").is_ok());
        assert!(validate_component_key("valid-key").is_ok());
        assert!(validate_component_key("valid_key").is_ok());
        assert!(validate_component_key("123").is_ok());

        assert!(validate_component_key("").is_err());
        assert!(validate_component_key("invalid key").is_err());
        assert!(validate_component_key("invalid$key").is_err());
    }
}
