//! Error types for OpenAPI document decoding, validation and dereferencing.

use crate::ComponentKind;
use thiserror::Error;

/// Errors that can occur when decoding or validating OpenAPI documents.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpenApiError {
    /// Validation error when document constraints are violated
    #[error("Validation error: {message}")]
    ValidationError {
        /// Human-readable error message
        message: String,
        /// Optional field path where the error occurred
        field_path: Option<String>,
    },

    /// Error when parsing or serializing JSON
    #[error("JSON error: {message}")]
    JsonError {
        /// JSON parsing/serialization error message
        message: String,
    },

    /// Error when a `$ref` string is malformed or points at the wrong kind
    #[error("Invalid reference '{reference}': {message}")]
    ReferenceError {
        /// Why the reference was rejected
        message: String,
        /// The reference string that was rejected
        reference: String,
    },

    /// Error when a required field is missing
    #[error("Missing required field: {field_name}")]
    MissingField {
        /// Name of the missing required field
        field_name: String,
    },

    /// Error when a field has an invalid value
    #[error("Invalid field value for '{field_name}': {message}")]
    InvalidField {
        /// Name of the field with invalid value
        field_name: String,
        /// Description of why the value is invalid
        message: String,
    },

    /// Error when URL format is invalid
    #[error("Invalid URL format: {url}")]
    InvalidUrl {
        /// The invalid URL string
        url: String,
    },

    /// Error when the OpenAPI version is unsupported
    #[error("Unsupported OpenAPI version: {version}")]
    UnsupportedVersion {
        /// The unsupported version string
        version: String,
    },
}

impl OpenApiError {
    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field_path: None,
        }
    }

    /// Create a new validation error with field path
    pub fn validation_with_path(message: impl Into<String>, field_path: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field_path: Some(field_path.into()),
        }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::JsonError {
            message: message.into(),
        }
    }

    /// Create a new invalid reference error
    pub fn reference(message: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::ReferenceError {
            message: message.into(),
            reference: reference.into(),
        }
    }

    /// Create a new missing field error
    pub fn missing_field(field_name: impl Into<String>) -> Self {
        Self::MissingField {
            field_name: field_name.into(),
        }
    }

    /// Create a new invalid field error
    pub fn invalid_field(field_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field_name: field_name.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid URL error
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Create a new unsupported version error
    pub fn unsupported_version(version: impl Into<String>) -> Self {
        Self::UnsupportedVersion {
            version: version.into(),
        }
    }
}

impl From<serde_json::Error> for OpenApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::json(err.to_string())
    }
}

/// Result type for OpenAPI model operations
pub type OpenApiResult<T> = Result<T, OpenApiError>;

/// Failures raised while resolving references against a [`Components`](crate::Components) table.
///
/// The set is closed: dereferencing never fails for any other reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DereferenceError {
    /// The table has no entry of this kind under this name
    #[error("Component '{name}' not found in components/{kind}")]
    MissingComponent { kind: ComponentKind, name: String },

    /// The component was re-entered while it was still being resolved
    #[error("Cyclic reference to components/{kind}/{name}")]
    CyclicReference { kind: ComponentKind, name: String },

    /// The reference points outside the document
    #[error("External reference '{location}' cannot be resolved against local components")]
    UnsupportedExternalReference { location: String },
}

impl DereferenceError {
    /// Create a new missing component error
    pub fn missing_component(kind: ComponentKind, name: impl Into<String>) -> Self {
        Self::MissingComponent {
            kind,
            name: name.into(),
        }
    }

    /// Create a new cyclic reference error
    pub fn cyclic_reference(kind: ComponentKind, name: impl Into<String>) -> Self {
        Self::CyclicReference {
            kind,
            name: name.into(),
        }
    }

    /// Create a new unsupported external reference error
    pub fn unsupported_external(location: impl Into<String>) -> Self {
        Self::UnsupportedExternalReference {
            location: location.into(),
        }
    }

    /// The component kind involved, if the error concerns an internal reference
    pub fn kind(&self) -> Option<ComponentKind> {
        match self {
            Self::MissingComponent { kind, .. } | Self::CyclicReference { kind, .. } => Some(*kind),
            Self::UnsupportedExternalReference { .. } => None,
        }
    }

    /// The component name involved, if the error concerns an internal reference
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::MissingComponent { name, .. } | Self::CyclicReference { name, .. } => Some(name),
            Self::UnsupportedExternalReference { .. } => None,
        }
    }
}

/// Result type for dereferencing operations
pub type DereferenceResult<T> = Result<T, DereferenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = OpenApiError::validation("test message");
        assert!(matches!(err, OpenApiError::ValidationError { .. }));

        let err = OpenApiError::validation_with_path("test", "components.schemas");
        if let OpenApiError::ValidationError { field_path, .. } = err {
            assert_eq!(field_path, Some("components.schemas".to_string()));
        } else {
            panic!("Expected ValidationError");
        }
    }

    #[test]
    fn test_error_display() {
        let err = OpenApiError::reference("unknown component kind", "#/components/widgets/A");
        assert_eq!(
            err.to_string(),
            "Invalid reference '#/components/widgets/A': unknown component kind"
        );

        let err = OpenApiError::missing_field("description");
        assert_eq!(err.to_string(), "Missing required field: description");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json");
        assert!(json_err.is_err());

        let err: OpenApiError = json_err.unwrap_err().into();
        assert!(matches!(err, OpenApiError::JsonError { .. }));
    }

    #[test]
    fn test_dereference_error_display() {
        let err = DereferenceError::missing_component(ComponentKind::Headers, "test");
        assert_eq!(
            err.to_string(),
            "Component 'test' not found in components/headers"
        );

        let err = DereferenceError::cyclic_reference(ComponentKind::Schemas, "Node");
        assert_eq!(err.to_string(), "Cyclic reference to components/schemas/Node");

        let err = DereferenceError::unsupported_external("https://example.com/pet.json");
        assert!(err.to_string().contains("https://example.com/pet.json"));
    }

    #[test]
    fn test_dereference_error_accessors() {
        let err = DereferenceError::missing_component(ComponentKind::RequestBodies, "Pet");
        assert_eq!(err.kind(), Some(ComponentKind::RequestBodies));
        assert_eq!(err.name(), Some("Pet"));

        let err = DereferenceError::unsupported_external("other.yaml#/Pet");
        assert_eq!(err.kind(), None);
        assert_eq!(err.name(), None);
    }
}
