//! Example Object for OpenAPI documents.

use crate::dereference::{Dereferenceable, Resolver};
use crate::{DereferenceResult, Extensions, error::OpenApiResult, validation::Validate};
use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An example value for a parameter, header or media type.
///
/// Examples hold no referenceable fields, so dereferencing one yields a copy
/// of itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
pub struct Example {
    /// Short description for the example.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// A verbose explanation of the example.
    /// CommonMark syntax MAY be used for rich text representation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Embedded literal example.
    /// The value field and externalValue field are mutually exclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// A URL that points to the literal example.
    /// The value field and externalValue field are mutually exclusive.
    #[serde(rename = "externalValue", skip_serializing_if = "Option::is_none")]
    pub external_value: Option<String>,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Example {
    /// Create a new empty Example
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Example with embedded value
    pub fn with_value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Create a new Example with external value URL
    pub fn with_external_value(external_value: impl Into<String>) -> Self {
        Self {
            external_value: Some(external_value.into()),
            ..Self::default()
        }
    }

    /// Set the summary
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an extension field
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.insert(key, value);
        self
    }
}

impl Validate for Example {
    fn validate(&self) -> OpenApiResult<()> {
        if self.value.is_some() && self.external_value.is_some() {
            return Err(crate::error::OpenApiError::validation(
                "Example cannot have both value and externalValue",
            ));
        }

        if let Some(ref external_value) = self.external_value {
            crate::validation::validate_url(external_value)?;
        }

        self.extensions.validate()?;

        Ok(())
    }
}

impl Dereferenceable for Example {
    type Output = Example;

    fn dereference_in(&self, _resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        Ok(self.clone())
    }
}
