//! Response Object for OpenAPI documents.

use crate::dereference::{Dereferenceable, Resolver, dereferenced_view};
use crate::{
    ContentType, DereferenceResult, DereferencedHeader, DereferencedMediaType, Extensions,
    Header, MediaType, Referenceable, error::OpenApiResult, validation::Validate,
};
use bon::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Describes a single response from an API operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct Response {
    /// A short description of the response.
    /// CommonMark syntax MAY be used for rich text representation.
    pub description: String,

    /// Maps a header name to its definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, Referenceable<Header>>>,

    /// Potential response payloads, keyed by media type.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    #[builder(default)]
    pub content: IndexMap<ContentType, MediaType>,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Response {
    /// Create a new Response with no headers or content
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            headers: None,
            content: IndexMap::new(),
            extensions: Extensions::new(),
        }
    }

    /// Add a header
    pub fn with_header(
        mut self,
        name: impl Into<String>,
        header: impl Into<Referenceable<Header>>,
    ) -> Self {
        self.headers
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), header.into());
        self
    }

    /// Add a header that refers to a header component
    pub fn with_header_reference(
        self,
        name: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        self.with_header(name, Referenceable::<Header>::component(component))
    }

    /// Add a content entry
    pub fn with_content(
        mut self,
        content_type: impl Into<ContentType>,
        media_type: MediaType,
    ) -> Self {
        self.content.insert(content_type.into(), media_type);
        self
    }

    /// Add an extension field
    pub fn with_extension(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.extensions.insert(key, value);
        self
    }
}

impl Validate for Response {
    fn validate(&self) -> OpenApiResult<()> {
        for (name, header) in self.headers.iter().flatten() {
            if name.is_empty() {
                return Err(crate::error::OpenApiError::validation(
                    "Header name cannot be empty",
                ));
            }
            header.validate().map_err(|e| {
                crate::error::OpenApiError::validation_with_path(
                    e.to_string(),
                    format!("headers.{}", name),
                )
            })?;
        }

        for (content_type, media_type) in &self.content {
            media_type.validate().map_err(|e| {
                crate::error::OpenApiError::validation_with_path(
                    e.to_string(),
                    format!("content.{}", content_type),
                )
            })?;
        }

        self.extensions.validate()
    }
}

/// A [`Response`] with its headers and content resolved.
///
/// Everything else, such as `description`, is read through `Deref` from the
/// raw response.
#[derive(Debug, Clone, PartialEq)]
pub struct DereferencedResponse {
    underlying: Response,
    pub headers: Option<IndexMap<String, DereferencedHeader>>,
    pub content: IndexMap<ContentType, DereferencedMediaType>,
}

dereferenced_view!(DereferencedResponse => Response, underlying_response);

impl Dereferenceable for Response {
    type Output = DereferencedResponse;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        Ok(DereferencedResponse {
            headers: self.headers.dereference_in(resolver)?,
            content: self.content.dereference_in(resolver)?,
            underlying: self.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Schema;
    use serde_json::json;

    #[test]
    fn test_response_serialization() {
        let response = Response::new("OK")
            .with_header_reference("X-Rate-Limit", "RateLimit")
            .with_content(ContentType::json(), MediaType::new(Schema::string()));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            json!({
                "description": "OK",
                "headers": {
                    "X-Rate-Limit": {"$ref": "#/components/headers/RateLimit"}
                },
                "content": {
                    "application/json": {"schema": {"type": "string"}}
                }
            })
        );

        let deserialized: Response = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, response);
    }

    #[test]
    fn test_response_requires_description() {
        let result: Result<Response, _> = serde_json::from_value(json!({"content": {}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_response_validation() {
        let response = Response::new("OK").with_header("X-Id", Header::new(Schema::string()));
        assert!(response.validate().is_ok());

        let response = Response::new("OK").with_header("X-Id", Header::default());
        assert!(response.validate().is_err());
    }

    #[test]
    fn test_dereferenced_response_into_underlying() {
        let response = Response::new("test").with_extension("x-cache", "none");
        let resolved = response
            .dereferenced(&crate::Components::no_components())
            .unwrap();

        assert_eq!(resolved.extensions.get("x-cache"), Some(&json!("none")));
        assert_eq!(resolved.into_underlying(), response);
    }
}
