//! Request Body Object for OpenAPI documents.

use crate::dereference::{Dereferenceable, Resolver, dereferenced_view};
use crate::{
    ContentType, DereferenceResult, DereferencedMediaType, Extensions, MediaType,
    error::OpenApiResult, validation::Validate,
};
use bon::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Describes a single request body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
pub struct RequestBody {
    /// A brief description of the request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The content of the request body, keyed by media type.
    #[serde(default)]
    #[builder(default)]
    pub content: IndexMap<ContentType, MediaType>,

    /// Determines if the request body is required in the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl RequestBody {
    /// Create an empty request body
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
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

    /// Mark this request body as required
    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    /// Check if this request body is required (defaults to false)
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

impl Validate for RequestBody {
    fn validate(&self) -> OpenApiResult<()> {
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

/// A [`RequestBody`] with every content entry resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DereferencedRequestBody {
    underlying: RequestBody,
    pub content: IndexMap<ContentType, DereferencedMediaType>,
}

dereferenced_view!(DereferencedRequestBody => RequestBody, underlying_request_body);

impl Dereferenceable for RequestBody {
    type Output = DereferencedRequestBody;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        Ok(DereferencedRequestBody {
            content: self.content.dereference_in(resolver)?,
            underlying: self.clone(),
        })
    }
}
