//! Header Object for OpenAPI documents.

use crate::dereference::{Dereferenceable, Resolver, dereferenced_view};
use crate::{
    ContentType, DereferenceResult, DereferencedMediaType, DereferencedSchema, Extensions,
    MediaType, Referenceable, Schema, error::OpenApiResult, validation::Validate,
};
use bon::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Describes a single header of a response or multipart encoding.
///
/// The header's name is the key it is stored under; exactly one of `schema`
/// and `content` describes its value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
pub struct Header {
    /// A brief description of the header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Determines whether this header is mandatory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Specifies that the header is deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// The schema defining the type used for the header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Referenceable<Schema>>,

    /// A map containing the representations for the header.
    /// The map MUST only contain one entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<ContentType, MediaType>>,

    /// Example of the header's potential value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Header {
    /// Create a header described by an inline schema
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Some(Referenceable::Inline(schema)),
            ..Self::default()
        }
    }

    /// Create a header described by a schema component
    pub fn with_schema_reference(component: impl Into<String>) -> Self {
        Self {
            schema: Some(Referenceable::component(component)),
            ..Self::default()
        }
    }

    /// Create a header described by a single content entry
    pub fn with_content(content_type: impl Into<ContentType>, media_type: MediaType) -> Self {
        Self {
            content: Some(IndexMap::from([(content_type.into(), media_type)])),
            ..Self::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark this header as required
    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    /// Mark this header as deprecated
    pub fn deprecated(mut self) -> Self {
        self.deprecated = Some(true);
        self
    }

    /// Check if this header is required (defaults to false)
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

impl Validate for Header {
    fn validate(&self) -> OpenApiResult<()> {
        match (&self.schema, &self.content) {
            (Some(_), Some(_)) => {
                return Err(crate::error::OpenApiError::validation(
                    "Header cannot have both schema and content",
                ));
            }
            (None, None) => return Err(crate::error::OpenApiError::missing_field("schema")),
            (Some(schema), None) => schema.validate()?,
            (None, Some(content)) => {
                if content.len() != 1 {
                    return Err(crate::error::OpenApiError::invalid_field(
                        "content",
                        "must contain exactly one entry",
                    ));
                }
                for media_type in content.values() {
                    media_type.validate()?;
                }
            }
        }

        self.extensions.validate()
    }
}

/// A [`Header`] with its schema or content resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DereferencedHeader {
    underlying: Header,
    pub schema: Option<DereferencedSchema>,
    pub content: Option<IndexMap<ContentType, DereferencedMediaType>>,
}

dereferenced_view!(DereferencedHeader => Header, underlying_header);

impl Dereferenceable for Header {
    type Output = DereferencedHeader;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        Ok(DereferencedHeader {
            schema: self.schema.dereference_in(resolver)?,
            content: self.content.dereference_in(resolver)?,
            underlying: self.clone(),
        })
    }
}
