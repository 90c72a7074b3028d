//! Media Type and Encoding Objects for OpenAPI documents.
//!
//! Content maps (`content` on responses, request bodies, parameters and
//! headers) are keyed by [`ContentType`] and hold a [`MediaType`] each.

use crate::dereference::{Dereferenceable, Resolver, dereferenced_view};
use crate::{
    DereferenceResult, DereferencedHeader, DereferencedSchema, Example, Extensions, Header,
    Referenceable, Schema, error::OpenApiResult, validation::Validate,
};
use bon::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A media type name used as the key of a content map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentType(String);

impl ContentType {
    /// Create a content type from its name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// `application/json`
    pub fn json() -> Self {
        Self::new("application/json")
    }

    /// `application/xml`
    pub fn xml() -> Self {
        Self::new("application/xml")
    }

    /// `text/plain`
    pub fn text() -> Self {
        Self::new("text/plain")
    }

    /// `application/x-www-form-urlencoded`
    pub fn form() -> Self {
        Self::new("application/x-www-form-urlencoded")
    }

    /// `multipart/form-data`
    pub fn multipart_form() -> Self {
        Self::new("multipart/form-data")
    }

    /// `application/octet-stream`
    pub fn binary() -> Self {
        Self::new("application/octet-stream")
    }

    /// The media type name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Each Media Type Object provides schema and examples for the media type
/// identified by its key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
pub struct MediaType {
    /// The schema defining the content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Referenceable<Schema>>,

    /// Example of the media type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Examples of the media type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<IndexMap<String, Referenceable<Example>>>,

    /// A map between a property name and its encoding information.
    /// Only applies to `multipart` and `application/x-www-form-urlencoded` bodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<IndexMap<String, Encoding>>,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl MediaType {
    /// Create a media type with an inline schema
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Some(Referenceable::Inline(schema)),
            ..Self::default()
        }
    }

    /// Create a media type whose schema is a schema component
    pub fn with_schema_reference(component: impl Into<String>) -> Self {
        Self {
            schema: Some(Referenceable::component(component)),
            ..Self::default()
        }
    }

    /// Set the example
    pub fn with_example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Add a named example
    pub fn with_named_example(
        mut self,
        name: impl Into<String>,
        example: impl Into<Referenceable<Example>>,
    ) -> Self {
        self.examples
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), example.into());
        self
    }

    /// Add encoding information for a property
    pub fn with_encoding(mut self, property: impl Into<String>, encoding: Encoding) -> Self {
        self.encoding
            .get_or_insert_with(IndexMap::new)
            .insert(property.into(), encoding);
        self
    }
}

impl Validate for MediaType {
    fn validate(&self) -> OpenApiResult<()> {
        if self.example.is_some() && self.examples.is_some() {
            return Err(crate::error::OpenApiError::validation(
                "Media type cannot have both example and examples",
            ));
        }

        if let Some(ref schema) = self.schema {
            schema.validate()?;
        }

        for example in self.examples.iter().flat_map(IndexMap::values) {
            example.validate()?;
        }

        for encoding in self.encoding.iter().flat_map(IndexMap::values) {
            encoding.validate()?;
        }

        self.extensions.validate()
    }
}

/// A single encoding definition applied to a single schema property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
pub struct Encoding {
    /// The Content-Type for encoding a specific property.
    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Additional headers for multipart bodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, Referenceable<Header>>>,

    /// How a specific property value is serialized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Whether arrays and objects generate separate parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    /// Whether reserved characters are sent without percent-encoding.
    #[serde(rename = "allowReserved", skip_serializing_if = "Option::is_none")]
    pub allow_reserved: Option<bool>,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Encoding {
    /// Create an empty encoding
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
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
}

impl Validate for Encoding {
    fn validate(&self) -> OpenApiResult<()> {
        for header in self.headers.iter().flat_map(IndexMap::values) {
            header.validate()?;
        }
        self.extensions.validate()
    }
}

/// A [`MediaType`] with its schema, examples and encoding headers resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DereferencedMediaType {
    underlying: MediaType,
    pub schema: Option<DereferencedSchema>,
    pub examples: Option<IndexMap<String, Example>>,
    pub encoding: Option<IndexMap<String, DereferencedEncoding>>,
}

dereferenced_view!(DereferencedMediaType => MediaType, underlying_content);

impl Dereferenceable for MediaType {
    type Output = DereferencedMediaType;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        Ok(DereferencedMediaType {
            schema: self.schema.dereference_in(resolver)?,
            examples: self.examples.dereference_in(resolver)?,
            encoding: self.encoding.dereference_in(resolver)?,
            underlying: self.clone(),
        })
    }
}

/// An [`Encoding`] with its headers resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DereferencedEncoding {
    underlying: Encoding,
    pub headers: Option<IndexMap<String, DereferencedHeader>>,
}

dereferenced_view!(DereferencedEncoding => Encoding, underlying_encoding);

impl Dereferenceable for Encoding {
    type Output = DereferencedEncoding;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        Ok(DereferencedEncoding {
            headers: self.headers.dereference_in(resolver)?,
            underlying: self.clone(),
        })
    }
}
