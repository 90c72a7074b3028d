//! Root OpenAPI Object and its Info Object.

use crate::dereference::{Dereferenceable, Resolver, dereferenced_view};
use crate::{
    Components, DereferenceResult, DereferencedPathItem, Extensions, PathItem,
    error::{OpenApiError, OpenApiResult},
    validation::{Validate, validate_openapi_version},
    version,
};
use bon::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The root object of an OpenAPI document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct Document {
    /// The semantic version of the OpenAPI Specification the document uses.
    #[builder(default = version::CURRENT.to_string())]
    pub openapi: String,

    /// Metadata about the API.
    pub info: Info,

    /// The available paths and operations for the API.
    #[serde(default)]
    #[builder(default)]
    pub paths: IndexMap<String, PathItem>,

    /// Reusable components referenced from elsewhere in the document.
    #[serde(default, skip_serializing_if = "Components::is_empty")]
    #[builder(default)]
    pub components: Components,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Document {
    /// Create a document with no paths or components
    pub fn new(info: Info) -> Self {
        Self {
            openapi: version::CURRENT.to_string(),
            info,
            paths: IndexMap::new(),
            components: Components::new(),
            extensions: Extensions::new(),
        }
    }

    /// Add a path item
    pub fn with_path(mut self, path: impl Into<String>, item: PathItem) -> Self {
        self.paths.insert(path.into(), item);
        self
    }

    /// Replace the components table
    pub fn with_components(mut self, components: Components) -> Self {
        self.components = components;
        self
    }

    /// Parse a document from a JSON string
    pub fn from_json(json: &str) -> OpenApiResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize this document as pretty-printed JSON
    pub fn to_json_pretty(&self) -> OpenApiResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolve every path against this document's own components table.
    pub fn locally_dereferenced(&self) -> DereferenceResult<DereferencedDocument> {
        debug!(
            paths = self.paths.len(),
            title = %self.info.title,
            "dereferencing document"
        );
        self.dereferenced(&self.components)
    }
}

impl Validate for Document {
    fn validate(&self) -> OpenApiResult<()> {
        validate_openapi_version(&self.openapi)?;
        self.info.validate()?;

        for (path, item) in &self.paths {
            if !path.starts_with('/') {
                return Err(OpenApiError::validation_with_path(
                    "Path must start with '/'",
                    format!("paths.{}", path),
                ));
            }
            item.validate().map_err(|e| {
                OpenApiError::validation_with_path(e.to_string(), format!("paths.{}", path))
            })?;
        }

        self.components.validate()?;
        self.extensions.validate()
    }
}

/// General information about the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct Info {
    /// The title of the API.
    pub title: String,

    /// A description of the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The version of the API document, not of the OpenAPI Specification.
    pub version: String,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Info {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            version: version.into(),
            extensions: Extensions::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Validate for Info {
    fn validate(&self) -> OpenApiResult<()> {
        if self.title.is_empty() {
            return Err(OpenApiError::missing_field("info.title"));
        }
        if self.version.is_empty() {
            return Err(OpenApiError::missing_field("info.version"));
        }
        self.extensions.validate()
    }
}

/// A [`Document`] whose paths have been resolved against its components.
#[derive(Debug, Clone, PartialEq)]
pub struct DereferencedDocument {
    underlying: Document,
    pub paths: IndexMap<String, DereferencedPathItem>,
}

dereferenced_view!(DereferencedDocument => Document, underlying_document);

impl Dereferenceable for Document {
    type Output = DereferencedDocument;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        Ok(DereferencedDocument {
            paths: self.paths.dereference_in(resolver)?,
            underlying: self.clone(),
        })
    }
}
