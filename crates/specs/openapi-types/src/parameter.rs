//! Parameter Object for OpenAPI documents.

use crate::dereference::{Dereferenceable, Resolver, dereferenced_view};
use crate::{
    ContentType, DereferenceResult, DereferencedMediaType, DereferencedSchema, Example,
    Extensions, MediaType, Referenceable, Schema, error::OpenApiResult, validation::Validate,
};
use bon::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Describes a single operation parameter.
///
/// A unique parameter is defined by the combination of a name and location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct Parameter {
    /// The name of the parameter. Parameter names are case sensitive.
    pub name: String,

    /// The location of the parameter.
    #[serde(rename = "in")]
    pub location: ParameterLocation,

    /// A brief description of the parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Determines whether this parameter is mandatory.
    /// MUST be true for path parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Specifies that a parameter is deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// Sets the ability to pass empty-valued query parameters.
    #[serde(rename = "allowEmptyValue", skip_serializing_if = "Option::is_none")]
    pub allow_empty_value: Option<bool>,

    /// The schema defining the type used for the parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Referenceable<Schema>>,

    /// A map containing the representations for the parameter.
    /// The map MUST only contain one entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<ContentType, MediaType>>,

    /// Example of the parameter's potential value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Examples of the parameter's potential value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<IndexMap<String, Referenceable<Example>>>,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Query => "query",
            Self::Header => "header",
            Self::Path => "path",
            Self::Cookie => "cookie",
        })
    }
}

impl Parameter {
    /// Create a new Parameter described by an inline schema
    pub fn new(name: impl Into<String>, location: ParameterLocation, schema: Schema) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            required: (location == ParameterLocation::Path).then_some(true),
            deprecated: None,
            allow_empty_value: None,
            schema: Some(Referenceable::Inline(schema)),
            content: None,
            example: None,
            examples: None,
            extensions: Extensions::new(),
        }
    }

    /// Create a query parameter
    pub fn query(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, ParameterLocation::Query, schema)
    }

    /// Create a path parameter (always required)
    pub fn path(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, ParameterLocation::Path, schema)
    }

    /// Create a header parameter
    pub fn header(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, ParameterLocation::Header, schema)
    }

    /// Replace the schema with a reference to a schema component
    pub fn with_schema_reference(mut self, component: impl Into<String>) -> Self {
        self.schema = Some(Referenceable::component(component));
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark this parameter as required
    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    /// Mark this parameter as deprecated
    pub fn deprecated(mut self) -> Self {
        self.deprecated = Some(true);
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

    /// Check if this parameter is required (defaults to false)
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

impl Validate for Parameter {
    fn validate(&self) -> OpenApiResult<()> {
        if self.name.is_empty() {
            return Err(crate::error::OpenApiError::missing_field("name"));
        }

        if self.location == ParameterLocation::Path && !self.is_required() {
            return Err(crate::error::OpenApiError::invalid_field(
                "required",
                format!("path parameter '{}' must be required", self.name),
            ));
        }

        match (&self.schema, &self.content) {
            (Some(_), Some(_)) => {
                return Err(crate::error::OpenApiError::validation_with_path(
                    "Parameter cannot have both schema and content",
                    self.name.clone(),
                ));
            }
            (Some(schema), None) => schema.validate()?,
            (None, Some(content)) => {
                for media_type in content.values() {
                    media_type.validate()?;
                }
            }
            (None, None) => {}
        }

        for example in self.examples.iter().flat_map(IndexMap::values) {
            example.validate()?;
        }

        self.extensions.validate()
    }
}

/// A [`Parameter`] with its schema, content and examples resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DereferencedParameter {
    underlying: Parameter,
    pub schema: Option<DereferencedSchema>,
    pub content: Option<IndexMap<ContentType, DereferencedMediaType>>,
    pub examples: Option<IndexMap<String, Example>>,
}

dereferenced_view!(DereferencedParameter => Parameter, underlying_parameter);

impl Dereferenceable for Parameter {
    type Output = DereferencedParameter;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        Ok(DereferencedParameter {
            schema: self.schema.dereference_in(resolver)?,
            content: self.content.dereference_in(resolver)?,
            examples: self.examples.dereference_in(resolver)?,
            underlying: self.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentKind, Components, DereferenceError, SchemaType};
    use serde_json::json;

    #[test]
    fn test_parameter_creation() {
        let param = Parameter::query("limit", Schema::integer()).with_description("Page size");
        assert_eq!(param.location, ParameterLocation::Query);
        assert!(!param.is_required());

        let param = Parameter::path("petId", Schema::string());
        assert!(param.is_required());
        assert!(param.validate().is_ok());
    }

    #[test]
    fn test_parameter_serialization() {
        let param = Parameter::path("petId", Schema::string()).with_schema_reference("PetId");

        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(
            json,
            json!({
                "name": "petId",
                "in": "path",
                "required": true,
                "schema": {"$ref": "#/components/schemas/PetId"}
            })
        );

        let deserialized: Parameter = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, param);
    }

    #[test]
    fn test_parameter_validation() {
        let mut param = Parameter::path("petId", Schema::string());
        param.required = Some(false);
        assert!(param.validate().is_err());

        let mut param = Parameter::query("q", Schema::string());
        param.content = Some(IndexMap::from([(
            ContentType::json(),
            MediaType::new(Schema::object()),
        )]));
        assert!(param.validate().is_err());
    }

    #[test]
    fn test_dereference_parameter() {
        let components = Components::new()
            .with_schema("PetId", Schema::integer())
            .with_example("First", Example::with_value(1));

        let param = Parameter::path("petId", Schema::string())
            .with_schema_reference("PetId")
            .with_named_example("first", Referenceable::<Example>::component("First"));

        let resolved = param.dereferenced(&components).unwrap();

        assert_eq!(resolved.name, "petId");
        assert_eq!(resolved.location, ParameterLocation::Path);
        assert_eq!(
            resolved.schema.as_ref().and_then(|schema| schema.schema_type),
            Some(SchemaType::Integer)
        );
        assert_eq!(
            resolved.examples.as_ref().map(|examples| &examples["first"]),
            Some(&Example::with_value(1))
        );

        let err = param.dereferenced(&Components::no_components()).unwrap_err();
        assert_eq!(err, DereferenceError::missing_component(ComponentKind::Schemas, "PetId"));
    }
}
