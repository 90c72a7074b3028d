//! Schema Object for OpenAPI documents.
//!
//! The Schema Object allows the definition of input and output data types.
//! It is the OpenAPI 3.0 subset of JSON Schema; every nested schema slot may
//! hold a reference to `#/components/schemas` instead of an inline schema.

use crate::dereference::{Dereferenceable, Resolver, dereferenced_view};
use crate::{
    DereferenceResult, Extensions, Reference, Referenceable, error::OpenApiResult,
    validation::Validate,
};
use bon::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The Schema Object allows the definition of input and output data types.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
pub struct Schema {
    /// Schema type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    /// Format refinement of the type (`int64`, `date-time`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Title of the schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Description of the schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether `null` is allowed in addition to the declared type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    /// Declares the schema deprecated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// Read-only property
    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    /// Write-only property
    #[serde(rename = "writeOnly", skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,

    /// Default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Example of a valid value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Allowed values (enum)
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    // Numeric validation
    /// Multiple of validation for numbers
    #[serde(rename = "multipleOf", skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    /// Maximum value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// Whether `maximum` is exclusive
    #[serde(rename = "exclusiveMaximum", skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,

    /// Minimum value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// Whether `minimum` is exclusive
    #[serde(rename = "exclusiveMinimum", skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,

    // String validation
    /// Maximum string length
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    /// Minimum string length
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    /// String pattern (regex)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    // Array validation
    /// Array items schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Referenceable<Schema>>>,

    /// Maximum array length
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    /// Minimum array length
    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    /// Unique items constraint
    #[serde(rename = "uniqueItems", skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    // Object validation
    /// Maximum number of properties
    #[serde(rename = "maxProperties", skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,

    /// Minimum number of properties
    #[serde(rename = "minProperties", skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,

    /// Required properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub required: Vec<String>,

    /// Object properties
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    #[builder(default)]
    pub properties: IndexMap<String, Referenceable<Schema>>,

    /// Additional properties schema
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    // Schema composition
    /// All of (must match all schemas)
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub all_of: Vec<Referenceable<Schema>>,

    /// Any of (must match at least one schema)
    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub any_of: Vec<Referenceable<Schema>>,

    /// One of (must match exactly one schema)
    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub one_of: Vec<Referenceable<Schema>>,

    /// Not schema (must not match this schema)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<Referenceable<Schema>>>,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

/// JSON Schema types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Boolean,
    Object,
    Array,
    Number,
    String,
    Integer,
}

/// `additionalProperties`: either a flag or a schema for the extra values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Referenceable<Schema>>),
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a boolean schema
    pub fn boolean() -> Self {
        Self::new().with_type(SchemaType::Boolean)
    }

    /// Create a string schema
    pub fn string() -> Self {
        Self::new().with_type(SchemaType::String)
    }

    /// Create a number schema
    pub fn number() -> Self {
        Self::new().with_type(SchemaType::Number)
    }

    /// Create an integer schema
    pub fn integer() -> Self {
        Self::new().with_type(SchemaType::Integer)
    }

    /// Create an array schema
    pub fn array() -> Self {
        Self::new().with_type(SchemaType::Array)
    }

    /// Create an object schema
    pub fn object() -> Self {
        Self::new().with_type(SchemaType::Object)
    }

    /// Set the schema type
    pub fn with_type(mut self, schema_type: SchemaType) -> Self {
        self.schema_type = Some(schema_type);
        self
    }

    /// Set the format
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Allow `null`
    pub fn nullable(mut self) -> Self {
        self.nullable = Some(true);
        self
    }

    /// Set enum values
    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// Set array items schema
    pub fn with_items(mut self, items: Schema) -> Self {
        self.items = Some(Box::new(Referenceable::Inline(items)));
        self
    }

    /// Set array items to a schema component
    pub fn with_items_reference(mut self, component: impl Into<String>) -> Self {
        self.items = Some(Box::new(Referenceable::component(component)));
        self
    }

    /// Add a property to object schema
    pub fn with_property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties
            .insert(name.into(), Referenceable::Inline(schema));
        self
    }

    /// Add a property whose schema is a schema component
    pub fn with_property_reference(
        mut self,
        name: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        self.properties
            .insert(name.into(), Referenceable::component(component));
        self
    }

    /// Add a required property
    pub fn require_property(mut self, property: impl Into<String>) -> Self {
        self.required.push(property.into());
        self
    }

    /// Allow or forbid properties beyond the declared ones
    pub fn with_additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(AdditionalProperties::Bool(allowed));
        self
    }

    /// Constrain extra properties to a schema
    pub fn with_additional_properties_schema(
        mut self,
        schema: impl Into<Referenceable<Schema>>,
    ) -> Self {
        self.additional_properties = Some(AdditionalProperties::Schema(Box::new(schema.into())));
        self
    }

    /// Add an `allOf` member
    pub fn with_all_of(mut self, schema: impl Into<Referenceable<Schema>>) -> Self {
        self.all_of.push(schema.into());
        self
    }

    /// Add an `anyOf` member
    pub fn with_any_of(mut self, schema: impl Into<Referenceable<Schema>>) -> Self {
        self.any_of.push(schema.into());
        self
    }

    /// Add a `oneOf` member
    pub fn with_one_of(mut self, schema: impl Into<Referenceable<Schema>>) -> Self {
        self.one_of.push(schema.into());
        self
    }

    /// Set the `not` schema
    pub fn with_not(mut self, schema: impl Into<Referenceable<Schema>>) -> Self {
        self.not = Some(Box::new(schema.into()));
        self
    }

    /// Set minimum value
    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Set maximum value
    pub fn with_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    /// Set minimum length
    pub fn with_min_length(mut self, min_length: u64) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Set maximum length
    pub fn with_max_length(mut self, max_length: u64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Set pattern
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Add an extension field
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.insert(key, value);
        self
    }

    /// Iterate over every directly nested schema slot
    fn nested(&self) -> impl Iterator<Item = &Referenceable<Schema>> {
        let additional = match &self.additional_properties {
            Some(AdditionalProperties::Schema(schema)) => Some(schema.as_ref()),
            _ => None,
        };

        self.properties
            .values()
            .chain(self.items.as_deref())
            .chain(additional)
            .chain(&self.all_of)
            .chain(&self.any_of)
            .chain(&self.one_of)
            .chain(self.not.as_deref())
    }

    /// Names of the schema components this schema refers to directly
    pub fn referenced_components(&self) -> Vec<&str> {
        self.nested()
            .filter_map(Referenceable::as_reference)
            .filter_map(Reference::name)
            .collect()
    }
}

impl Validate for Schema {
    fn validate(&self) -> OpenApiResult<()> {
        if let (Some(min), Some(max)) = (self.minimum, self.maximum) {
            if min > max {
                return Err(crate::error::OpenApiError::validation(
                    "minimum cannot be greater than maximum",
                ));
            }
        }

        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(crate::error::OpenApiError::validation(
                    "minLength cannot be greater than maxLength",
                ));
            }
        }

        if let (Some(min), Some(max)) = (self.min_items, self.max_items) {
            if min > max {
                return Err(crate::error::OpenApiError::validation(
                    "minItems cannot be greater than maxItems",
                ));
            }
        }

        if let Some(multiple_of) = self.multiple_of {
            if multiple_of <= 0.0 {
                return Err(crate::error::OpenApiError::validation(
                    "multipleOf must be greater than 0",
                ));
            }
        }

        if self.properties.keys().any(String::is_empty) {
            return Err(crate::error::OpenApiError::validation(
                "property name cannot be empty",
            ));
        }

        for schema in self.nested() {
            schema.validate()?;
        }

        self.extensions.validate()?;

        Ok(())
    }
}

/// A [`Schema`] with every nested schema resolved.
///
/// Fields other than the nested schema slots are read through `Deref` from
/// the raw schema this was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct DereferencedSchema {
    underlying: Schema,
    pub items: Option<Box<DereferencedSchema>>,
    pub properties: IndexMap<String, DereferencedSchema>,
    pub additional_properties: Option<DereferencedAdditionalProperties>,
    pub all_of: Vec<DereferencedSchema>,
    pub any_of: Vec<DereferencedSchema>,
    pub one_of: Vec<DereferencedSchema>,
    pub not: Option<Box<DereferencedSchema>>,
}

dereferenced_view!(DereferencedSchema => Schema, underlying_schema);

/// Resolved `additionalProperties`.
#[derive(Debug, Clone, PartialEq)]
pub enum DereferencedAdditionalProperties {
    Bool(bool),
    Schema(Box<DereferencedSchema>),
}

impl Dereferenceable for AdditionalProperties {
    type Output = DereferencedAdditionalProperties;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        Ok(match self {
            Self::Bool(allowed) => DereferencedAdditionalProperties::Bool(*allowed),
            Self::Schema(schema) => {
                DereferencedAdditionalProperties::Schema(schema.dereference_in(resolver)?)
            }
        })
    }
}

impl Dereferenceable for Schema {
    type Output = DereferencedSchema;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        Ok(DereferencedSchema {
            items: self.items.dereference_in(resolver)?,
            properties: self.properties.dereference_in(resolver)?,
            additional_properties: self.additional_properties.dereference_in(resolver)?,
            all_of: self.all_of.dereference_in(resolver)?,
            any_of: self.any_of.dereference_in(resolver)?,
            one_of: self.one_of.dereference_in(resolver)?,
            not: self.not.dereference_in(resolver)?,
            underlying: self.clone(),
        })
    }
}
