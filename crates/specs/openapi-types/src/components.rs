//! Components Object for OpenAPI documents.
//!
//! The components table is the only thing internal references resolve against.
//! It is plain data: build it once, then share it by reference with any number
//! of dereferencing calls.

use crate::{
    DereferenceError, DereferenceResult, Example, Extensions, Header, Parameter, Reference,
    ReferenceTarget, RequestBody, Response, Schema, error::OpenApiResult, validation::Validate,
};
use bon::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of reusable objects a [`Components`] table can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentKind {
    Schemas,
    Responses,
    Parameters,
    Examples,
    RequestBodies,
    Headers,
}

impl ComponentKind {
    /// All kinds, in the order they appear in a serialized components object
    pub const ALL: [ComponentKind; 6] = [
        Self::Schemas,
        Self::Responses,
        Self::Parameters,
        Self::Examples,
        Self::RequestBodies,
        Self::Headers,
    ];

    /// The key of this kind under `#/components/`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schemas => "schemas",
            Self::Responses => "responses",
            Self::Parameters => "parameters",
            Self::Examples => "examples",
            Self::RequestBodies => "requestBodies",
            Self::Headers => "headers",
        }
    }

    /// Parse the key used under `#/components/`
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == key)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type that can be stored in, and looked up from, a [`Components`] table.
///
/// The kind is an associated constant so a `Reference<Header>` can only ever
/// name an entry of `components/headers`.
pub trait Component: Sized {
    /// The map of [`Components`] this type lives in
    const KIND: ComponentKind;

    /// The map of this kind within `components`
    fn table(components: &Components) -> &IndexMap<String, Self>;
}

macro_rules! impl_component {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;

            fn table(components: &Components) -> &IndexMap<String, Self> {
                &components.$field
            }
        }
    };
}

impl_component!(Schema, Schemas, schemas);
impl_component!(Response, Responses, responses);
impl_component!(Parameter, Parameters, parameters);
impl_component!(Example, Examples, examples);
impl_component!(RequestBody, RequestBodies, request_bodies);
impl_component!(Header, Headers, headers);

/// Holds a set of reusable objects for different aspects of the document.
/// Objects defined here have no effect on the API unless they are explicitly
/// referenced from outside the components object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
pub struct Components {
    /// An object to hold reusable Schema Objects.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    #[builder(default)]
    pub schemas: IndexMap<String, Schema>,

    /// An object to hold reusable Response Objects.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    #[builder(default)]
    pub responses: IndexMap<String, Response>,

    /// An object to hold reusable Parameter Objects.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    #[builder(default)]
    pub parameters: IndexMap<String, Parameter>,

    /// An object to hold reusable Example Objects.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    #[builder(default)]
    pub examples: IndexMap<String, Example>,

    /// An object to hold reusable Request Body Objects.
    #[serde(
        rename = "requestBodies",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    #[builder(default)]
    pub request_bodies: IndexMap<String, RequestBody>,

    /// An object to hold reusable Header Objects.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    #[builder(default)]
    pub headers: IndexMap<String, Header>,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Components {
    /// Create a new empty Components object
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with no entries of any kind. Every lookup against it misses.
    pub fn no_components() -> Self {
        Self::default()
    }

    /// Add a schema
    pub fn with_schema(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.schemas.insert(name.into(), schema);
        self
    }

    /// Add a response
    pub fn with_response(mut self, name: impl Into<String>, response: Response) -> Self {
        self.responses.insert(name.into(), response);
        self
    }

    /// Add a parameter
    pub fn with_parameter(mut self, name: impl Into<String>, parameter: Parameter) -> Self {
        self.parameters.insert(name.into(), parameter);
        self
    }

    /// Add an example
    pub fn with_example(mut self, name: impl Into<String>, example: Example) -> Self {
        self.examples.insert(name.into(), example);
        self
    }

    /// Add a request body
    pub fn with_request_body(mut self, name: impl Into<String>, request_body: RequestBody) -> Self {
        self.request_bodies.insert(name.into(), request_body);
        self
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, header: Header) -> Self {
        self.headers.insert(name.into(), header);
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

    /// Check if components is empty
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
            && self.responses.is_empty()
            && self.parameters.is_empty()
            && self.examples.is_empty()
            && self.request_bodies.is_empty()
            && self.headers.is_empty()
            && self.extensions.is_empty()
    }

    /// Look up a component by name within the kind of `T`
    pub fn lookup<T: Component>(&self, name: &str) -> Option<&T> {
        T::table(self).get(name)
    }

    /// Check whether an entry exists under `(kind, name)`
    pub fn contains(&self, kind: ComponentKind, name: &str) -> bool {
        match kind {
            ComponentKind::Schemas => self.schemas.contains_key(name),
            ComponentKind::Responses => self.responses.contains_key(name),
            ComponentKind::Parameters => self.parameters.contains_key(name),
            ComponentKind::Examples => self.examples.contains_key(name),
            ComponentKind::RequestBodies => self.request_bodies.contains_key(name),
            ComponentKind::Headers => self.headers.contains_key(name),
        }
    }

    /// Resolve a single reference to the value it names.
    ///
    /// The returned value is the raw component; any references nested inside
    /// it are left untouched. See [`crate::dereference`] for full resolution.
    pub fn resolve<'a, T: Component>(
        &'a self,
        reference: &Reference<T>,
    ) -> DereferenceResult<&'a T> {
        match reference.target() {
            ReferenceTarget::Internal { name } => self
                .lookup::<T>(name)
                .ok_or_else(|| DereferenceError::missing_component(T::KIND, name.as_str())),
            ReferenceTarget::External { location } => {
                Err(DereferenceError::unsupported_external(location.as_str()))
            }
        }
    }

    /// Get a schema by name
    pub fn get_schema(&self, name: &str) -> Option<&Schema> {
        self.lookup(name)
    }

    /// Get a header by name
    pub fn get_header(&self, name: &str) -> Option<&Header> {
        self.lookup(name)
    }

    /// Get a response by name
    pub fn get_response(&self, name: &str) -> Option<&Response> {
        self.lookup(name)
    }
}

fn validate_table<T: Validate>(
    kind: ComponentKind,
    table: &IndexMap<String, T>,
) -> OpenApiResult<()> {
    for (key, value) in table {
        crate::validation::validate_component_key(key)?;
        value.validate().map_err(|e| {
            crate::error::OpenApiError::validation_with_path(
                e.to_string(),
                format!("{}.{}", kind, key),
            )
        })?;
    }
    Ok(())
}

impl Validate for Components {
    fn validate(&self) -> OpenApiResult<()> {
        validate_table(ComponentKind::Schemas, &self.schemas)?;
        validate_table(ComponentKind::Responses, &self.responses)?;
        validate_table(ComponentKind::Parameters, &self.parameters)?;
        validate_table(ComponentKind::Examples, &self.examples)?;
        validate_table(ComponentKind::RequestBodies, &self.request_bodies)?;
        validate_table(ComponentKind::Headers, &self.headers)?;

        self.extensions.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_components_creation() {
        let components = Components::new()
            .with_schema("User", Schema::object().with_property("name", Schema::string()))
            .with_header("RateLimit", Header::new(Schema::integer()))
            .with_example("UserExample", Example::with_value(json!({"name": "John"})));

        assert_eq!(components.schemas.len(), 1);
        assert_eq!(components.headers.len(), 1);
        assert_eq!(components.examples.len(), 1);
        assert!(!components.is_empty());
    }

    #[test]
    fn test_no_components_misses_every_kind() {
        let components = Components::no_components();
        assert!(components.is_empty());

        for kind in ComponentKind::ALL {
            assert!(!components.contains(kind, "test"));
        }
        assert!(components.lookup::<Header>("test").is_none());
        assert!(components.lookup::<Schema>("test").is_none());
    }

    #[test]
    fn test_lookup_is_per_kind() {
        let components = Components::new().with_header("test", Header::new(Schema::string()));

        assert!(components.contains(ComponentKind::Headers, "test"));
        assert!(!components.contains(ComponentKind::Schemas, "test"));
        assert_eq!(
            components.lookup::<Header>("test"),
            Some(&Header::new(Schema::string()))
        );
        assert!(components.lookup::<Schema>("test").is_none());
    }

    #[test]
    fn test_resolve_single_reference() {
        let components = Components::new().with_schema("Name", Schema::string());

        let found = components.resolve(&Reference::<Schema>::component("Name"));
        assert_eq!(found, Ok(&Schema::string()));

        let missing = components.resolve(&Reference::<Schema>::component("Other"));
        assert_eq!(
            missing,
            Err(DereferenceError::missing_component(ComponentKind::Schemas, "Other"))
        );

        let external = components.resolve(&Reference::<Schema>::external("pet.yaml#/Pet"));
        assert_eq!(
            external,
            Err(DereferenceError::unsupported_external("pet.yaml#/Pet"))
        );
    }

    #[test]
    fn test_component_kind_keys() {
        assert_eq!(ComponentKind::RequestBodies.as_str(), "requestBodies");
        assert_eq!(ComponentKind::from_key("headers"), Some(ComponentKind::Headers));
        assert_eq!(ComponentKind::from_key("widgets"), None);

        for kind in ComponentKind::ALL {
            assert_eq!(ComponentKind::from_key(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_components_validation() {
        let components = Components::new().with_schema("ValidSchema", Schema::string());
        assert!(components.validate().is_ok());

        let components = Components::new().with_schema("invalid key", Schema::string());
        assert!(components.validate().is_err());
    }

    #[test]
    fn test_components_builder() {
        let components = Components::builder()
            .headers(IndexMap::from([(
                "X-Trace".to_string(),
                Header::new(Schema::string()),
            )]))
            .build();

        assert_eq!(components.headers.len(), 1);
        assert!(components.schemas.is_empty());
    }

    #[test]
    fn test_components_serialization() {
        let components = Components::new()
            .with_schema("UserName", Schema::string().with_title("User Name"))
            .with_request_body("Pet", RequestBody::new().with_description("A pet"));

        let json_value = serde_json::to_value(&components).unwrap();

        assert_eq!(json_value["schemas"]["UserName"]["type"], "string");
        assert_eq!(json_value["schemas"]["UserName"]["title"], "User Name");
        assert_eq!(json_value["requestBodies"]["Pet"]["description"], "A pet");
        assert!(json_value.get("headers").is_none());

        let deserialized: Components = serde_json::from_value(json_value).unwrap();
        assert_eq!(deserialized, components);
    }
}
