//! Reference Object for OpenAPI documents.
//!
//! A reference points either at an entry of the document's components table
//! or at a location outside the document. The component kind is carried in
//! the type: a `Reference<Header>` always names an entry of
//! `#/components/headers`, so a header slot cannot hold a schema reference.

use crate::{Component, error::OpenApiError, error::OpenApiResult, validation::Validate};
use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

const COMPONENTS_PREFIX: &str = "#/components/";

/// Where a reference points.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceTarget {
    /// An entry of the components table, by name
    Internal { name: String },
    /// Anything outside the document (a URL or relative file reference)
    External { location: String },
}

/// A reference to a component of kind `T`, serialized as `{"$ref": "..."}`.
pub struct Reference<T> {
    target: ReferenceTarget,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Reference<T> {
    /// Create a reference to the component `name` of this kind
    pub fn component(name: impl Into<String>) -> Self {
        Self::from_target(ReferenceTarget::Internal { name: name.into() })
    }

    /// Create a reference to a location outside the document
    pub fn external(location: impl Into<String>) -> Self {
        Self::from_target(ReferenceTarget::External {
            location: location.into(),
        })
    }

    fn from_target(target: ReferenceTarget) -> Self {
        Self {
            target,
            _kind: PhantomData,
        }
    }

    /// Where this reference points
    pub fn target(&self) -> &ReferenceTarget {
        &self.target
    }

    /// Check if this reference names an entry of the components table
    pub fn is_internal(&self) -> bool {
        matches!(self.target, ReferenceTarget::Internal { .. })
    }

    /// Check if this is an external reference
    pub fn is_external(&self) -> bool {
        !self.is_internal()
    }

    /// The component name for internal references
    pub fn name(&self) -> Option<&str> {
        match &self.target {
            ReferenceTarget::Internal { name } => Some(name),
            ReferenceTarget::External { .. } => None,
        }
    }
}

impl<T: Component> Reference<T> {
    /// Parse a `$ref` string for a slot of kind `T`.
    ///
    /// Internal references must have the form `#/components/<kind>/<name>`
    /// where `<kind>` matches `T`. Anything not starting with `#` is treated
    /// as an external location.
    pub fn parse(reference: &str) -> OpenApiResult<Self> {
        if reference.is_empty() {
            return Err(OpenApiError::reference("reference cannot be empty", reference));
        }

        if !reference.starts_with('#') {
            return Ok(Self::external(reference));
        }

        let path = reference.strip_prefix(COMPONENTS_PREFIX).ok_or_else(|| {
            OpenApiError::reference(
                "internal references must point into #/components",
                reference,
            )
        })?;

        let (kind_key, name) = path.split_once('/').ok_or_else(|| {
            OpenApiError::reference("expected #/components/<kind>/<name>", reference)
        })?;

        match crate::ComponentKind::from_key(kind_key) {
            Some(kind) if kind == T::KIND => {}
            Some(kind) => {
                return Err(OpenApiError::reference(
                    format!("expected a reference to {}, found {}", T::KIND, kind),
                    reference,
                ));
            }
            None => {
                return Err(OpenApiError::reference(
                    format!("unknown component kind '{}'", kind_key),
                    reference,
                ));
            }
        }

        if name.is_empty() || name.contains('/') {
            return Err(OpenApiError::reference(
                "component name must be a single non-empty segment",
                reference,
            ));
        }

        Ok(Self::component(unescape_pointer_segment(name)))
    }

    /// The component kind this reference can point at
    pub fn kind(&self) -> crate::ComponentKind {
        T::KIND
    }

    /// The `$ref` string of this reference
    pub fn to_ref_string(&self) -> String {
        match &self.target {
            ReferenceTarget::Internal { name } => format!(
                "{}{}/{}",
                COMPONENTS_PREFIX,
                T::KIND,
                escape_pointer_segment(name)
            ),
            ReferenceTarget::External { location } => location.clone(),
        }
    }
}

// JSON pointer escaping (RFC 6901): `~` -> `~0`, `/` -> `~1`
fn escape_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn unescape_pointer_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

impl<T> Clone for Reference<T> {
    fn clone(&self) -> Self {
        Self::from_target(self.target.clone())
    }
}

impl<T> PartialEq for Reference<T> {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl<T> Eq for Reference<T> {}

impl<T> Hash for Reference<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target.hash(state);
    }
}

impl<T> fmt::Debug for Reference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("target", &self.target)
            .finish()
    }
}

impl<T: Component> Serialize for Reference<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("$ref", &self.to_ref_string())?;
        map.end()
    }
}

/// Siblings of `$ref` are ignored, as OpenAPI 3.0 prescribes.
#[derive(Deserialize)]
struct RawReference {
    #[serde(rename = "$ref")]
    reference: String,
}

impl<'de, T: Component> Deserialize<'de> for Reference<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawReference::deserialize(deserializer)?;
        Self::parse(&raw.reference).map_err(D::Error::custom)
    }
}

impl<T: Component> Validate for Reference<T> {
    fn validate(&self) -> OpenApiResult<()> {
        match &self.target {
            ReferenceTarget::Internal { name } => {
                if name.is_empty() {
                    return Err(OpenApiError::validation_with_path(
                        "Referenced component name cannot be empty",
                        format!("components.{}", T::KIND),
                    ));
                }
                Ok(())
            }
            ReferenceTarget::External { location } => crate::validation::validate_url(location),
        }
    }
}

/// A slot that holds either an inline value or a reference to a component
/// of the same kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged, bound(serialize = "T: Component + Serialize"))]
pub enum Referenceable<T> {
    Reference(Reference<T>),
    Inline(T),
}

impl<T> Referenceable<T> {
    /// Wrap an inline value
    pub fn inline(value: T) -> Self {
        Self::Inline(value)
    }

    /// Refer to the component `name` of this kind
    pub fn component(name: impl Into<String>) -> Self {
        Self::Reference(Reference::component(name))
    }

    /// Check if this slot holds a reference
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }

    /// The reference, if this slot holds one
    pub fn as_reference(&self) -> Option<&Reference<T>> {
        match self {
            Self::Reference(reference) => Some(reference),
            Self::Inline(_) => None,
        }
    }

    /// The inline value, if this slot holds one
    pub fn as_inline(&self) -> Option<&T> {
        match self {
            Self::Inline(value) => Some(value),
            Self::Reference(_) => None,
        }
    }
}

impl<T> From<T> for Referenceable<T> {
    fn from(value: T) -> Self {
        Self::Inline(value)
    }
}

impl<T> From<Reference<T>> for Referenceable<T> {
    fn from(reference: Reference<T>) -> Self {
        Self::Reference(reference)
    }
}

// An object carrying `$ref` is always decoded as a reference so that a
// malformed or kind-mismatched `$ref` is reported instead of being absorbed
// by the inline variant.
impl<'de, T> Deserialize<'de> for Referenceable<T>
where
    T: Component + DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let is_reference = value
            .as_object()
            .is_some_and(|object| object.contains_key("$ref"));

        if is_reference {
            Reference::deserialize(value)
                .map(Self::Reference)
                .map_err(D::Error::custom)
        } else {
            T::deserialize(value)
                .map(Self::Inline)
                .map_err(D::Error::custom)
        }
    }
}

impl<T: Component + Validate> Validate for Referenceable<T> {
    fn validate(&self) -> OpenApiResult<()> {
        match self {
            Self::Reference(reference) => reference.validate(),
            Self::Inline(value) => value.validate(),
        }
    }
}
