//! Dereferencing: turning a document tree that may contain references into a
//! fully resolved mirror of it.
//!
//! Every raw type with referenceable fields implements [`Dereferenceable`],
//! producing a `Dereferenced*` counterpart in which each `Referenceable<U>`
//! field has been replaced by the resolved form of `U`. Fields untouched by
//! resolution stay reachable through `Deref` to an owned copy of the raw
//! value, so `dereferenced.description` reads the same as `raw.description`.
//!
//! Resolution walks fields in declaration order and map entries in insertion
//! order. The first failure aborts the whole call; no partially resolved tree
//! is ever returned.
//!
//! # Example
//!
//! ```rust
//! use openapi_types::{
//!     Components, ComponentKind, DereferenceError, DereferencedResponse, Header, Response,
//!     Schema,
//! };
//!
//! let response = Response::new("test").with_header_reference("Header", "test");
//!
//! let components = Components::new().with_header("test", Header::new(Schema::string()));
//! let resolved = DereferencedResponse::new(&response, &components).unwrap();
//! assert_eq!(resolved.description, "test");
//! assert_eq!(
//!     resolved.headers.as_ref().unwrap()["Header"].underlying_header(),
//!     &Header::new(Schema::string())
//! );
//!
//! let err = DereferencedResponse::new(&response, &Components::no_components()).unwrap_err();
//! assert_eq!(err, DereferenceError::missing_component(ComponentKind::Headers, "test"));
//! ```

use crate::{
    Component, ComponentKind, Components, DereferenceError, DereferenceResult, Reference,
    ReferenceTarget, Referenceable,
};
use indexmap::{IndexMap, IndexSet};
use std::hash::Hash;
use tracing::{debug, trace};

/// A raw document value that can be resolved against a [`Components`] table.
pub trait Dereferenceable {
    /// The resolved mirror of this type
    type Output;

    /// Resolve this value using an in-flight resolver.
    ///
    /// Implementations recurse into every referenceable field through the
    /// same resolver so that cycles spanning several components are caught.
    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output>;

    /// Resolve this value against `components`
    fn dereferenced(&self, components: &Components) -> DereferenceResult<Self::Output> {
        self.dereference_in(&mut Resolver::new(components))
    }
}

/// Resolve `value` against `components`.
pub fn dereference<T>(value: &T, components: &Components) -> DereferenceResult<T::Output>
where
    T: Dereferenceable + ?Sized,
{
    value.dereferenced(components)
}

/// State of a single dereferencing call.
///
/// Tracks which components are being resolved on the active path; re-entering
/// one of them is a cycle.
#[derive(Debug)]
pub struct Resolver<'a> {
    components: &'a Components,
    in_progress: IndexSet<(ComponentKind, String)>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver reading from `components`
    pub fn new(components: &'a Components) -> Self {
        Self {
            components,
            in_progress: IndexSet::new(),
        }
    }

    /// The table references are resolved against
    pub fn components(&self) -> &'a Components {
        self.components
    }

    /// Number of components currently being resolved on the active path
    pub fn depth(&self) -> usize {
        self.in_progress.len()
    }

    /// Resolve `reference` and dereference the component it names.
    pub fn dereference_reference<T>(
        &mut self,
        reference: &Reference<T>,
    ) -> DereferenceResult<T::Output>
    where
        T: Component + Dereferenceable,
    {
        let name = match reference.target() {
            ReferenceTarget::Internal { name } => name,
            ReferenceTarget::External { location } => {
                debug!(%location, "rejecting external reference");
                return Err(DereferenceError::unsupported_external(location.as_str()));
            }
        };

        let key = (T::KIND, name.clone());
        if self.in_progress.contains(&key) {
            debug!(kind = %T::KIND, %name, depth = self.depth(), "cyclic reference");
            return Err(DereferenceError::cyclic_reference(T::KIND, name.as_str()));
        }

        let components = self.components;
        let component = components.resolve(reference).inspect_err(|_| {
            debug!(kind = %T::KIND, %name, "referenced component is missing");
        })?;
        debug!(kind = %T::KIND, %name, "resolved reference");

        self.in_progress.insert(key);
        trace!(kind = %T::KIND, %name, depth = self.depth(), "entering component");
        let resolved = component.dereference_in(self);
        self.in_progress.pop();
        trace!(kind = %T::KIND, %name, depth = self.depth(), "leaving component");

        resolved
    }
}

impl<T> Dereferenceable for Referenceable<T>
where
    T: Component + Dereferenceable,
{
    type Output = T::Output;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        match self {
            Referenceable::Inline(value) => value.dereference_in(resolver),
            Referenceable::Reference(reference) => resolver.dereference_reference(reference),
        }
    }
}

impl<T: Dereferenceable> Dereferenceable for Option<T> {
    type Output = Option<T::Output>;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        self.as_ref()
            .map(|value| value.dereference_in(resolver))
            .transpose()
    }
}

impl<T: Dereferenceable> Dereferenceable for Box<T> {
    type Output = Box<T::Output>;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        self.as_ref().dereference_in(resolver).map(Box::new)
    }
}

impl<T: Dereferenceable> Dereferenceable for Vec<T> {
    type Output = Vec<T::Output>;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        self.iter()
            .map(|value| value.dereference_in(resolver))
            .collect()
    }
}

impl<K, V> Dereferenceable for IndexMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Dereferenceable,
{
    type Output = IndexMap<K, V::Output>;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        self.iter()
            .map(|(key, value)| Ok((key.clone(), value.dereference_in(resolver)?)))
            .collect()
    }
}

/// Generates the pass-through layer of a `Dereferenced*` type: `Deref` to the
/// raw value it was built from, a named accessor for it, and a constructor.
///
/// The target struct must hold the raw value in a field named `underlying`.
macro_rules! dereferenced_view {
    ($dereferenced:ident => $raw:ty, $accessor:ident) => {
        impl $dereferenced {
            /// Resolve `raw` against `components`
            pub fn new(
                raw: &$raw,
                components: &$crate::Components,
            ) -> $crate::DereferenceResult<Self> {
                $crate::Dereferenceable::dereferenced(raw, components)
            }

            /// The raw value this was resolved from, with its references intact
            pub fn $accessor(&self) -> &$raw {
                &self.underlying
            }

            /// Consume this view, returning the raw value it was resolved from
            pub fn into_underlying(self) -> $raw {
                self.underlying
            }
        }

        impl ::std::ops::Deref for $dereferenced {
            type Target = $raw;

            fn deref(&self) -> &$raw {
                &self.underlying
            }
        }
    };
}

pub(crate) use dereferenced_view;
