//! OpenAPI Types
//!
//! Rust types for the reusable parts of OpenAPI 3.0 documents, with serde
//! support, bon builders, validation, and dereferencing of `$ref` slots
//! against a document's components table.
//!
//! This crate provides:
//! - A typed components table keyed by component kind and name
//! - Kind-typed references, so a header slot can only refer to a header
//! - `Referenceable<T>` slots holding either an inline value or a reference
//! - `Dereferenced*` mirrors of every model type, with all references resolved
//!   and cycles, missing components and external references reported as errors
//! - Specification extensions support for x-* extension fields
//!
//! # Example
//!
//! ```rust
//! use openapi_types::{
//!     Components, ContentType, Dereferenceable, Header, MediaType, Response, Schema,
//! };
//!
//! let components = Components::new()
//!     .with_schema("Pet", Schema::object().with_property("name", Schema::string()))
//!     .with_header("RateLimit", Header::new(Schema::integer()));
//!
//! let response = Response::new("A pet")
//!     .with_header_reference("X-Rate-Limit", "RateLimit")
//!     .with_content(ContentType::json(), MediaType::with_schema_reference("Pet"));
//!
//! let resolved = response.dereferenced(&components).unwrap();
//! assert_eq!(resolved.description, "A pet");
//!
//! let pet = resolved.content[&ContentType::json()].schema.as_ref().unwrap();
//! assert!(pet.properties.contains_key("name"));
//! ```

pub mod dereference;
pub mod error;
pub mod validation;

// Document model
mod components;
mod document;
mod example;
mod extensions;
mod header;
mod media_type;
mod operation;
mod parameter;
mod reference;
mod request_body;
mod response;
mod schema;

// Re-export all public types
pub use components::*;
pub use document::*;
pub use example::*;
pub use extensions::*;
pub use header::*;
pub use media_type::*;
pub use operation::*;
pub use parameter::*;
pub use reference::*;
pub use request_body::*;
pub use response::*;
pub use schema::*;

pub use dereference::{Dereferenceable, Resolver, dereference};
pub use error::*;
pub use validation::*;

/// OpenAPI specification version constants
pub mod version {
    /// Version written into newly created documents
    pub const CURRENT: &str = "3.0.3";

    /// All supported OpenAPI versions
    pub const SUPPORTED: &[&str] = &["3.0.0", "3.0.1", "3.0.2", "3.0.3"];

    /// Check if a version string is supported
    pub fn is_supported(version: &str) -> bool {
        SUPPORTED.contains(&version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants() {
        assert!(version::is_supported("3.0.3"));
        assert!(version::is_supported("3.0.0"));
        assert!(!version::is_supported("3.1.0"));
        assert!(!version::is_supported("2.0"));
    }
}
