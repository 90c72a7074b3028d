//! Operation and Path Item Objects for OpenAPI documents.

use crate::dereference::{Dereferenceable, Resolver, dereferenced_view};
use crate::{
    DereferenceResult, DereferencedParameter, DereferencedRequestBody, DereferencedResponse,
    Extensions, Parameter, Referenceable, RequestBody, Response, error::OpenApiResult,
    validation::Validate,
};
use bon::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// The HTTP methods a path item can hold an operation for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// All methods, in the order a path item lists them
    pub const ALL: [HttpMethod; 8] = [
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Options,
        Self::Head,
        Self::Patch,
        Self::Trace,
    ];

    /// Lowercase method name as used for path item keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Describes a single API operation on a path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
pub struct Operation {
    /// A list of tags for API documentation control.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub tags: Vec<String>,

    /// A short summary of what the operation does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// A verbose explanation of the operation behavior.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unique string used to identify the operation.
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    /// Parameters applicable to this operation, in addition to those of the
    /// enclosing path item.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub parameters: Vec<Referenceable<Parameter>>,

    /// The request body applicable for this operation.
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Referenceable<RequestBody>>,

    /// Possible responses, keyed by HTTP status code or `default`.
    #[serde(default)]
    #[builder(default)]
    pub responses: IndexMap<String, Referenceable<Response>>,

    /// Declares this operation to be deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Operation {
    /// Create an empty operation
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operation id
    pub fn with_operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    /// Set the summary
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add a parameter
    pub fn with_parameter(mut self, parameter: impl Into<Referenceable<Parameter>>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    /// Set the request body
    pub fn with_request_body(
        mut self,
        request_body: impl Into<Referenceable<RequestBody>>,
    ) -> Self {
        self.request_body = Some(request_body.into());
        self
    }

    /// Add a response for a status code (or `default`)
    pub fn with_response(
        mut self,
        status: impl Into<String>,
        response: impl Into<Referenceable<Response>>,
    ) -> Self {
        self.responses.insert(status.into(), response.into());
        self
    }
}

impl Validate for Operation {
    fn validate(&self) -> OpenApiResult<()> {
        if let Some(ref operation_id) = self.operation_id {
            if operation_id.is_empty() {
                return Err(crate::error::OpenApiError::invalid_field(
                    "operationId",
                    "cannot be empty",
                ));
            }
        }

        validate_parameters(&self.parameters)?;

        if let Some(ref request_body) = self.request_body {
            request_body.validate()?;
        }

        for (status, response) in &self.responses {
            response.validate().map_err(|e| {
                crate::error::OpenApiError::validation_with_path(
                    e.to_string(),
                    format!("responses.{}", status),
                )
            })?;
        }

        self.extensions.validate()
    }
}

// Inline parameters must be unique by (name, location); referenced ones are
// checked where their component is defined.
fn validate_parameters(parameters: &[Referenceable<Parameter>]) -> OpenApiResult<()> {
    let mut seen = HashSet::new();
    for parameter in parameters {
        parameter.validate()?;
        if let Some(inline) = parameter.as_inline() {
            if !seen.insert((inline.name.as_str(), inline.location)) {
                return Err(crate::error::OpenApiError::validation(format!(
                    "Duplicate {} parameter '{}'",
                    inline.location, inline.name
                )));
            }
        }
    }
    Ok(())
}

/// A [`Operation`] with its parameters, request body and responses resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DereferencedOperation {
    underlying: Operation,
    pub parameters: Vec<DereferencedParameter>,
    pub request_body: Option<DereferencedRequestBody>,
    pub responses: IndexMap<String, DereferencedResponse>,
}

dereferenced_view!(DereferencedOperation => Operation, underlying_operation);

impl DereferencedOperation {
    /// The response for an exact status code key, falling back to `default`
    pub fn response_for(&self, status: &str) -> Option<&DereferencedResponse> {
        self.responses
            .get(status)
            .or_else(|| self.responses.get("default"))
    }
}

impl Dereferenceable for Operation {
    type Output = DereferencedOperation;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        Ok(DereferencedOperation {
            parameters: self.parameters.dereference_in(resolver)?,
            request_body: self.request_body.dereference_in(resolver)?,
            responses: self.responses.dereference_in(resolver)?,
            underlying: self.clone(),
        })
    }
}

/// Describes the operations available on a single path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
pub struct PathItem {
    /// A summary intended to apply to all operations in this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// A description intended to apply to all operations in this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,

    /// Parameters applicable to every operation on this path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub parameters: Vec<Referenceable<Parameter>>,

    /// Specification extensions
    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl PathItem {
    /// Create an empty path item
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operation for `method`, replacing any existing one
    pub fn with_operation(mut self, method: HttpMethod, operation: Operation) -> Self {
        *self.slot_mut(method) = Some(operation);
        self
    }

    /// Add a parameter shared by all operations
    pub fn with_parameter(mut self, parameter: impl Into<Referenceable<Parameter>>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    /// The operation for `method`, if any
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }

    /// Iterate over the defined operations in method order
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::ALL
            .into_iter()
            .filter_map(|method| self.operation(method).map(|operation| (method, operation)))
    }

    fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Trace => &mut self.trace,
        }
    }
}

impl Validate for PathItem {
    fn validate(&self) -> OpenApiResult<()> {
        validate_parameters(&self.parameters)?;

        for (method, operation) in self.operations() {
            operation.validate().map_err(|e| {
                crate::error::OpenApiError::validation_with_path(e.to_string(), method.as_str())
            })?;
        }

        self.extensions.validate()
    }
}

/// A [`PathItem`] with every operation and shared parameter resolved.
///
/// Each method slot shadows the raw one, so `resolved.get` is the resolved
/// operation rather than the raw one reached through `Deref`.
#[derive(Debug, Clone, PartialEq)]
pub struct DereferencedPathItem {
    underlying: PathItem,
    pub parameters: Vec<DereferencedParameter>,
    pub get: Option<DereferencedOperation>,
    pub put: Option<DereferencedOperation>,
    pub post: Option<DereferencedOperation>,
    pub delete: Option<DereferencedOperation>,
    pub options: Option<DereferencedOperation>,
    pub head: Option<DereferencedOperation>,
    pub patch: Option<DereferencedOperation>,
    pub trace: Option<DereferencedOperation>,
}

dereferenced_view!(DereferencedPathItem => PathItem, underlying_path_item);

impl DereferencedPathItem {
    /// The resolved operation for `method`, if any
    pub fn operation(&self, method: HttpMethod) -> Option<&DereferencedOperation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }

    /// Iterate over the resolved operations in method order
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &DereferencedOperation)> {
        HttpMethod::ALL
            .into_iter()
            .filter_map(|method| self.operation(method).map(|operation| (method, operation)))
    }
}

impl Dereferenceable for PathItem {
    type Output = DereferencedPathItem;

    fn dereference_in(&self, resolver: &mut Resolver<'_>) -> DereferenceResult<Self::Output> {
        Ok(DereferencedPathItem {
            parameters: self.parameters.dereference_in(resolver)?,
            get: self.get.dereference_in(resolver)?,
            put: self.put.dereference_in(resolver)?,
            post: self.post.dereference_in(resolver)?,
            delete: self.delete.dereference_in(resolver)?,
            options: self.options.dereference_in(resolver)?,
            head: self.head.dereference_in(resolver)?,
            patch: self.patch.dereference_in(resolver)?,
            trace: self.trace.dereference_in(resolver)?,
            underlying: self.clone(),
        })
    }
}
