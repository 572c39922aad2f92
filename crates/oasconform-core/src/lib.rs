//! Core engine for property-based conformance testing of Swagger 2.0 APIs.
//!
//! The pipeline: a parsed API definition becomes an [`ApiCatalog`] of
//! operation templates, each template's parameter schema nodes are handed to
//! the [`GeneratorFactory`], and the resulting generators draw random
//! constraint-satisfying values that a driver turns into live requests.
//! Everything here is transport-agnostic; loading documents and talking
//! HTTP live in the runner crate.

pub mod catalog;
pub mod factory;
pub mod generator;
pub mod schema;
pub mod template;

pub use catalog::{ApiCatalog, CatalogError, OperationBuildError};
pub use factory::{FactoryError, GeneratorFactory};
pub use generator::{Generator, GeneratorError, SampleError};
pub use schema::{ParamLocation, SchemaNode};
pub use template::{HttpMethod, OperationTemplate, Resolve, TemplateError};
