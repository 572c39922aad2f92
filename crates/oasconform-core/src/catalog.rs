//! API catalog: every testable operation in a parsed definition.
//!
//! Building the catalog walks the `paths` object and materializes an
//! [`OperationTemplate`] per method. A malformed operation is recorded and
//! skipped rather than failing the whole document, so one bad endpoint does
//! not block testing the rest of the API.

use serde_json::Value;

use crate::template::{HttpMethod, OperationTemplate, Resolve, TemplateError};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("document has no `paths` object")]
    MissingPaths,
}

/// An operation that could not be templated, kept for reporting.
#[derive(Debug)]
pub struct OperationBuildError {
    pub method: HttpMethod,
    pub path: String,
    pub error: TemplateError,
}

#[derive(Debug)]
pub struct ApiCatalog {
    pub schemes: Vec<String>,
    pub host: Option<String>,
    pub base_path: String,
    operations: Vec<OperationTemplate>,
    build_errors: Vec<OperationBuildError>,
}

impl ApiCatalog {
    pub fn from_document(doc: &Value, resolver: &dyn Resolve) -> Result<Self, CatalogError> {
        let paths = doc
            .get("paths")
            .and_then(Value::as_object)
            .ok_or(CatalogError::MissingPaths)?;

        let schemes = doc
            .get("schemes")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let host = doc.get("host").and_then(Value::as_str).map(str::to_string);
        let base_path = doc
            .get("basePath")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        let mut operations = Vec::new();
        let mut build_errors = Vec::new();
        for (path, path_item) in paths {
            let shared: Vec<Value> = path_item
                .get("parameters")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let Some(item) = path_item.as_object() else {
                continue;
            };
            for (key, raw_op) in item {
                let Some(method) = HttpMethod::parse(key) else {
                    continue;
                };
                match OperationTemplate::from_raw(method, path, raw_op, &shared, resolver) {
                    Ok(op) => operations.push(op),
                    Err(error) => build_errors.push(OperationBuildError {
                        method,
                        path: path.clone(),
                        error,
                    }),
                }
            }
        }

        Ok(Self {
            schemes,
            host,
            base_path,
            operations,
            build_errors,
        })
    }

    pub fn operations(&self) -> &[OperationTemplate] {
        &self.operations
    }

    pub fn build_errors(&self) -> &[OperationBuildError] {
        &self.build_errors
    }

    fn lookup(&self, method: HttpMethod, path: &str) -> Option<&OperationTemplate> {
        self.operations
            .iter()
            .find(|op| op.method == method && op.path == path)
    }

    pub fn get(&self, path: &str) -> Option<&OperationTemplate> {
        self.lookup(HttpMethod::Get, path)
    }

    pub fn put(&self, path: &str) -> Option<&OperationTemplate> {
        self.lookup(HttpMethod::Put, path)
    }

    pub fn post(&self, path: &str) -> Option<&OperationTemplate> {
        self.lookup(HttpMethod::Post, path)
    }

    pub fn delete(&self, path: &str) -> Option<&OperationTemplate> {
        self.lookup(HttpMethod::Delete, path)
    }

    pub fn patch(&self, path: &str) -> Option<&OperationTemplate> {
        self.lookup(HttpMethod::Patch, path)
    }

    /// Look an operation up by its `operationId`.
    pub fn operation(&self, operation_id: &str) -> Option<&OperationTemplate> {
        self.operations
            .iter()
            .find(|op| op.operation_id.as_deref() == Some(operation_id))
    }

    /// The server root derived from `schemes`, `host` and `basePath`.
    /// `None` when the definition names no host.
    pub fn base_url(&self) -> Option<String> {
        let host = self.host.as_deref()?;
        let scheme = self.schemes.first().map(String::as_str).unwrap_or("http");
        Some(format!("{scheme}://{host}{}", self.base_path))
    }
}
