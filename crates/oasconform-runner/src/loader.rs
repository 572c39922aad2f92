//! API definition loading: local files or HTTP URLs, JSON or YAML.

use std::path::Path;

use oasconform_core::template::{Resolve, TemplateError};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Load a Swagger document from a local path or an `http(s)://` URL.
pub fn load_document(location: &str) -> Result<Value, LoaderError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let response = reqwest::blocking::get(location)
            .map_err(|e| LoaderError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| LoaderError::Http(e.to_string()))?;
        let content = response.text().map_err(|e| LoaderError::Http(e.to_string()))?;
        parse_document(Path::new(location), &content)
    } else {
        let path = Path::new(location);
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoaderError::Io(format!("cannot read {location}: {e}")))?;
        parse_document(path, &content)
    }
}

/// Parse a definition from JSON or YAML.
///
/// Detection strategy: try extension first (`.yaml`/`.yml`/`.json`), then
/// fall back to content sniffing (leading `{` → JSON, otherwise YAML).
pub fn parse_document(path: &Path, content: &str) -> Result<Value, LoaderError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "yaml" | "yml" => {
            serde_yml::from_str(content).map_err(|e| LoaderError::Parse(format!("Invalid YAML: {e}")))
        }
        "json" => {
            serde_json::from_str(content).map_err(|e| LoaderError::Parse(format!("Invalid JSON: {e}")))
        }
        _ => {
            if content.trim_start().starts_with('{') {
                serde_json::from_str(content)
                    .map_err(|e| LoaderError::Parse(format!("Invalid JSON: {e}")))
            } else {
                serde_yml::from_str(content)
                    .map_err(|e| LoaderError::Parse(format!("Invalid YAML: {e}")))
            }
        }
    }
}

/// Resolver for local references (`#/definitions/...`, `#/parameters/...`)
/// against a loaded document.
#[derive(Debug)]
pub struct DocumentResolver {
    document: Value,
}

impl DocumentResolver {
    pub fn new(document: Value) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl Resolve for DocumentResolver {
    fn resolve(&self, reference: &str) -> Result<Value, TemplateError> {
        let pointer = reference
            .strip_prefix('#')
            .ok_or_else(|| TemplateError::UnresolvedReference(reference.to_string()))?;
        self.document
            .pointer(pointer)
            .cloned()
            .ok_or_else(|| TemplateError::UnresolvedReference(reference.to_string()))
    }
}
