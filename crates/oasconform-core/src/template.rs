//! Templates: the typed view of a Swagger 2.0 operation.
//!
//! Raw JSON fragments from the API definition are turned into `SchemaNode`
//! trees here, with every `$ref` dereferenced through a caller-supplied
//! [`Resolve`] implementation. Reference chains are depth-capped so a
//! circular definition fails the affected operation instead of hanging the
//! run.

use serde_json::Value;

use crate::schema::{ParamLocation, SchemaNode};

/// Hops allowed while chasing `$ref` chains before declaring a cycle.
pub const MAX_REF_DEPTH: u32 = 64;

/// Resolves a JSON reference (e.g. `#/definitions/Pet`) to the value it
/// points at. Implemented by the document loader.
pub trait Resolve {
    fn resolve(&self, reference: &str) -> Result<Value, TemplateError>;
}

/// A resolver for schemas known to contain no references.
#[derive(Debug, Default)]
pub struct NoRefs;

impl Resolve for NoRefs {
    fn resolve(&self, reference: &str) -> Result<Value, TemplateError> {
        Err(TemplateError::UnresolvedReference(reference.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("reference `{0}` could not be resolved")]
    UnresolvedReference(String),
    #[error("reference chain exceeded {MAX_REF_DEPTH} hops, schema is likely circular")]
    CircularReference,
    #[error("unsupported parameter location `{0}`")]
    UnsupportedLocation(String),
    #[error("operation declares no responses")]
    NoResponses,
    #[error("invalid schema: {0}")]
    InvalidSpec(String),
}

/// The request methods an operation template can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "get" => Some(Self::Get),
            "put" => Some(Self::Put),
            "post" => Some(Self::Post),
            "delete" => Some(Self::Delete),
            "patch" => Some(Self::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One callable operation: method, path template, parameter schema nodes and
/// the response codes the definition admits.
#[derive(Debug, Clone)]
pub struct OperationTemplate {
    pub method: HttpMethod,
    pub path: String,
    pub operation_id: Option<String>,
    pub parameters: Vec<SchemaNode>,
    /// Status codes a conforming response may carry, sorted ascending.
    pub allowed_codes: Vec<u16>,
}

impl OperationTemplate {
    /// Build an operation from its raw definition. `shared_params` are
    /// path-item-level parameters that apply to every method on the path;
    /// an operation-level parameter with the same name and location
    /// overrides its shared counterpart.
    pub fn from_raw(
        method: HttpMethod,
        path: &str,
        raw: &Value,
        shared_params: &[Value],
        resolver: &dyn Resolve,
    ) -> Result<Self, TemplateError> {
        let operation_id = raw
            .get("operationId")
            .and_then(Value::as_str)
            .map(str::to_string);

        let own: Vec<Value> = raw
            .get("parameters")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let mut parameters = Vec::new();
        let mut seen: Vec<(String, String)> = Vec::new();
        for raw_param in own.iter().chain(shared_params) {
            let node = build_parameter(raw_param, resolver)?;
            let key = (
                node.name.clone().unwrap_or_default(),
                format!("{:?}", node.location),
            );
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            parameters.push(node);
        }

        let allowed_codes = derive_allowed_codes(raw.get("responses"))?;

        Ok(Self {
            method,
            path: path.to_string(),
            operation_id,
            parameters,
            allowed_codes,
        })
    }

    pub fn accepts_status(&self, status: u16) -> bool {
        self.allowed_codes.binary_search(&status).is_ok()
    }
}

/// Turn a `responses` object into the set of acceptable status codes.
///
/// `default` is not a concrete code and is dropped, but its presence means
/// the API claims to handle anything, so a definition listing only
/// `default` admits every 2xx code. A definition whose concrete codes
/// include no success code still gets 200: APIs routinely return it
/// without declaring it.
fn derive_allowed_codes(responses: Option<&Value>) -> Result<Vec<u16>, TemplateError> {
    let Some(map) = responses.and_then(Value::as_object) else {
        return Err(TemplateError::NoResponses);
    };

    let mut has_default = false;
    let mut codes: Vec<u16> = Vec::new();
    for key in map.keys() {
        if key == "default" {
            has_default = true;
        } else if let Ok(code) = key.parse::<u16>() {
            codes.push(code);
        } else {
            return Err(TemplateError::InvalidSpec(format!(
                "response key `{key}` is neither a status code nor `default`"
            )));
        }
    }

    if codes.is_empty() {
        if !has_default {
            return Err(TemplateError::NoResponses);
        }
        return Ok((200..=299).collect());
    }
    if !codes.iter().any(|c| (200..=299).contains(c)) {
        codes.push(200);
    }
    codes.sort_unstable();
    codes.dedup();
    Ok(codes)
}

/// Build the schema node for one parameter object (which may itself be a
/// `$ref` into `#/parameters`).
fn build_parameter(raw: &Value, resolver: &dyn Resolve) -> Result<SchemaNode, TemplateError> {
    let raw = deref(raw, resolver, 0)?;

    let location_raw = raw
        .get("in")
        .and_then(Value::as_str)
        .ok_or_else(|| TemplateError::InvalidSpec("parameter without `in`".to_string()))?;
    let location = ParamLocation::parse(location_raw)
        .ok_or_else(|| TemplateError::UnsupportedLocation(location_raw.to_string()))?;

    let mut node = if location == ParamLocation::Body {
        let schema = raw
            .get("schema")
            .ok_or_else(|| TemplateError::InvalidSpec("body parameter without schema".to_string()))?;
        build_schema_node(schema, resolver, 0)?
    } else {
        build_schema_node(&raw, resolver, 0)?
    };

    node.name = raw.get("name").and_then(Value::as_str).map(str::to_string);
    node.location = location;
    // Path parameters are always required in Swagger 2.0.
    node.required = location == ParamLocation::Path
        || raw.get("required").and_then(Value::as_bool).unwrap_or(false);
    Ok(node)
}

fn deref(raw: &Value, resolver: &dyn Resolve, depth: u32) -> Result<Value, TemplateError> {
    let mut current = raw.clone();
    let mut depth = depth;
    while let Some(reference) = current.get("$ref").and_then(Value::as_str) {
        if depth >= MAX_REF_DEPTH {
            return Err(TemplateError::CircularReference);
        }
        current = resolver.resolve(reference)?;
        depth += 1;
    }
    Ok(current)
}

/// Build a full `SchemaNode` tree from a raw schema fragment, chasing
/// references as they appear.
pub fn build_schema_node(
    raw: &Value,
    resolver: &dyn Resolve,
    depth: u32,
) -> Result<SchemaNode, TemplateError> {
    if depth >= MAX_REF_DEPTH {
        return Err(TemplateError::CircularReference);
    }
    let raw = deref(raw, resolver, depth)?;

    // Definitions frequently omit `type: object` and just list properties;
    // a fully empty schema means "any value", which a freeform object
    // covers.
    let type_name = raw
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("object")
        .to_string();

    let mut node = SchemaNode::of_type(&type_name);
    node.format = raw.get("format").and_then(Value::as_str).map(str::to_string);

    node.numeric.maximum = raw.get("maximum").and_then(Value::as_f64);
    node.numeric.minimum = raw.get("minimum").and_then(Value::as_f64);
    node.numeric.exclusive_maximum = raw
        .get("exclusiveMaximum")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    node.numeric.exclusive_minimum = raw
        .get("exclusiveMinimum")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    node.numeric.multiple_of = raw.get("multipleOf").and_then(Value::as_f64);

    node.string.max_length = raw.get("maxLength").and_then(Value::as_u64);
    node.string.min_length = raw.get("minLength").and_then(Value::as_u64);
    node.string.pattern = raw.get("pattern").and_then(Value::as_str).map(str::to_string);
    node.string.enumeration = raw.get("enum").and_then(Value::as_array).cloned();

    if let Some(items) = raw.get("items") {
        node.array.items = Some(Box::new(build_schema_node(items, resolver, depth + 1)?));
    }
    node.array.max_items = raw.get("maxItems").and_then(Value::as_u64);
    node.array.min_items = raw.get("minItems").and_then(Value::as_u64);
    node.array.unique_items = raw
        .get("uniqueItems")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if let Some(props) = raw.get("properties").and_then(Value::as_object) {
        for (name, prop) in props {
            let child = build_schema_node(prop, resolver, depth + 1)?;
            node.object.properties.insert(name.clone(), child);
        }
    }
    if let Some(required) = raw.get("required").and_then(Value::as_array) {
        for entry in required {
            if let Some(name) = entry.as_str() {
                node.object.required_properties.insert(name.to_string());
            }
        }
    }
    // `additionalProperties` may be a bool or a schema; any value other
    // than an explicit `false` opens the object up.
    node.object.additional_properties = match raw.get("additionalProperties") {
        Some(Value::Bool(allowed)) => *allowed,
        Some(_) => true,
        None => false,
    };
    node.object.max_properties = raw.get("maxProperties").and_then(Value::as_u64);
    node.object.min_properties = raw.get("minProperties").and_then(Value::as_u64);

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    struct MapResolver(HashMap<String, Value>);

    impl Resolve for MapResolver {
        fn resolve(&self, reference: &str) -> Result<Value, TemplateError> {
            self.0
                .get(reference)
                .cloned()
                .ok_or_else(|| TemplateError::UnresolvedReference(reference.to_string()))
        }
    }

    #[test]
    fn builds_constrained_integer_node() {
        let raw = json!({
            "type": "integer",
            "format": "int32",
            "minimum": 1,
            "maximum": 10,
            "exclusiveMaximum": true,
            "multipleOf": 2
        });
        let node = build_schema_node(&raw, &NoRefs, 0).unwrap();
        assert_eq!(node.type_name, "integer");
        assert_eq!(node.format.as_deref(), Some("int32"));
        assert_eq!(node.numeric.maximum, Some(10.0));
        assert!(node.numeric.exclusive_maximum);
        assert_eq!(node.numeric.multiple_of, Some(2.0));
    }

    #[test]
    fn reference_is_chased_through_definitions() {
        let resolver = MapResolver(HashMap::from([(
            "#/definitions/Name".to_string(),
            json!({"type": "string", "maxLength": 8}),
        )]));
        let raw = json!({"$ref": "#/definitions/Name"});
        let node = build_schema_node(&raw, &resolver, 0).unwrap();
        assert_eq!(node.type_name, "string");
        assert_eq!(node.string.max_length, Some(8));
    }

    #[test]
    fn circular_reference_is_detected() {
        let resolver = MapResolver(HashMap::from([(
            "#/definitions/Loop".to_string(),
            json!({"$ref": "#/definitions/Loop"}),
        )]));
        let raw = json!({"$ref": "#/definitions/Loop"});
        let err = build_schema_node(&raw, &resolver, 0).unwrap_err();
        assert!(matches!(err, TemplateError::CircularReference));
    }

    #[test]
    fn typeless_fragment_with_properties_is_an_object() {
        let raw = json!({"properties": {"id": {"type": "integer"}}});
        let node = build_schema_node(&raw, &NoRefs, 0).unwrap();
        assert_eq!(node.type_name, "object");
        assert!(node.object.properties.contains_key("id"));
    }

    #[test]
    fn typeless_fragment_without_properties_is_freeform() {
        let node = build_schema_node(&json!({}), &NoRefs, 0).unwrap();
        assert_eq!(node.type_name, "object");
        assert!(node.object.is_freeform());
    }

    #[test]
    fn body_parameter_uses_nested_schema() {
        let raw = json!({
            "name": "pet",
            "in": "body",
            "required": true,
            "schema": {
                "type": "object",
                "properties": {"name": {"type": "string"}},
                "required": ["name"]
            }
        });
        let node = build_parameter(&raw, &NoRefs).unwrap();
        assert_eq!(node.location, ParamLocation::Body);
        assert_eq!(node.name.as_deref(), Some("pet"));
        assert!(node.required);
        assert!(node.object.required_properties.contains("name"));
    }

    #[test]
    fn form_data_parameter_is_unsupported() {
        let raw = json!({"name": "file", "in": "formData", "type": "file"});
        let err = build_parameter(&raw, &NoRefs).unwrap_err();
        assert!(matches!(err, TemplateError::UnsupportedLocation(loc) if loc == "formData"));
    }

    #[test]
    fn path_parameter_is_forced_required() {
        let raw = json!({"name": "id", "in": "path", "type": "integer"});
        let node = build_parameter(&raw, &NoRefs).unwrap();
        assert!(node.required);
        assert_eq!(node.location, ParamLocation::Path);
    }

    #[test]
    fn concrete_codes_pass_through() {
        let codes = derive_allowed_codes(Some(&json!({
            "200": {}, "404": {}, "default": {}
        })))
        .unwrap();
        assert_eq!(codes, vec![200, 404]);
    }

    #[test]
    fn default_only_admits_every_success_code() {
        let codes = derive_allowed_codes(Some(&json!({"default": {}}))).unwrap();
        assert_eq!(codes.len(), 100);
        assert_eq!(codes[0], 200);
        assert_eq!(codes[99], 299);
    }

    #[test]
    fn missing_success_code_gains_200() {
        let codes = derive_allowed_codes(Some(&json!({"404": {}, "500": {}}))).unwrap();
        assert_eq!(codes, vec![200, 404, 500]);
    }

    #[test]
    fn empty_responses_rejected() {
        assert!(matches!(
            derive_allowed_codes(Some(&json!({}))),
            Err(TemplateError::NoResponses)
        ));
        assert!(matches!(
            derive_allowed_codes(None),
            Err(TemplateError::NoResponses)
        ));
    }

    #[test]
    fn operation_merges_shared_parameters() {
        let raw = json!({
            "operationId": "getPet",
            "parameters": [
                {"name": "verbose", "in": "query", "type": "boolean"}
            ],
            "responses": {"200": {}}
        });
        let shared = vec![json!({"name": "petId", "in": "path", "type": "integer"})];
        let op =
            OperationTemplate::from_raw(HttpMethod::Get, "/pets/{petId}", &raw, &shared, &NoRefs)
                .unwrap();
        assert_eq!(op.operation_id.as_deref(), Some("getPet"));
        assert_eq!(op.parameters.len(), 2);
        assert!(op.accepts_status(200));
        assert!(!op.accepts_status(404));
    }

    #[test]
    fn operation_parameter_overrides_shared_one() {
        let raw = json!({
            "parameters": [
                {"name": "petId", "in": "path", "type": "integer", "minimum": 1}
            ],
            "responses": {"200": {}}
        });
        let shared = vec![json!({"name": "petId", "in": "path", "type": "string"})];
        let op =
            OperationTemplate::from_raw(HttpMethod::Get, "/pets/{petId}", &raw, &shared, &NoRefs)
                .unwrap();
        assert_eq!(op.parameters.len(), 1);
        assert_eq!(op.parameters[0].type_name, "integer");
    }
}
