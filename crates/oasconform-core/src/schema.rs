//! Schema node model — one constrained value slot from a Swagger 2.0 schema
//!
//! A `SchemaNode` abstracts over Parameter / Property / Body-Schema objects:
//! wherever the API definition constrains a single value, there is one node.
//! Nodes are built once by the template tree builder (which dereferences any
//! `$ref` before a node is materialized) and are immutable afterwards.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

/// Where a parameter value travels in the HTTP request.
///
/// Nested schema nodes (array items, object properties) carry `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Body,
    None,
}

impl ParamLocation {
    /// Parse a Swagger `in` field. Unknown locations are rejected so an
    /// unsupported parameter style fails its operation loudly instead of
    /// producing requests the server never asked for.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "body" => Some(Self::Body),
            _ => None,
        }
    }
}

/// Numeric constraints shared by `integer` and `number` nodes.
///
/// Bounds are kept as `f64` because Swagger allows float literals even on
/// integer schemas; the integer generator truncates exactly the way the
/// bound math requires.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericConstraints {
    pub maximum: Option<f64>,
    pub exclusive_maximum: bool,
    pub minimum: Option<f64>,
    pub exclusive_minimum: bool,
    pub multiple_of: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringConstraints {
    pub max_length: Option<u64>,
    pub min_length: Option<u64>,
    pub pattern: Option<String>,
    /// Fixed set of allowed values. Takes precedence over length bounds.
    pub enumeration: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayConstraints {
    /// Element schema. Swagger requires it for arrays; `None` is a schema
    /// authoring defect caught at generator construction.
    pub items: Option<Box<SchemaNode>>,
    pub max_items: Option<u64>,
    pub min_items: Option<u64>,
    pub unique_items: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectConstraints {
    pub properties: BTreeMap<String, SchemaNode>,
    pub required_properties: BTreeSet<String>,
    /// Explicitly allowed additional properties. An object with zero
    /// declared properties is freeform regardless of this flag.
    pub additional_properties: bool,
    pub max_properties: Option<u64>,
    pub min_properties: Option<u64>,
}

impl ObjectConstraints {
    /// Freeform objects accept arbitrary JSON key/value pairs.
    pub fn is_freeform(&self) -> bool {
        self.additional_properties || self.properties.is_empty()
    }
}

/// One constrained value slot, fully dereferenced.
///
/// `type_name` and `format` are open strings because the registry dispatches
/// on them and OpenAPI allows arbitrary `format` values.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// Parameter name, if this is a top-level operation parameter.
    pub name: Option<String>,
    pub type_name: String,
    pub format: Option<String>,
    pub location: ParamLocation,
    pub required: bool,
    pub numeric: NumericConstraints,
    pub string: StringConstraints,
    pub array: ArrayConstraints,
    pub object: ObjectConstraints,
}

impl SchemaNode {
    /// A bare node of the given type with no constraints, used as the
    /// starting point by the template builder and in tests.
    pub fn of_type(type_name: &str) -> Self {
        Self {
            name: None,
            type_name: type_name.to_string(),
            format: None,
            location: ParamLocation::None,
            required: false,
            numeric: NumericConstraints::default(),
            string: StringConstraints::default(),
            array: ArrayConstraints::default(),
            object: ObjectConstraints::default(),
        }
    }
}
