//! Generator registry, dispatching schema nodes to generator builders.
//!
//! Lookup is two-level: an exact `(type, format)` entry wins, otherwise the
//! type-wide default is used, otherwise the node is unsupported. Callers can
//! install builders for vendor formats (`register`) or replace a whole
//! type's handling (`register_type_default`) without touching the bundled
//! set.

use std::collections::HashMap;
use std::sync::Arc;

use crate::generator::{
    ArrayGenerator, BytesGenerator, EnumGenerator, FloatGenerator, Generator, GeneratorError,
    IntegerGenerator, ObjectGenerator, StringGenerator, StringVariant,
};
use crate::schema::{ParamLocation, SchemaNode};

/// Builds a generator for a node. Receives the factory so container builders
/// can recurse into item and property schemas.
pub type BuilderFn =
    Arc<dyn Fn(&SchemaNode, &GeneratorFactory) -> Result<Generator, GeneratorError> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("no generator registered for type `{type_name}` (format: {format:?})")]
    Unsupported {
        type_name: String,
        format: Option<String>,
    },
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

/// Registry of generator builders keyed by schema type and format.
#[derive(Clone)]
pub struct GeneratorFactory {
    by_format: HashMap<(String, String), BuilderFn>,
    by_type: HashMap<String, BuilderFn>,
}

impl GeneratorFactory {
    /// A factory preloaded with the bundled Swagger primitive types and the
    /// `byte`, `date`, `date-time` and `uuid` string formats.
    pub fn new() -> Self {
        let mut f = Self {
            by_format: HashMap::new(),
            by_type: HashMap::new(),
        };

        f.register_type_default("boolean", |_, _| Ok(Generator::Boolean));
        f.register_type_default("integer", |node, _| {
            Ok(Generator::Integer(IntegerGenerator::from_constraints(
                &node.numeric,
            )?))
        });
        f.register_type_default("number", |node, _| {
            Ok(Generator::Float(FloatGenerator::from_constraints(
                &node.numeric,
            )?))
        });
        f.register_type_default("string", |node, _| {
            let variant = match node.location {
                ParamLocation::Path => StringVariant::UrlPath,
                ParamLocation::Header => StringVariant::HttpHeader,
                _ => StringVariant::Plain,
            };
            Ok(Generator::String(StringGenerator::from_constraints(
                &node.string,
                variant,
            )?))
        });
        f.register_type_default("file", |_, _| Ok(Generator::File));
        f.register_type_default("array", |node, factory| {
            let items = node.array.items.as_deref().ok_or(GeneratorError::MissingItems)?;
            let item_gen = factory
                .build(items)
                .map_err(|e| GeneratorError::Unsatisfiable(e.to_string()))?;
            Ok(Generator::Array(ArrayGenerator::new(item_gen, &node.array)?))
        });
        f.register_type_default("object", |node, factory| {
            let mut props = std::collections::BTreeMap::new();
            for (name, prop) in &node.object.properties {
                let g = factory
                    .build(prop)
                    .map_err(|e| GeneratorError::Unsatisfiable(e.to_string()))?;
                props.insert(name.clone(), g);
            }
            Ok(Generator::Object(ObjectGenerator::new(props, &node.object)?))
        });

        f.register("string", "byte", |_, _| {
            Ok(Generator::Bytes(BytesGenerator))
        });
        f.register("string", "date", |_, _| Ok(Generator::Date));
        f.register("string", "date-time", |_, _| Ok(Generator::DateTime));
        f.register("string", "uuid", |_, _| Ok(Generator::Uuid));

        f
    }

    /// Install a builder for an exact `(type, format)` pair.
    pub fn register<F>(&mut self, type_name: &str, format: &str, builder: F)
    where
        F: Fn(&SchemaNode, &GeneratorFactory) -> Result<Generator, GeneratorError>
            + Send
            + Sync
            + 'static,
    {
        self.by_format
            .insert((type_name.to_string(), format.to_string()), Arc::new(builder));
    }

    /// Install the fallback builder for every node of `type_name` whose
    /// format has no exact entry.
    pub fn register_type_default<F>(&mut self, type_name: &str, builder: F)
    where
        F: Fn(&SchemaNode, &GeneratorFactory) -> Result<Generator, GeneratorError>
            + Send
            + Sync
            + 'static,
    {
        self.by_type.insert(type_name.to_string(), Arc::new(builder));
    }

    /// Build a generator for `node`. An `enum` constraint wins over every
    /// other dispatch rule.
    pub fn build(&self, node: &SchemaNode) -> Result<Generator, FactoryError> {
        if let Some(values) = &node.string.enumeration {
            return Ok(Generator::Enum(EnumGenerator::from_values(values.clone())?));
        }

        let builder = node
            .format
            .as_ref()
            .and_then(|fmt| self.by_format.get(&(node.type_name.clone(), fmt.clone())))
            .or_else(|| self.by_type.get(&node.type_name))
            .ok_or_else(|| FactoryError::Unsupported {
                type_name: node.type_name.clone(),
                format: node.format.clone(),
            })?;

        Ok(builder(node, self)?)
    }
}

impl Default for GeneratorFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GeneratorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorFactory")
            .field("formats", &self.by_format.keys().collect::<Vec<_>>())
            .field("types", &self.by_type.keys().collect::<Vec<_>>())
            .finish()
    }
}
