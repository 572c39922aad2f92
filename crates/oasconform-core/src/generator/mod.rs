//! Value generators — lazy, restartable producers of constraint-satisfying values
//!
//! One generator kind per schema type, modelled as a closed tagged union with
//! a single `sample` dispatch instead of an inheritance chain. Constraint
//! checking happens once at construction; sampling any number of times yields
//! independently drawn values inside the bounds and never mutates shared
//! state. The `Custom` variant carries a boxed sampler so registry extensions
//! can introduce arbitrary value spaces without touching the core.

mod composite;
mod primitives;
pub mod shrink;

use std::fmt;
use std::sync::Arc;

use rand::rngs::SmallRng;
use serde_json::Value;

pub use composite::{ArrayGenerator, ObjectGenerator, json_value};
pub use primitives::{
    BytesGenerator, EnumGenerator, FloatGenerator, IntegerGenerator, StringGenerator,
    StringVariant,
};

/// Cap on extra key/value pairs injected into freeform objects when the
/// schema gives no explicit `maxProperties`. Keeps generation cost bounded.
pub const MAX_ADDITIONAL_PROPERTIES: u64 = 5;

/// Nesting ceiling for the unconstrained JSON generator.
pub const MAX_JSON_DEPTH: u32 = 5;

/// Constraint violations detected while building a generator.
///
/// These are contract errors in the schema (or in how the tool was asked to
/// use it) and always fail fast: a generator that cannot honour its bounds
/// must never be constructed.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("exclusive {bound} set without a {bound} value")]
    ExclusiveWithoutBound { bound: &'static str },
    #[error("multipleOf must be positive, got {0}")]
    InvalidMultipleOf(f64),
    #[error("unsatisfiable constraints: {0}")]
    Unsatisfiable(String),
    #[error("enum constraint lists no values")]
    EmptyEnum,
    #[error("path parameters must be at least 1 character long, schema demands minLength {0}")]
    PathMinLength(u64),
    #[error("array schema declares no items schema")]
    MissingItems,
}

/// Failures while drawing a value from an already-validated generator.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("uniqueItems exhausted the value space: drew {have} distinct elements, need {need}")]
    UniqueItemsExhausted { have: usize, need: u64 },
    #[error("custom generator failed: {0}")]
    Custom(String),
}

/// A user-supplied sampler installed through the registry.
#[derive(Clone)]
pub struct CustomGenerator {
    sampler: Arc<dyn Fn(&mut SmallRng) -> Result<Value, SampleError> + Send + Sync>,
}

impl CustomGenerator {
    pub fn new<F>(sampler: F) -> Self
    where
        F: Fn(&mut SmallRng) -> Result<Value, SampleError> + Send + Sync + 'static,
    {
        Self {
            sampler: Arc::new(sampler),
        }
    }

    fn sample(&self, rng: &mut SmallRng) -> Result<Value, SampleError> {
        (self.sampler)(rng)
    }
}

impl fmt::Debug for CustomGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomGenerator(..)")
    }
}

/// Closed union of value generators, one variant per schema type
/// (plus location-derived string variants carried inside `StringGenerator`).
#[derive(Debug, Clone)]
pub enum Generator {
    Boolean,
    Integer(IntegerGenerator),
    Float(FloatGenerator),
    String(StringGenerator),
    Enum(EnumGenerator),
    Date,
    DateTime,
    Uuid,
    Bytes(BytesGenerator),
    File,
    Array(ArrayGenerator),
    Object(ObjectGenerator),
    Custom(CustomGenerator),
}

impl Generator {
    /// Draw one value satisfying this generator's constraints.
    pub fn sample(&self, rng: &mut SmallRng) -> Result<Value, SampleError> {
        match self {
            Self::Boolean => Ok(Value::Bool(primitives::sample_bool(rng))),
            Self::Integer(g) => Ok(g.sample(rng)),
            Self::Float(g) => Ok(g.sample(rng)),
            Self::String(g) => Ok(g.sample(rng)),
            Self::Enum(g) => Ok(g.sample(rng)),
            Self::Date => Ok(Value::String(primitives::sample_date(rng))),
            Self::DateTime => Ok(Value::String(primitives::sample_datetime(rng))),
            Self::Uuid => Ok(Value::String(primitives::sample_uuid(rng))),
            Self::Bytes(g) => Ok(g.sample(rng)),
            Self::File => Ok(Value::String(primitives::sample_file_payload(rng))),
            Self::Array(g) => g.sample(rng),
            Self::Object(g) => g.sample(rng),
            Self::Custom(g) => g.sample(rng),
        }
    }
}
