//! Array and object generators, plus the unconstrained JSON sampler that
//! fills freeform object slots.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use rand::rngs::SmallRng;
use serde_json::{Map, Value, json};

use super::primitives::random_alnum;
use super::{Generator, GeneratorError, MAX_ADDITIONAL_PROPERTIES, MAX_JSON_DEPTH, SampleError};
use crate::schema::{ArrayConstraints, ObjectConstraints};

/// Extra elements above `minItems` when a schema gives no `maxItems`.
const DEFAULT_ITEMS_SLACK: u64 = 4;

/// Retry multiplier for uniqueItems sampling before giving up.
const UNIQUE_RETRY_FACTOR: u64 = 16;

#[derive(Debug, Clone)]
pub struct ArrayGenerator {
    pub(crate) items: Box<Generator>,
    pub(crate) min_items: u64,
    pub(crate) max_items: u64,
    pub(crate) unique_items: bool,
}

impl ArrayGenerator {
    pub fn new(items: Generator, c: &ArrayConstraints) -> Result<Self, GeneratorError> {
        let min_items = c.min_items.unwrap_or(0);
        let max_items = c.max_items.unwrap_or(min_items + DEFAULT_ITEMS_SLACK);
        if max_items < min_items {
            return Err(GeneratorError::Unsatisfiable(format!(
                "maxItems {max_items} below minItems {min_items}"
            )));
        }
        Ok(Self {
            items: Box::new(items),
            min_items,
            max_items,
            unique_items: c.unique_items,
        })
    }

    pub(crate) fn sample(&self, rng: &mut SmallRng) -> Result<Value, SampleError> {
        let len = rng.gen_range(self.min_items..=self.max_items);
        if !self.unique_items {
            let mut out = Vec::with_capacity(len as usize);
            for _ in 0..len {
                out.push(self.items.sample(rng)?);
            }
            return Ok(Value::Array(out));
        }

        // uniqueItems: keep drawing until `len` distinct values or the retry
        // budget runs out. A tiny value space (e.g. booleans) can make the
        // requested length impossible; that is a hard failure, not a silent
        // short array.
        let mut out: Vec<Value> = Vec::with_capacity(len as usize);
        let budget = len * UNIQUE_RETRY_FACTOR + 64;
        for _ in 0..budget {
            if out.len() as u64 == len {
                break;
            }
            let candidate = self.items.sample(rng)?;
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        }
        if (out.len() as u64) < len {
            return Err(SampleError::UniqueItemsExhausted {
                have: out.len(),
                need: len,
            });
        }
        Ok(Value::Array(out))
    }
}

#[derive(Debug, Clone)]
pub struct ObjectGenerator {
    pub(crate) properties: BTreeMap<String, Generator>,
    pub(crate) required: BTreeSet<String>,
    pub(crate) freeform: bool,
    pub(crate) max_properties: Option<u64>,
    /// Bounds on randomly keyed extra pairs, already clamped against
    /// `minProperties`/`maxProperties` and the global additions cap.
    pub(crate) min_extra: u64,
    pub(crate) max_extra: u64,
    pub(crate) min_properties: u64,
}

impl ObjectGenerator {
    pub fn new(
        properties: BTreeMap<String, Generator>,
        c: &ObjectConstraints,
    ) -> Result<Self, GeneratorError> {
        // Freeform is judged against the generators actually attached, not
        // the constraint struct's own property map (callers may build the
        // two separately).
        let freeform = c.additional_properties || properties.is_empty();
        let required = c.required_properties.clone();
        let n_required = required.len() as u64;
        let min_properties = c.min_properties.unwrap_or(0);

        if let (Some(min), Some(max)) = (c.min_properties, c.max_properties) {
            if min > max {
                return Err(GeneratorError::Unsatisfiable(format!(
                    "maxProperties {max} below minProperties {min}"
                )));
            }
        }
        if !freeform && min_properties > properties.len() as u64 {
            return Err(GeneratorError::Unsatisfiable(format!(
                "minProperties {min_properties} exceeds the {} declared properties",
                properties.len()
            )));
        }

        let min_extra = min_properties.saturating_sub(n_required);
        let max_extra = match c.max_properties {
            Some(max) => max.saturating_sub(n_required).min(MAX_ADDITIONAL_PROPERTIES),
            None => MAX_ADDITIONAL_PROPERTIES,
        };
        // minProperties always wins when the two collide.
        let max_extra = max_extra.max(min_extra);

        Ok(Self {
            properties,
            required,
            freeform,
            max_properties: c.max_properties,
            min_extra,
            max_extra,
            min_properties,
        })
    }

    pub(crate) fn sample(&self, rng: &mut SmallRng) -> Result<Value, SampleError> {
        let mut out = Map::new();

        for (name, g) in &self.properties {
            if self.required.contains(name) || rng.gen_bool(0.5) {
                out.insert(name.clone(), g.sample(rng)?);
            }
        }
        // Coin flips may land under minProperties; force remaining optionals
        // in until the floor is met.
        if (out.len() as u64) < self.min_properties {
            for (name, g) in &self.properties {
                if out.len() as u64 >= self.min_properties {
                    break;
                }
                if !out.contains_key(name) {
                    out.insert(name.clone(), g.sample(rng)?);
                }
            }
        }

        if self.freeform {
            let extras = rng.gen_range(self.min_extra..=self.max_extra);
            for _ in 0..extras {
                if let Some(max) = self.max_properties {
                    if out.len() as u64 >= max {
                        break;
                    }
                }
                // Declared properties win collisions with random keys, so
                // redraw instead of overwriting.
                for _ in 0..32 {
                    let key_len = rng.gen_range(1..=10);
                    let key = random_alnum(rng, key_len);
                    if !out.contains_key(&key) {
                        out.insert(key, json_value(rng, 0));
                        break;
                    }
                }
            }
        }

        Ok(Value::Object(out))
    }
}

/// An arbitrary JSON value for freeform slots. Depth-limited so that nested
/// containers cannot recurse without bound.
pub fn json_value(rng: &mut SmallRng, depth: u32) -> Value {
    let scalar_only = depth >= MAX_JSON_DEPTH;
    let choice = if scalar_only {
        rng.gen_range(0..5)
    } else {
        rng.gen_range(0..7)
    };
    match choice {
        0 => Value::Null,
        1 => Value::Bool(rng.gen_bool(0.5)),
        2 => json!(rng.gen_range(-1000..=1000)),
        3 => json!(rng.gen_range(-1000.0..=1000.0)),
        4 => {
            let len = rng.gen_range(0..=12);
            Value::String(random_alnum(rng, len))
        }
        5 => {
            let len = rng.gen_range(0..=3);
            Value::Array((0..len).map(|_| json_value(rng, depth + 1)).collect())
        }
        _ => {
            let len = rng.gen_range(0..=3);
            let mut map = Map::new();
            for _ in 0..len {
                let key_len = rng.gen_range(1..=8);
                map.insert(random_alnum(rng, key_len), json_value(rng, depth + 1));
            }
            Value::Object(map)
        }
    }
}
