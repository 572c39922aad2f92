//! Counterexample shrinking.
//!
//! Given a generator and a value it produced that triggered a failure, emit
//! candidate replacement values that are strictly simpler yet still satisfy
//! the generator's constraints. Numbers shrink toward the in-range value
//! closest to zero by repeated halving; containers shed elements toward
//! their length floor; strings truncate. The caller re-runs the failing
//! check against each candidate and greedily adopts the first one that
//! still fails, so the ordering here is simplest-first.

use serde_json::{Map, Value, json};

use super::primitives::FloatMode;
use super::{Generator, StringVariant};

/// Candidate simpler values for `value`, simplest first. Empty when the
/// value is already minimal or the generator kind has no meaningful order.
pub fn shrink_candidates(generator: &Generator, value: &Value) -> Vec<Value> {
    match (generator, value) {
        (Generator::Boolean, Value::Bool(true)) => vec![Value::Bool(false)],
        (Generator::Integer(g), Value::Number(n)) => {
            let Some(v) = n.as_i64() else { return vec![] };
            // Halve in multiplier space so every candidate stays on the
            // multipleOf grid, then scale back out.
            let k = v / g.factor;
            let k_target = g.shrink_target() / g.factor;
            halving_steps_i64(k, k_target)
                .into_iter()
                .map(|c| json!(c * g.factor))
                .collect()
        }
        (Generator::Float(g), Value::Number(n)) => {
            let Some(v) = n.as_f64() else { return vec![] };
            shrink_float(g, v)
        }
        (Generator::String(g), Value::String(s)) => {
            let mut out = Vec::new();
            for len in halving_steps_u64(s.chars().count() as u64, g.min_length) {
                let truncated: String = s.chars().take(len as usize).collect();
                let truncated = match g.variant {
                    StringVariant::HttpHeader => truncated.trim().to_string(),
                    _ => truncated,
                };
                if truncated.chars().count() as u64 >= g.min_length && truncated != *s {
                    out.push(Value::String(truncated));
                }
            }
            out
        }
        (Generator::Enum(g), v) => {
            // The first listed value is the canonical simplest one.
            let first = &g.values[0];
            if first != v {
                vec![first.clone()]
            } else {
                vec![]
            }
        }
        (Generator::Bytes(_), Value::String(s)) => {
            let groups = (s.len() / 4) as u64;
            halving_steps_u64(groups, 0)
                .into_iter()
                .map(|g| Value::String(s[..(g * 4) as usize].to_string()))
                .collect()
        }
        (Generator::Array(g), Value::Array(items)) => {
            let mut out = Vec::new();
            // Shorter arrays first.
            for len in halving_steps_u64(items.len() as u64, g.min_items) {
                out.push(Value::Array(items[..len as usize].to_vec()));
            }
            // Then element-wise shrinks at the original length.
            for (i, item) in items.iter().enumerate() {
                for candidate in shrink_candidates(&g.items, item) {
                    let mut next = items.to_vec();
                    next[i] = candidate;
                    if !g.unique_items || all_distinct(&next) {
                        out.push(Value::Array(next));
                    }
                }
            }
            out
        }
        (Generator::Object(g), Value::Object(map)) => {
            let mut out = Vec::new();
            // Drop droppable keys one at a time: anything not required, as
            // long as the floor holds.
            for key in map.keys() {
                if g.required.contains(key) || map.len() as u64 <= g.min_properties {
                    continue;
                }
                let mut next: Map<String, Value> = map.clone();
                next.remove(key);
                out.push(Value::Object(next));
            }
            // Shrink declared property values in place.
            for (key, prop_gen) in &g.properties {
                let Some(current) = map.get(key) else { continue };
                for candidate in shrink_candidates(prop_gen, current) {
                    let mut next = map.clone();
                    next.insert(key.clone(), candidate);
                    out.push(Value::Object(next));
                }
            }
            out
        }
        _ => vec![],
    }
}

fn shrink_float(g: &super::FloatGenerator, v: f64) -> Vec<Value> {
    let target = match g.mode {
        FloatMode::Uniform { lo, hi } => 0.0f64.clamp(lo, hi),
        FloatMode::Multiple { factor, lo, hi } => 0i64.clamp(lo, hi) as f64 * factor,
    };
    let strictly_ok = |c: f64| {
        (!g.exclusive_minimum || g.minimum.is_none_or(|mn| c > mn))
            && (!g.exclusive_maximum || g.maximum.is_none_or(|mx| c < mx))
    };

    let mut out = Vec::new();
    match g.mode {
        FloatMode::Multiple { factor, .. } => {
            let k = (v / factor).round() as i64;
            let k_target = (target / factor).round() as i64;
            for step in halving_steps_i64(k, k_target) {
                let c = step as f64 * factor;
                if strictly_ok(c) {
                    out.push(json!(c));
                }
            }
        }
        FloatMode::Uniform { .. } => {
            if strictly_ok(target) && target != v {
                out.push(json!(target));
            }
            let mut cur = v;
            for _ in 0..8 {
                cur = (cur + target) / 2.0;
                if cur == v || cur == target {
                    break;
                }
                if strictly_ok(cur) {
                    out.push(json!(cur));
                }
            }
        }
    }
    out
}

/// The halving sequence from `target` back toward `v`, excluding `v` itself.
/// Ordered simplest first: target, then values progressively closer to `v`.
fn halving_steps_i64(v: i64, target: i64) -> Vec<i64> {
    let mut out = Vec::new();
    let mut delta = v - target;
    while delta != 0 {
        let candidate = v - delta;
        if candidate != v && !out.contains(&candidate) {
            out.push(candidate);
        }
        delta /= 2;
    }
    out
}

fn halving_steps_u64(v: u64, floor: u64) -> Vec<u64> {
    if v <= floor {
        return Vec::new();
    }
    halving_steps_i64(v as i64, floor as i64)
        .into_iter()
        .map(|c| c as u64)
        .collect()
}

fn all_distinct(items: &[Value]) -> bool {
    for (i, a) in items.iter().enumerate() {
        if items[i + 1..].contains(a) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ArrayConstraints, NumericConstraints, StringConstraints};
    use serde_json::json;

    fn int_gen(lo: f64, hi: f64) -> Generator {
        let c = NumericConstraints {
            minimum: Some(lo),
            maximum: Some(hi),
            ..Default::default()
        };
        Generator::Integer(super::super::IntegerGenerator::from_constraints(&c).unwrap())
    }

    #[test]
    fn integer_shrinks_toward_zero_first() {
        let g = int_gen(-100.0, 100.0);
        let candidates = shrink_candidates(&g, &json!(96));
        assert_eq!(candidates[0], json!(0));
        for c in &candidates {
            let v = c.as_i64().unwrap();
            assert!((-100..=100).contains(&v));
            assert!(v.abs() < 96);
        }
    }

    #[test]
    fn integer_respects_positive_floor() {
        let g = int_gen(10.0, 100.0);
        let candidates = shrink_candidates(&g, &json!(80));
        assert_eq!(candidates[0], json!(10));
        for c in &candidates {
            assert!(c.as_i64().unwrap() >= 10);
        }
    }

    #[test]
    fn integer_shrink_stays_on_the_multiple_grid() {
        let c = NumericConstraints {
            minimum: Some(0.0),
            maximum: Some(70.0),
            multiple_of: Some(7.0),
            ..Default::default()
        };
        let g =
            Generator::Integer(super::super::IntegerGenerator::from_constraints(&c).unwrap());
        let candidates = shrink_candidates(&g, &json!(70));
        assert_eq!(candidates[0], json!(0));
        for c in &candidates {
            let v = c.as_i64().unwrap();
            assert_eq!(v % 7, 0, "candidate {v} left the multipleOf grid");
            assert!((0..=70).contains(&v));
            assert!(v < 70);
        }
    }

    #[test]
    fn minimal_integer_has_no_candidates() {
        let g = int_gen(0.0, 100.0);
        assert!(shrink_candidates(&g, &json!(0)).is_empty());
    }

    #[test]
    fn string_truncates_toward_min_length() {
        let c = StringConstraints {
            min_length: Some(2),
            ..Default::default()
        };
        let g = Generator::String(
            super::super::StringGenerator::from_constraints(&c, StringVariant::Plain).unwrap(),
        );
        let candidates = shrink_candidates(&g, &json!("abcdefgh"));
        assert_eq!(candidates[0], json!("ab"));
        for c in &candidates {
            let s = c.as_str().unwrap();
            assert!(s.len() >= 2 && s.len() < 8);
            assert!("abcdefgh".starts_with(s));
        }
    }

    #[test]
    fn array_sheds_elements_and_shrinks_members() {
        let c = ArrayConstraints {
            min_items: Some(1),
            max_items: Some(5),
            ..Default::default()
        };
        let g = Generator::Array(
            super::super::ArrayGenerator::new(int_gen(0.0, 100.0), &c).unwrap(),
        );
        let candidates = shrink_candidates(&g, &json!([50, 60, 70]));
        assert_eq!(candidates[0], json!([50]));
        assert!(candidates.contains(&json!([0, 60, 70])));
        for c in &candidates {
            assert!(!c.as_array().unwrap().is_empty());
        }
    }

    #[test]
    fn enum_shrinks_to_first_value() {
        let g = Generator::Enum(
            super::super::EnumGenerator::from_values(vec![json!("a"), json!("b")]).unwrap(),
        );
        assert_eq!(shrink_candidates(&g, &json!("b")), vec![json!("a")]);
        assert!(shrink_candidates(&g, &json!("a")).is_empty());
    }

    #[test]
    fn opaque_kinds_do_not_shrink() {
        assert!(shrink_candidates(&Generator::Uuid, &json!("x")).is_empty());
        assert!(shrink_candidates(&Generator::Date, &json!("2024-01-01")).is_empty());
    }
}
