//! Scalar generators: numbers, strings, dates, identifiers, binary payloads
//!
//! Each generator validates its constraints once, at construction, and bakes
//! them into an immutable sampling plan. The numeric bound math follows the
//! Swagger semantics exactly: exclusive bounds shrink the inclusive range,
//! `multipleOf` scales the range so a plain integer multiplier can be drawn
//! and multiplied back out.

use rand::Rng;
use rand::rngs::SmallRng;
use serde_json::{Value, json};

use super::GeneratorError;
use crate::schema::{NumericConstraints, StringConstraints};

/// Fallback half-range when a numeric schema leaves a bound open.
const DEFAULT_BOUND: i64 = 1000;
const DEFAULT_FLOAT_BOUND: f64 = 1000.0;

/// Extra length allowed above `minLength` when a string schema gives no
/// `maxLength`.
const DEFAULT_LENGTH_SLACK: u64 = 20;

/// Hard cap on generated string length (guards absurd maxLength values).
const MAX_STRING_LEN: u64 = 10_000;

/// Retries for the exclusive-bound filter on uniform float sampling.
const FLOAT_FILTER_RETRIES: u32 = 64;

const TEXT_CHARS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 _-.~!#$&'()*+,/:;=?@[]\r\n\t";
const ALNUM_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const BASE64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

pub(crate) fn sample_bool(rng: &mut SmallRng) -> bool {
    rng.gen_bool(0.5)
}

pub(crate) fn random_alnum(rng: &mut SmallRng, len: usize) -> String {
    (0..len)
        .map(|_| ALNUM_CHARS[rng.gen_range(0..ALNUM_CHARS.len())] as char)
        .collect()
}

/// Integer generator with the inclusive range pre-scaled by `multipleOf`.
///
/// Sampling draws a multiplier in `[lo, hi]` and multiplies it back out, so
/// every produced value is a multiple inside the original bounds.
#[derive(Debug, Clone)]
pub struct IntegerGenerator {
    pub(crate) lo: i64,
    pub(crate) hi: i64,
    pub(crate) factor: i64,
}

impl IntegerGenerator {
    pub fn from_constraints(c: &NumericConstraints) -> Result<Self, GeneratorError> {
        check_exclusive_bounds(c)?;

        let factor = match c.multiple_of {
            Some(m) => {
                if m.trunc() < 1.0 {
                    return Err(GeneratorError::InvalidMultipleOf(m));
                }
                m.trunc() as i64
            }
            None => 1,
        };

        // Bounds may arrive as floats; round inward (floor the max, ceil the
        // min) after the exclusivity adjustment, then floor/ceil-divide into
        // multiplier space. Truncation would let a maximum of -2.5 admit -2.
        let hi = match c.maximum {
            Some(mx) => {
                let inclusive = (if c.exclusive_maximum { mx - 1.0 } else { mx }).floor() as i64;
                (inclusive as f64 / factor as f64).floor() as i64
            }
            None => DEFAULT_BOUND,
        };
        let lo = match c.minimum {
            Some(mn) => {
                let inclusive = (if c.exclusive_minimum { mn + 1.0 } else { mn }).ceil() as i64;
                (inclusive as f64 / factor as f64).ceil() as i64
            }
            None => -DEFAULT_BOUND,
        };

        if lo > hi {
            return Err(GeneratorError::Unsatisfiable(format!(
                "integer multiplier range [{lo}, {hi}] is empty"
            )));
        }

        Ok(Self { lo, hi, factor })
    }

    pub(crate) fn sample(&self, rng: &mut SmallRng) -> Value {
        Value::Number((rng.gen_range(self.lo..=self.hi) * self.factor).into())
    }

    /// The in-range value closest to zero, used as the shrink target.
    pub(crate) fn shrink_target(&self) -> i64 {
        self.lo.max(0).min(self.hi) * self.factor
    }
}

#[derive(Debug, Clone)]
pub(crate) enum FloatMode {
    /// Uniform draw over `[lo, hi]`, exclusivity enforced by retry filter.
    Uniform { lo: f64, hi: f64 },
    /// Integer multiplier in `[lo, hi]`, multiplied back by `factor`.
    /// Boundary multipliers violating a strict inequality are already
    /// trimmed off, so no runtime filter is needed.
    Multiple { factor: f64, lo: i64, hi: i64 },
}

/// Float generator. With `multipleOf` the sampled value is an exact integer
/// multiple; otherwise a uniform draw filtered against exclusive bounds.
#[derive(Debug, Clone)]
pub struct FloatGenerator {
    pub(crate) mode: FloatMode,
    pub(crate) minimum: Option<f64>,
    pub(crate) maximum: Option<f64>,
    pub(crate) exclusive_minimum: bool,
    pub(crate) exclusive_maximum: bool,
}

impl FloatGenerator {
    pub fn from_constraints(c: &NumericConstraints) -> Result<Self, GeneratorError> {
        check_exclusive_bounds(c)?;

        let mode = match c.multiple_of {
            Some(m) => {
                if m <= 0.0 {
                    return Err(GeneratorError::InvalidMultipleOf(m));
                }
                let mut hi = match c.maximum {
                    Some(mx) => (mx / m).floor() as i64,
                    None => DEFAULT_BOUND,
                };
                let mut lo = match c.minimum {
                    Some(mn) => (mn / m).ceil() as i64,
                    None => -DEFAULT_BOUND,
                };
                // An exact boundary multiple is the only multiplier a strict
                // inequality can reject; drop it up front instead of
                // filtering at sample time.
                if let Some(mx) = c.maximum {
                    if c.exclusive_maximum && hi as f64 * m >= mx {
                        hi -= 1;
                    }
                }
                if let Some(mn) = c.minimum {
                    if c.exclusive_minimum && lo as f64 * m <= mn {
                        lo += 1;
                    }
                }
                if lo > hi {
                    return Err(GeneratorError::Unsatisfiable(format!(
                        "float multiplier range [{lo}, {hi}] is empty"
                    )));
                }
                FloatMode::Multiple { factor: m, lo, hi }
            }
            None => {
                let lo = c.minimum.unwrap_or(-DEFAULT_FLOAT_BOUND);
                let hi = c.maximum.unwrap_or(DEFAULT_FLOAT_BOUND);
                if lo > hi || (lo == hi && (c.exclusive_minimum || c.exclusive_maximum)) {
                    return Err(GeneratorError::Unsatisfiable(format!(
                        "float range [{lo}, {hi}] admits no value"
                    )));
                }
                FloatMode::Uniform { lo, hi }
            }
        };

        Ok(Self {
            mode,
            minimum: c.minimum,
            maximum: c.maximum,
            exclusive_minimum: c.exclusive_minimum,
            exclusive_maximum: c.exclusive_maximum,
        })
    }

    fn within_strict_bounds(&self, v: f64) -> bool {
        if self.exclusive_maximum {
            if let Some(mx) = self.maximum {
                if v >= mx {
                    return false;
                }
            }
        }
        if self.exclusive_minimum {
            if let Some(mn) = self.minimum {
                if v <= mn {
                    return false;
                }
            }
        }
        true
    }

    pub(crate) fn sample(&self, rng: &mut SmallRng) -> Value {
        match self.mode {
            FloatMode::Multiple { factor, lo, hi } => {
                json!(rng.gen_range(lo..=hi) as f64 * factor)
            }
            FloatMode::Uniform { lo, hi } => {
                for _ in 0..FLOAT_FILTER_RETRIES {
                    let v = rng.gen_range(lo..=hi);
                    if self.within_strict_bounds(v) {
                        return json!(v);
                    }
                }
                // Uniform draws essentially never hit an exact bound; the
                // midpoint is a safe last resort for a non-empty open range.
                json!((lo + hi) / 2.0)
            }
        }
    }
}

/// Location-derived specialization of string generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringVariant {
    Plain,
    /// Path parameters: at least one character, percent-encoded on use.
    UrlPath,
    /// Header values: no CR/LF, surrounding whitespace trimmed.
    HttpHeader,
}

#[derive(Debug, Clone)]
pub struct StringGenerator {
    pub(crate) variant: StringVariant,
    pub(crate) min_length: u64,
    pub(crate) max_length: u64,
}

impl StringGenerator {
    pub fn from_constraints(
        c: &StringConstraints,
        variant: StringVariant,
    ) -> Result<Self, GeneratorError> {
        let min_length = match variant {
            StringVariant::UrlPath => {
                let min = c.min_length.unwrap_or(1);
                if min < 1 {
                    return Err(GeneratorError::PathMinLength(min));
                }
                min
            }
            _ => c.min_length.unwrap_or(0),
        };
        // The cap guards absurd open-ended lengths, never a declared bound.
        let cap = MAX_STRING_LEN.max(min_length);
        let max_length = c
            .max_length
            .unwrap_or(min_length + DEFAULT_LENGTH_SLACK)
            .min(cap);

        if max_length < min_length {
            return Err(GeneratorError::Unsatisfiable(format!(
                "maxLength {max_length} below minLength {min_length}"
            )));
        }

        Ok(Self {
            variant,
            min_length,
            max_length,
        })
    }

    pub(crate) fn sample(&self, rng: &mut SmallRng) -> Value {
        let len = rng.gen_range(self.min_length..=self.max_length) as usize;
        let deny_crlf = self.variant == StringVariant::HttpHeader;
        let mut text: String = (0..len)
            .map(|_| loop {
                let c = TEXT_CHARS[rng.gen_range(0..TEXT_CHARS.len())] as char;
                if !(deny_crlf && (c == '\r' || c == '\n')) {
                    break c;
                }
            })
            .collect();
        if self.variant == StringVariant::HttpHeader {
            text = text.trim().to_string();
        }
        Value::String(text)
    }
}

/// Uniform draw from a fixed value set. Wins over all other string
/// constraints when the schema declares an `enum`.
#[derive(Debug, Clone)]
pub struct EnumGenerator {
    pub(crate) values: Vec<Value>,
}

impl EnumGenerator {
    pub fn from_values(values: Vec<Value>) -> Result<Self, GeneratorError> {
        if values.is_empty() {
            return Err(GeneratorError::EmptyEnum);
        }
        Ok(Self { values })
    }

    pub(crate) fn sample(&self, rng: &mut SmallRng) -> Value {
        self.values[rng.gen_range(0..self.values.len())].clone()
    }
}

/// Base64-shaped binary payload (`format: byte`): whole 4-character groups.
#[derive(Debug, Clone, Default)]
pub struct BytesGenerator;

impl BytesGenerator {
    pub(crate) fn sample(&self, rng: &mut SmallRng) -> Value {
        let groups = rng.gen_range(0..=6);
        let text: String = (0..groups * 4)
            .map(|_| BASE64_CHARS[rng.gen_range(0..BASE64_CHARS.len())] as char)
            .collect();
        Value::String(text)
    }
}

pub(crate) fn sample_file_payload(rng: &mut SmallRng) -> String {
    let len = rng.gen_range(0..=64);
    random_alnum(rng, len)
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
    }
}

pub(crate) fn sample_date(rng: &mut SmallRng) -> String {
    let year = rng.gen_range(1900..=2099);
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=days_in_month(year, month));
    format!("{year:04}-{month:02}-{day:02}")
}

pub(crate) fn sample_datetime(rng: &mut SmallRng) -> String {
    let date = sample_date(rng);
    let hour = rng.gen_range(0..=23u32);
    let minute = rng.gen_range(0..=59u32);
    let second = rng.gen_range(0..=59u32);
    let micro = rng.gen_range(0..=999_999u32);
    format!("{date}T{hour:02}:{minute:02}:{second:02}.{micro:06}Z")
}

pub(crate) fn sample_uuid(rng: &mut SmallRng) -> String {
    format!(
        "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
        rng.r#gen::<u32>(),
        rng.r#gen::<u16>(),
        rng.r#gen::<u16>() & 0x0FFF,
        (rng.r#gen::<u16>() & 0x3FFF) | 0x8000,
        rng.r#gen::<u64>() & 0xFFFF_FFFF_FFFF,
    )
}

fn check_exclusive_bounds(c: &NumericConstraints) -> Result<(), GeneratorError> {
    if c.exclusive_maximum && c.maximum.is_none() {
        return Err(GeneratorError::ExclusiveWithoutBound { bound: "maximum" });
    }
    if c.exclusive_minimum && c.minimum.is_none() {
        return Err(GeneratorError::ExclusiveWithoutBound { bound: "minimum" });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn numeric(
        minimum: Option<f64>,
        maximum: Option<f64>,
        exclusive_minimum: bool,
        exclusive_maximum: bool,
        multiple_of: Option<f64>,
    ) -> NumericConstraints {
        NumericConstraints {
            maximum,
            exclusive_maximum,
            minimum,
            exclusive_minimum,
            multiple_of,
        }
    }

    #[test]
    fn integer_within_inclusive_bounds() {
        let g =
            IntegerGenerator::from_constraints(&numeric(Some(10.0), Some(20.0), false, false, None))
                .unwrap();
        let mut r = rng();
        for _ in 0..200 {
            let v = g.sample(&mut r).as_i64().unwrap();
            assert!((10..=20).contains(&v));
        }
    }

    #[test]
    fn integer_exclusive_bounds_shrink_range() {
        // minimum=0, exclusiveMaximum=3: only 0, 1, 2 are legal.
        let g =
            IntegerGenerator::from_constraints(&numeric(Some(0.0), Some(3.0), false, true, None))
                .unwrap();
        let mut r = rng();
        let mut seen_zero = false;
        for _ in 0..1000 {
            let v = g.sample(&mut r).as_i64().unwrap();
            assert!(v < 3, "exclusive maximum produced {v}");
            assert!(v >= 0);
            seen_zero |= v == 0;
        }
        assert!(seen_zero, "0 never drawn from a 3-value range in 1000 tries");
    }

    #[test]
    fn integer_fractional_bounds_round_inward() {
        // maximum=-2.5 admits -3 at most; truncation toward zero would let
        // -2 slip past the bound. Symmetric on the minimum side.
        let g = IntegerGenerator::from_constraints(&numeric(
            Some(-10.5),
            Some(-2.5),
            false,
            false,
            None,
        ))
        .unwrap();
        assert_eq!((g.lo, g.hi), (-10, -3));
        let mut r = rng();
        for _ in 0..1000 {
            let v = g.sample(&mut r).as_i64().unwrap();
            assert!((-10..=-3).contains(&v), "fractional bound violated by {v}");
        }

        let g = IntegerGenerator::from_constraints(&numeric(
            Some(2.5),
            Some(9.5),
            false,
            false,
            None,
        ))
        .unwrap();
        assert_eq!((g.lo, g.hi), (3, 9));
    }

    #[test]
    fn integer_multiple_of_lands_on_multiples() {
        let g = IntegerGenerator::from_constraints(&numeric(
            Some(5.0),
            Some(100.0),
            false,
            false,
            Some(7.0),
        ))
        .unwrap();
        let mut r = rng();
        for _ in 0..200 {
            let v = g.sample(&mut r).as_i64().unwrap();
            assert_eq!(v % 7, 0);
            assert!((5..=100).contains(&v));
        }
    }

    #[test]
    fn integer_exclusive_without_bound_rejected() {
        let err = IntegerGenerator::from_constraints(&numeric(None, None, false, true, None))
            .unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::ExclusiveWithoutBound { bound: "maximum" }
        ));
        let err =
            IntegerGenerator::from_constraints(&numeric(None, Some(5.0), true, false, None))
                .unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::ExclusiveWithoutBound { bound: "minimum" }
        ));
    }

    #[test]
    fn construction_is_deterministic() {
        let c = numeric(Some(3.0), Some(90.0), false, true, Some(3.0));
        let a = IntegerGenerator::from_constraints(&c).unwrap();
        let b = IntegerGenerator::from_constraints(&c).unwrap();
        assert_eq!((a.lo, a.hi, a.factor), (b.lo, b.hi, b.factor));
    }

    #[test]
    fn integer_empty_range_rejected() {
        let err = IntegerGenerator::from_constraints(&numeric(
            Some(8.0),
            Some(12.0),
            false,
            false,
            Some(20.0),
        ))
        .unwrap_err();
        assert!(matches!(err, GeneratorError::Unsatisfiable(_)));
    }

    #[test]
    fn float_multiple_of_stays_on_grid() {
        let g = FloatGenerator::from_constraints(&numeric(
            Some(0.0),
            Some(10.0),
            false,
            false,
            Some(0.5),
        ))
        .unwrap();
        let mut r = rng();
        for _ in 0..200 {
            let v = g.sample(&mut r).as_f64().unwrap();
            let k = v / 0.5;
            assert!((k - k.round()).abs() < 1e-9, "{v} is not a multiple of 0.5");
            assert!((0.0..=10.0).contains(&v));
        }
    }

    #[test]
    fn float_exclusive_bound_excludes_boundary_multiple() {
        // Multiples of 2 in (0, 10): 2, 4, 6, 8. Never 0 or 10.
        let g = FloatGenerator::from_constraints(&numeric(
            Some(0.0),
            Some(10.0),
            true,
            true,
            Some(2.0),
        ))
        .unwrap();
        let mut r = rng();
        for _ in 0..500 {
            let v = g.sample(&mut r).as_f64().unwrap();
            assert!(v > 0.0 && v < 10.0, "strict bounds violated by {v}");
        }
    }

    #[test]
    fn float_uniform_respects_exclusive_bounds() {
        let g =
            FloatGenerator::from_constraints(&numeric(Some(1.0), Some(2.0), true, true, None))
                .unwrap();
        let mut r = rng();
        for _ in 0..500 {
            let v = g.sample(&mut r).as_f64().unwrap();
            assert!(v > 1.0 && v < 2.0);
        }
    }

    #[test]
    fn float_point_range_with_exclusivity_rejected() {
        let err =
            FloatGenerator::from_constraints(&numeric(Some(3.0), Some(3.0), false, true, None))
                .unwrap_err();
        assert!(matches!(err, GeneratorError::Unsatisfiable(_)));
    }

    #[test]
    fn string_length_bounds() {
        let c = StringConstraints {
            min_length: Some(5),
            max_length: Some(10),
            ..Default::default()
        };
        let g = StringGenerator::from_constraints(&c, StringVariant::Plain).unwrap();
        let mut r = rng();
        for _ in 0..100 {
            let v = g.sample(&mut r);
            let len = v.as_str().unwrap().chars().count();
            assert!((5..=10).contains(&len));
        }
    }

    #[test]
    fn path_string_defaults_to_nonempty() {
        let g = StringGenerator::from_constraints(&StringConstraints::default(), StringVariant::UrlPath)
            .unwrap();
        assert_eq!(g.min_length, 1);
        let mut r = rng();
        for _ in 0..100 {
            assert!(!g.sample(&mut r).as_str().unwrap().is_empty());
        }
    }

    #[test]
    fn path_string_rejects_zero_min_length() {
        let c = StringConstraints {
            min_length: Some(0),
            ..Default::default()
        };
        let err = StringGenerator::from_constraints(&c, StringVariant::UrlPath).unwrap_err();
        assert!(matches!(err, GeneratorError::PathMinLength(0)));
    }

    #[test]
    fn header_string_has_no_crlf_and_is_trimmed() {
        let g = StringGenerator::from_constraints(
            &StringConstraints::default(),
            StringVariant::HttpHeader,
        )
        .unwrap();
        let mut r = rng();
        for _ in 0..300 {
            let v = g.sample(&mut r);
            let s = v.as_str().unwrap();
            assert!(!s.contains('\r') && !s.contains('\n'), "CR/LF in header value");
            assert_eq!(s, s.trim());
        }
    }

    #[test]
    fn enum_membership() {
        let values = vec![json!("a"), json!("b"), json!("c")];
        let g = EnumGenerator::from_values(values.clone()).unwrap();
        let mut r = rng();
        for _ in 0..50 {
            assert!(values.contains(&g.sample(&mut r)));
        }
    }

    #[test]
    fn empty_enum_rejected() {
        assert!(matches!(
            EnumGenerator::from_values(vec![]),
            Err(GeneratorError::EmptyEnum)
        ));
    }

    #[test]
    fn bytes_are_whole_base64_groups() {
        let g = BytesGenerator;
        let mut r = rng();
        for _ in 0..50 {
            let v = g.sample(&mut r);
            let s = v.as_str().unwrap();
            assert_eq!(s.len() % 4, 0);
            assert!(s.bytes().all(|b| BASE64_CHARS.contains(&b)));
        }
    }

    #[test]
    fn dates_are_valid_calendar_days() {
        let mut r = rng();
        for _ in 0..300 {
            let s = sample_date(&mut r);
            let parts: Vec<u32> = s.split('-').map(|p| p.parse().unwrap()).collect();
            let (y, m, d) = (parts[0], parts[1], parts[2]);
            assert!((1..=12).contains(&m));
            assert!(d >= 1 && d <= days_in_month(y, m), "bad day in {s}");
        }
    }

    #[test]
    fn leap_day_only_in_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
    }

    #[test]
    fn datetime_shape() {
        let mut r = rng();
        let s = sample_datetime(&mut r);
        assert_eq!(s.len(), "2024-01-15T12:00:00.123456Z".len());
        assert!(s.ends_with('Z'));
        assert!(s.contains('T'));
    }

    #[test]
    fn uuid_shape() {
        let mut r = rng();
        for _ in 0..20 {
            let s = sample_uuid(&mut r);
            assert_eq!(s.len(), 36);
            let parts: Vec<&str> = s.split('-').collect();
            assert_eq!(parts.len(), 5);
            assert!(parts[2].starts_with('4'), "not a v4 UUID: {s}");
        }
    }

    proptest! {
        // The multipleOf/exclusive-bound conversion is the subtle part of the
        // numeric contract; exercise it over arbitrary satisfiable inputs.
        #[test]
        fn integer_multiple_of_conversion_holds(
            min in -10_000i64..10_000,
            span in 0i64..5_000,
            m in 1i64..50,
            excl_min in any::<bool>(),
            excl_max in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let max = min + span;
            let c = numeric(
                Some(min as f64),
                Some(max as f64),
                excl_min,
                excl_max,
                Some(m as f64),
            );
            if let Ok(g) = IntegerGenerator::from_constraints(&c) {
                let mut r = SmallRng::seed_from_u64(seed);
                for _ in 0..20 {
                    let v = g.sample(&mut r).as_i64().unwrap();
                    prop_assert_eq!(v % m, 0);
                    if excl_min { prop_assert!(v > min); } else { prop_assert!(v >= min); }
                    if excl_max { prop_assert!(v < max); } else { prop_assert!(v <= max); }
                }
            }
        }

        #[test]
        fn float_multiple_of_conversion_holds(
            min in -1_000i32..1_000,
            span in 1i32..500,
            m in prop::sample::select(vec![0.25f64, 0.5, 1.0, 2.0, 2.5, 10.0]),
            excl_min in any::<bool>(),
            excl_max in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let (min, max) = (f64::from(min), f64::from(min + span));
            let c = numeric(Some(min), Some(max), excl_min, excl_max, Some(m));
            if let Ok(g) = FloatGenerator::from_constraints(&c) {
                let mut r = SmallRng::seed_from_u64(seed);
                for _ in 0..20 {
                    let v = g.sample(&mut r).as_f64().unwrap();
                    let k = v / m;
                    prop_assert!((k - k.round()).abs() < 1e-9);
                    if excl_min { prop_assert!(v > min); } else { prop_assert!(v >= min); }
                    if excl_max { prop_assert!(v < max); } else { prop_assert!(v <= max); }
                }
            }
        }
    }
}
