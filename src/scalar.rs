//! Leaf values of a pathified blob and the string→number coercion applied to them.
use once_cell::sync::Lazy;
use ordered_float::OrderedFloat;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// A normalized scalar leaf. Serializes as the plain JSON scalar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(OrderedFloat<f64>),
    String(String),
}

/// What a path maps to in `values`: a single scalar, or the scalar elements
/// of an array in document order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

/// Whole-string decimal numeral: sign, digits, optional fraction, optional exponent.
static NUMERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").expect("numeral pattern compiles")
});

static INTEGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?\d+$").expect("integer pattern compiles")
});

/// Normalize a scalar JSON node. Numeric-looking strings become numbers;
/// returns `None` for null, arrays and objects.
pub fn normalize_value(v: &Value) -> Option<Scalar> {
    match v {
        Value::Bool(b) => Some(Scalar::Bool(*b)),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => Scalar::Integer(i),
            None => Scalar::Float(OrderedFloat(n.as_f64().unwrap_or(f64::NAN))),
        }),
        Value::String(s) => Some(normalize_str(s)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn normalize_str(s: &str) -> Scalar {
    let t = s.trim();
    if !NUMERAL.is_match(t) {
        return Scalar::String(s.to_string());
    }
    if INTEGER.is_match(t) {
        if let Ok(i) = t.parse::<i64>() {
            return Scalar::Integer(i);
        }
    }
    // numerals past f64 range stay text; infinity has no JSON form
    match t.parse::<f64>() {
        Ok(f) if f.is_finite() => Scalar::Float(OrderedFloat(f)),
        _ => Scalar::String(s.to_string()),
    }
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self { Scalar::String(s) => Some(s), _ => None }
    }
    pub fn as_i64(&self) -> Option<i64> {
        match self { Scalar::Integer(i) => Some(*i), _ => None }
    }
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(*i as f64),
            Scalar::Float(f) => Some(f.0),
            _ => None,
        }
    }
}

impl PathValue {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self { PathValue::Scalar(s) => Some(s), PathValue::List(_) => None }
    }
    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self { PathValue::List(xs) => Some(xs), PathValue::Scalar(_) => None }
    }
}

impl From<&str> for Scalar { fn from(s: &str) -> Self { Scalar::String(s.to_string()) } }
impl From<String> for Scalar { fn from(s: String) -> Self { Scalar::String(s) } }
impl From<i64> for Scalar { fn from(i: i64) -> Self { Scalar::Integer(i) } }
impl From<f64> for Scalar { fn from(f: f64) -> Self { Scalar::Float(OrderedFloat(f)) } }
impl From<bool> for Scalar { fn from(b: bool) -> Self { Scalar::Bool(b) } }

impl From<Scalar> for PathValue { fn from(s: Scalar) -> Self { PathValue::Scalar(s) } }
impl From<&str> for PathValue { fn from(s: &str) -> Self { PathValue::Scalar(s.into()) } }
impl From<i64> for PathValue { fn from(i: i64) -> Self { PathValue::Scalar(i.into()) } }
impl From<f64> for PathValue { fn from(f: f64) -> Self { PathValue::Scalar(f.into()) } }
impl From<bool> for PathValue { fn from(b: bool) -> Self { PathValue::Scalar(b.into()) } }

impl From<Vec<Scalar>> for PathValue {
    fn from(xs: Vec<Scalar>) -> Self { PathValue::List(xs) }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{}", x.0),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
