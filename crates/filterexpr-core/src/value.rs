//! Structured values that expressions are evaluated against.
//!
//! A [`Value`] is a tagged union of scalars, lists and maps. Field references in
//! an expression are parsed into an [`AttributePath`] and resolved with
//! [`Value::resolve`], which returns `None` for an absent field. A present
//! `null` is [`Value::Null`], not absence.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A structured value: the target object of an evaluation, or anything
/// reachable from it.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    /// Explicit null.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(Number),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence.
    List(Vec<Value>),
    /// String-keyed mapping.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the name of this value's type, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Extracts the string value, if present.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Renders a scalar the way it would be written as a bare literal.
    ///
    /// Lists and maps have no literal form and return `None`.
    #[must_use]
    pub fn to_literal(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => Some(Cow::Borrowed("null")),
            Self::Bool(true) => Some(Cow::Borrowed("true")),
            Self::Bool(false) => Some(Cow::Borrowed("false")),
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::String(s) => Some(Cow::Borrowed(s)),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Resolves a parsed path against this value.
    #[must_use]
    pub fn resolve(&self, path: &AttributePath) -> Option<&Value> {
        path.elements
            .iter()
            .try_fold(self, |current, element| match (current, element) {
                (Self::Map(map), PathElement::Attribute(name)) => map.get(name),
                (Self::Map(map), PathElement::Index(idx)) => map.get(&idx.to_string()),
                (Self::List(list), PathElement::Index(idx)) => list.get(*idx),
                (Self::List(list), PathElement::Attribute(name)) => {
                    name.parse::<usize>().ok().and_then(|idx| list.get(idx))
                }
                _ => None,
            })
    }

    /// Parses `path` and resolves it; `None` if the path is malformed or absent.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        AttributePath::parse(path).and_then(|p| self.resolve(&p))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(Number::from(&n)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(Number::I64(n)) => Self::from(n),
            Value::Number(Number::U64(n)) => Self::from(n),
            Value::Number(Number::F64(n)) => {
                serde_json::Number::from_f64(n).map_or(Self::Null, Self::Number)
            }
            Value::String(s) => Self::String(s),
            Value::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Map(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Self::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, u32, u64, usize, f64);

/// Numeric value preserving integer precision where possible.
///
/// Comparisons between different variants fall back to `f64`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Parses a literal as a number. Non-finite floats are rejected.
    #[must_use]
    pub fn parse(literal: &str) -> Option<Self> {
        let literal = literal.trim();
        if let Ok(n) = literal.parse::<i64>() {
            return Some(Self::I64(n));
        }
        if let Ok(n) = literal.parse::<u64>() {
            return Some(Self::U64(n));
        }
        literal
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Self::F64)
    }

    /// Converts the number to `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(self) -> f64 {
        match self {
            Self::I64(n) => n as f64,
            Self::U64(n) => n as f64,
            Self::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed variants.
    #[must_use]
    pub fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::I64(a), Self::I64(b)) => Some(a.cmp(&b)),
            (Self::U64(a), Self::U64(b)) => Some(a.cmp(&b)),
            (Self::I64(a), Self::U64(b)) => Some(
                u64::try_from(a).map_or(Ordering::Less, |a| a.cmp(&b)),
            ),
            (Self::U64(a), Self::I64(b)) => Some(
                u64::try_from(b).map_or(Ordering::Greater, |b| a.cmp(&b)),
            ),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.compare(*other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I64(n) => write!(f, "{n}"),
            Self::U64(n) => write!(f, "{n}"),
            Self::F64(n) => write!(f, "{n}"),
        }
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Self::I64(i)
        } else if let Some(u) = n.as_u64() {
            Self::U64(u)
        } else {
            Self::F64(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Self::I64(i64::from(n))
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::I64(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Self::U64(u64::from(n))
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Self::U64(n)
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Self::U64(n as u64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Self::F64(n)
    }
}

/// A parsed field reference such as `info.rating` or `items[0].name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePath {
    /// Path elements, outermost first.
    pub elements: Vec<PathElement>,
}

/// A single step of an [`AttributePath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathElement {
    /// Map key (or list position, when the key is numeric).
    Attribute(String),
    /// Bracketed list index: `[0]`.
    Index(usize),
}

impl AttributePath {
    /// Parses a dotted path with optional bracketed indexes.
    ///
    /// Returns `None` for empty segments, unclosed brackets, or non-numeric
    /// indexes.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let mut elements = Vec::new();
        let mut chars = path.chars().peekable();
        let mut expect_segment = true;

        while let Some(&c) = chars.peek() {
            match c {
                '.' => {
                    if expect_segment {
                        return None;
                    }
                    chars.next();
                    expect_segment = true;
                }
                '[' => {
                    if elements.is_empty() || expect_segment {
                        return None;
                    }
                    chars.next();
                    let mut digits = String::new();
                    loop {
                        match chars.next()? {
                            ']' => break,
                            d if d.is_ascii_digit() => digits.push(d),
                            _ => return None,
                        }
                    }
                    elements.push(PathElement::Index(digits.parse().ok()?));
                }
                ']' => return None,
                _ => {
                    if !expect_segment {
                        return None;
                    }
                    let mut name = String::new();
                    while let Some(&c) = chars.peek() {
                        if matches!(c, '.' | '[' | ']') {
                            break;
                        }
                        name.push(c);
                        chars.next();
                    }
                    elements.push(PathElement::Attribute(name));
                    expect_segment = false;
                }
            }
        }

        if expect_segment {
            return None;
        }
        Some(Self { elements })
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, elem) in self.elements.iter().enumerate() {
            match elem {
                PathElement::Attribute(name) if i == 0 => f.write_str(name)?,
                PathElement::Attribute(name) => write!(f, ".{name}")?,
                PathElement::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}
