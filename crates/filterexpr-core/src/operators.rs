//! Default comparison operators.
//!
//! | Operator | Meaning |
//! |----------|---------|
//! | `=`, `!=` | equality; numeric when both sides are numbers, otherwise exact text |
//! | `>`, `>=`, `<`, `<=` | ordering; numeric, or lexicographic for strings |
//! | `IS`, `IS NOT` | boolean identity against `TRUE`, `FALSE` or `NULL` |
//! | `IN`, `NOT IN` | membership in a comma-separated list |

use std::cmp::Ordering;

use crate::context::ExpressionContext;
use crate::error::{ExpressionError, Result};
use crate::registry::{Operator, OperatorRegistry};
use crate::value::{Number, Value};

/// Register every default operator into `registry`.
pub fn register_defaults(registry: &mut OperatorRegistry) {
    registry
        .register("=", Equals { negate: false })
        .register("!=", Equals { negate: true })
        .register(">", Ordered::new(&[Ordering::Greater]))
        .register(">=", Ordered::new(&[Ordering::Greater, Ordering::Equal]))
        .register("<", Ordered::new(&[Ordering::Less]))
        .register("<=", Ordered::new(&[Ordering::Less, Ordering::Equal]))
        .register("IS", Is { negate: false })
        .register("IS NOT", Is { negate: true })
        .register("IN", In { negate: false })
        .register("NOT IN", In { negate: true });
}

/// Equality between a resolved value and a literal.
///
/// Absent values, lists and maps never equal a literal.
#[must_use]
pub fn literal_equals(value: Option<&Value>, literal: &str) -> bool {
    match value {
        None | Some(Value::List(_) | Value::Map(_)) => false,
        Some(other) => match other.as_number() {
            Some(n) => Number::parse(literal).is_some_and(|lit| n == lit),
            None => other.to_literal().is_some_and(|v| v == literal),
        },
    }
}

/// Ordering between a resolved value and a literal, if the two are comparable.
#[must_use]
pub fn literal_ordering(value: Option<&Value>, literal: &str) -> Option<Ordering> {
    let value = value?;
    let lit_num = Number::parse(literal);
    if let Some(n) = value.as_number() {
        return n.compare(lit_num?);
    }
    let s = value.as_str()?;
    match (Number::parse(s), lit_num) {
        (Some(a), Some(b)) => a.compare(b),
        _ => Some(s.cmp(literal)),
    }
}

#[derive(Debug)]
struct Equals {
    negate: bool,
}

impl Operator for Equals {
    fn evaluate(
        &self,
        value: Option<&Value>,
        literal: &str,
        _tokens: &[&str],
        _ctx: &ExpressionContext<'_>,
    ) -> Result<bool> {
        let equal = literal_equals(value, literal);
        // An absent field is neither equal nor unequal.
        if self.negate && value.is_none() {
            return Ok(false);
        }
        Ok(equal != self.negate)
    }
}

#[derive(Debug)]
struct Ordered {
    accepted: Vec<Ordering>,
}

impl Ordered {
    fn new(accepted: &[Ordering]) -> Self {
        Self {
            accepted: accepted.to_vec(),
        }
    }
}

impl Operator for Ordered {
    fn evaluate(
        &self,
        value: Option<&Value>,
        literal: &str,
        _tokens: &[&str],
        _ctx: &ExpressionContext<'_>,
    ) -> Result<bool> {
        Ok(literal_ordering(value, literal).is_some_and(|ord| self.accepted.contains(&ord)))
    }
}

#[derive(Debug)]
struct Is {
    negate: bool,
}

impl Operator for Is {
    fn evaluate(
        &self,
        value: Option<&Value>,
        literal: &str,
        tokens: &[&str],
        _ctx: &ExpressionContext<'_>,
    ) -> Result<bool> {
        let flag = value.and_then(Value::as_bool);
        let matched = if literal.eq_ignore_ascii_case("true") {
            flag == Some(true)
        } else if literal.eq_ignore_ascii_case("false") {
            flag == Some(false)
        } else if literal.eq_ignore_ascii_case("null") {
            matches!(value, None | Some(Value::Null))
        } else {
            return Err(ExpressionError::InvalidOperand {
                operation: tokens.get(1).copied().unwrap_or("IS").to_owned(),
                message: format!("expected TRUE, FALSE or NULL, found {literal}"),
            });
        };
        Ok(matched != self.negate)
    }
}

#[derive(Debug)]
struct In {
    negate: bool,
}

impl Operator for In {
    fn evaluate(
        &self,
        value: Option<&Value>,
        literal: &str,
        _tokens: &[&str],
        _ctx: &ExpressionContext<'_>,
    ) -> Result<bool> {
        let found = literal
            .split(',')
            .map(str::trim)
            .any(|candidate| literal_equals(value, candidate));
        Ok(found != self.negate)
    }
}
