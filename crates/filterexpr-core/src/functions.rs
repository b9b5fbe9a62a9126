//! Default expression functions.

use crate::context::ExpressionContext;
use crate::error::{ExpressionError, Result};
use crate::registry::{ExpressionFunction, FunctionRegistry};
use crate::value::{Number, Value};

/// Register every default function into `registry`.
pub fn register_defaults(registry: &mut FunctionRegistry) {
    registry.register("LEN", Len);
}

/// `LEN(arg)`: length of a quoted literal or of the value at a field path.
///
/// Strings count characters, lists and maps count elements, other scalars
/// count the characters of their literal form. Null and absent fields have
/// length zero.
#[derive(Debug, Clone, Copy)]
pub struct Len;

impl ExpressionFunction for Len {
    fn evaluate(&self, ctx: &ExpressionContext<'_>, args: &[&str]) -> Result<Value> {
        let [arg] = args else {
            return Err(ExpressionError::InvalidFunctionArgument {
                function: "LEN".to_owned(),
            });
        };

        let len = match ctx.resolve_argument(arg) {
            None | Some(Value::Null) => 0,
            Some(Value::String(s)) => s.chars().count(),
            Some(Value::List(items)) => items.len(),
            Some(Value::Map(map)) => map.len(),
            Some(other) => other.to_literal().map_or(0, |s| s.chars().count()),
        };
        Ok(Value::Number(Number::from(len)))
    }
}
