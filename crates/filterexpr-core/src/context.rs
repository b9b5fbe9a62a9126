//! Evaluation context shared by every leaf of one evaluation.

use crate::registry::{FunctionRegistry, OperatorRegistry};
use crate::value::Value;

/// Binds an expression to the object it is evaluated against and the
/// registries used to resolve its operators and functions.
///
/// A context is built fresh for each top-level evaluation and never mutated.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionContext<'a> {
    /// The full expression text being evaluated.
    pub expression: &'a str,
    /// The target object.
    pub object: &'a Value,
    /// Comparison operators available to leaf conditions.
    pub operators: &'a OperatorRegistry,
    /// Functions available to leaf conditions.
    pub functions: &'a FunctionRegistry,
}

impl<'a> ExpressionContext<'a> {
    /// Create a new context.
    #[must_use]
    pub fn new(
        expression: &'a str,
        object: &'a Value,
        operators: &'a OperatorRegistry,
        functions: &'a FunctionRegistry,
    ) -> Self {
        Self {
            expression,
            object,
            operators,
            functions,
        }
    }

    /// Resolve a function argument: a quoted literal is unescaped, anything
    /// else is looked up as a field path. Absent fields yield `None`.
    #[must_use]
    pub fn resolve_argument(&self, arg: &str) -> Option<Value> {
        match crate::expression::lexer::unquote(arg) {
            Some(literal) => Some(Value::String(literal)),
            None => self.object.get(arg).cloned(),
        }
    }
}
