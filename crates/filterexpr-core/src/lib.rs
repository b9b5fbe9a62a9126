//! Textual boolean filter expressions evaluated against structured values.
//!
//! An expression combines leaf conditions with `AND`, `OR`, `NOT` and
//! parentheses:
//!
//! ```text
//! (age >= 18 AND country IN US,CA) OR LEN(nickname) > 0
//! ```
//!
//! Each leaf is `<lhs> <operator> <literal>`, where the left-hand side is a
//! field path, a quoted string or a function call. Operators and functions
//! come from an [`OperatorRegistry`] and a [`FunctionRegistry`], both of which
//! can be extended.
//!
//! ```
//! use filterexpr_core::{ExpressionEvaluator, Value};
//!
//! let evaluator = ExpressionEvaluator::new();
//! let user = Value::from(serde_json::json!({ "name": "Ada", "tags": ["admin"] }));
//! assert!(evaluator.evaluate("name = Ada AND LEN(tags) = 1", &user).unwrap());
//! ```

pub mod context;
pub mod error;
pub mod expression;
pub mod functions;
pub mod operators;
pub mod registry;
pub mod value;

pub use context::ExpressionContext;
pub use error::{ExpressionError, Result};
pub use expression::{
    ConditionEvaluator, DefaultConditionEvaluator, DefaultExpressionParser, Expr,
    ExpressionEvaluator, ExpressionParser, LogicalOp, evaluate, evaluate_condition, evaluate_with,
    parse_expression,
};
pub use functions::Len;
pub use registry::{ExpressionFunction, FunctionRegistry, Operator, OperatorRegistry};
pub use value::{AttributePath, Number, PathElement, Value};
