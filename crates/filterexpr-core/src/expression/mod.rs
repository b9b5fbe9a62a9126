//! Expression pipeline: splitting, logical parsing and evaluation.

pub mod ast;
pub mod condition;
pub mod evaluator;
pub mod lexer;
pub mod parser;

pub use ast::{Expr, LogicalOp};
pub use condition::{ConditionEvaluator, DefaultConditionEvaluator, evaluate_condition};
pub use evaluator::{ExpressionEvaluator, evaluate, evaluate_with};
pub use lexer::unquote;
pub use parser::{DefaultExpressionParser, ExpressionParser, parse_expression};
