//! Expression evaluator: parses an expression and folds its leaves.
//!
//! Every call parses the text afresh through an [`ExpressionParser`] and
//! evaluates each leaf through a [`ConditionEvaluator`]. All leaves are
//! evaluated, without short-circuiting, so a malformed leaf is reported no
//! matter what the leaves before it returned.

use std::fmt;
use std::sync::{Arc, LazyLock};

use tracing::debug;

use super::ast::Expr;
use super::condition::{ConditionEvaluator, DefaultConditionEvaluator};
use super::parser::{DefaultExpressionParser, ExpressionParser};
use crate::context::ExpressionContext;
use crate::error::{ExpressionError, Result};
use crate::registry::{FunctionRegistry, OperatorRegistry};
use crate::value::Value;

static DEFAULT_EVALUATOR: LazyLock<ExpressionEvaluator> = LazyLock::new(ExpressionEvaluator::new);

/// Evaluate `expression` against `object` with the default operators and
/// functions.
///
/// # Examples
///
/// ```
/// use filterexpr_core::{Value, evaluate};
///
/// let object = Value::from(serde_json::json!({ "a": 1, "b": 2, "c": 3, "d": 4 }));
/// let matched = evaluate(
///     "(a = 1 AND b = 2) AND NOT (c > 5) AND (c < 1 OR d > 2)",
///     &object,
/// )
/// .unwrap();
/// assert!(matched);
/// ```
pub fn evaluate(expression: &str, object: &Value) -> Result<bool> {
    DEFAULT_EVALUATOR.evaluate(expression, object)
}

/// Evaluate `expression` against `object` with caller-supplied registries.
pub fn evaluate_with(
    expression: &str,
    object: &Value,
    operators: &OperatorRegistry,
    functions: &FunctionRegistry,
) -> Result<bool> {
    let ctx = ExpressionContext::new(expression, object, operators, functions);
    run(&ctx, &DefaultExpressionParser, &DefaultConditionEvaluator)
}

/// Reusable evaluator holding shared registries.
///
/// Cloning is cheap; clones share their registries, and an evaluator can be
/// used from many threads at once.
#[derive(Clone)]
pub struct ExpressionEvaluator {
    operators: Arc<OperatorRegistry>,
    functions: Arc<FunctionRegistry>,
    parser: Arc<dyn ExpressionParser>,
    conditions: Arc<dyn ConditionEvaluator>,
}

impl ExpressionEvaluator {
    /// Create an evaluator with the default operators and functions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            operators: Arc::new(OperatorRegistry::with_defaults()),
            functions: Arc::new(FunctionRegistry::with_defaults()),
            parser: Arc::new(DefaultExpressionParser),
            conditions: Arc::new(DefaultConditionEvaluator),
        }
    }

    /// Replace the operator registry.
    #[must_use]
    pub fn with_operators(mut self, operators: impl Into<Arc<OperatorRegistry>>) -> Self {
        self.operators = operators.into();
        self
    }

    /// Replace the function registry.
    #[must_use]
    pub fn with_functions(mut self, functions: impl Into<Arc<FunctionRegistry>>) -> Self {
        self.functions = functions.into();
        self
    }

    /// Replace the logical parser.
    #[must_use]
    pub fn with_parser(mut self, parser: impl ExpressionParser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    /// Replace the leaf condition evaluator.
    #[must_use]
    pub fn with_condition_evaluator(
        mut self,
        conditions: impl ConditionEvaluator + 'static,
    ) -> Self {
        self.conditions = Arc::new(conditions);
        self
    }

    /// The operator registry in use.
    #[must_use]
    pub fn operators(&self) -> &OperatorRegistry {
        &self.operators
    }

    /// The function registry in use.
    #[must_use]
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Evaluate `expression` against `object`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExpressionError`](crate::ExpressionError) for unbalanced
    /// quotes or parentheses, malformed logical sequences, malformed leaf
    /// conditions, and failures reported by operators or functions.
    pub fn evaluate(&self, expression: &str, object: &Value) -> Result<bool> {
        let ctx = ExpressionContext::new(expression, object, &self.operators, &self.functions);
        run(&ctx, self.parser.as_ref(), self.conditions.as_ref())
    }
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExpressionEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionEvaluator")
            .field("operators", &self.operators)
            .field("functions", &self.functions)
            .finish_non_exhaustive()
    }
}

fn run(
    ctx: &ExpressionContext<'_>,
    parser: &dyn ExpressionParser,
    conditions: &dyn ConditionEvaluator,
) -> Result<bool> {
    let expr = parser.parse(ctx.expression)?;
    let result = eval_expr(&expr, ctx, conditions)?;
    debug!(
        expression = ctx.expression,
        conditions = expr.condition_count(),
        result,
        "evaluated expression"
    );
    Ok(result)
}

fn eval_expr(
    expr: &Expr,
    ctx: &ExpressionContext<'_>,
    conditions: &dyn ConditionEvaluator,
) -> Result<bool> {
    match expr {
        Expr::Condition(span) => {
            let condition = ctx.expression.get(span.clone()).ok_or_else(|| {
                ExpressionError::InvalidCondition {
                    condition: format!("{}..{} of {}", span.start, span.end, ctx.expression),
                }
            })?;
            conditions.evaluate(condition, ctx)
        }
        Expr::Not(inner) => eval_expr(inner, ctx, conditions).map(|v| !v),
        Expr::Logical { op, left, right } => {
            let left = eval_expr(left, ctx, conditions)?;
            let right = eval_expr(right, ctx, conditions)?;
            Ok(op.apply(left, right))
        }
    }
}
