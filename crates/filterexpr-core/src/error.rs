//! Error type for expression parsing and evaluation.

/// Errors produced while parsing or evaluating a filter expression.
///
/// Every variant aborts the evaluation in progress; no partial result is
/// ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    /// A double-quoted string was opened but never closed.
    #[error("unterminated quoted string in {expression}")]
    UnterminatedQuote {
        /// The expression containing the unterminated string.
        expression: String,
    },
    /// Opening and closing parentheses do not match up.
    #[error("unbalanced parentheses in {expression}")]
    UnbalancedParens {
        /// The expression containing the mismatch.
        expression: String,
    },
    /// The expression (or a parenthesized group) contains nothing to evaluate.
    #[error("received empty expression{}", location(.expression))]
    EmptyExpression {
        /// Source text of the nesting level holding the empty group; empty
        /// when the whole expression is blank.
        expression: String,
    },
    /// Connectives and operands do not alternate correctly.
    #[error("incomplete logical operation detected in {expression}")]
    IncompleteLogicalOperation {
        /// Source text of the nesting level where the problem was found.
        expression: String,
    },
    /// A leaf condition does not decompose into `<lhs> <operator> <literal>`.
    #[error("received invalid condition {condition}")]
    InvalidCondition {
        /// Source text of the leaf condition.
        condition: String,
    },
    /// A function call has an empty or missing argument.
    #[error("invalid function argument passed to {function}")]
    InvalidFunctionArgument {
        /// The function name as written in the expression.
        function: String,
    },
    /// A function call names a function that is not registered.
    #[error("unknown function {function}")]
    UnknownFunction {
        /// The function name as written in the expression.
        function: String,
    },
    /// An operator rejected its literal operand.
    #[error("invalid operand for {operation}: {message}")]
    InvalidOperand {
        /// The operator or function that failed.
        operation: String,
        /// Explanation.
        message: String,
    },
}

fn location(expression: &str) -> String {
    if expression.is_empty() {
        String::new()
    } else {
        format!(" in {expression}")
    }
}

/// Convenience result type for expression operations.
pub type Result<T, E = ExpressionError> = std::result::Result<T, E>;
