//! Integration tests for the filterexpr public API.
//!
//! Everything here goes through the crate's public surface only. Set
//! `RUST_LOG=filterexpr_core=trace` to see every evaluated condition.

use std::sync::Once;

use filterexpr_core::{ExpressionEvaluator, Result, Value};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Convert a JSON literal into a [`Value`].
#[must_use]
pub fn object(json: serde_json::Value) -> Value {
    Value::from(json)
}

/// Evaluate `expression` against `json` with a default evaluator.
pub fn check(expression: &str, json: serde_json::Value) -> Result<bool> {
    check_with(&ExpressionEvaluator::new(), expression, json)
}

/// Evaluate `expression` against `json` with `evaluator`.
pub fn check_with(
    evaluator: &ExpressionEvaluator,
    expression: &str,
    json: serde_json::Value,
) -> Result<bool> {
    init_tracing();
    evaluator.evaluate(expression, &object(json))
}

mod test_errors;
mod test_logical;
mod test_quoting;
mod test_registries;
