//! Evaluation of an expression over a JSON document.

use std::io::{Read, Write};

use anyhow::{Context, Result, bail};
use filterexpr_core::{ExpressionEvaluator, Value};
use tracing::debug;

/// How the input document is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The whole document is one object.
    Single,
    /// The document is an array; every element is matched on its own.
    Each,
}

/// Read a JSON document from `input`.
pub fn read_document(mut input: impl Read) -> Result<serde_json::Value> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .context("failed to read input")?;
    serde_json::from_str(&text).context("input is not valid JSON")
}

/// Evaluate `expression` against `document`, one result per matched object.
pub fn evaluate_document(
    evaluator: &ExpressionEvaluator,
    expression: &str,
    document: serde_json::Value,
    mode: Mode,
) -> Result<Vec<bool>> {
    match (mode, document) {
        (Mode::Single, document) => {
            let object = Value::from(document);
            let result = evaluator
                .evaluate(expression, &object)
                .with_context(|| format!("failed to evaluate `{expression}`"))?;
            Ok(vec![result])
        }
        (Mode::Each, serde_json::Value::Array(items)) => {
            debug!(items = items.len(), "evaluating each element");
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    evaluator
                        .evaluate(expression, &Value::from(item))
                        .with_context(|| {
                            format!("failed to evaluate `{expression}` on element {index}")
                        })
                })
                .collect()
        }
        (Mode::Each, other) => {
            bail!("--each expects a JSON array, found {}", Value::from(other).type_name())
        }
    }
}

/// Print one line per result unless `quiet`, returning whether all matched.
pub fn report(results: &[bool], quiet: bool, mut out: impl Write) -> Result<bool> {
    if !quiet {
        for result in results {
            writeln!(out, "{result}").context("failed to write output")?;
        }
    }
    Ok(results.iter().all(|r| *r))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_evaluate_single_document() {
        let evaluator = ExpressionEvaluator::new();
        let results =
            evaluate_document(&evaluator, "a = 1 AND b > 1", json!({"a": 1, "b": 2}), Mode::Single)
                .unwrap();
        assert_eq!(results, vec![true]);
    }

    #[test]
    fn test_should_evaluate_each_element() {
        let evaluator = ExpressionEvaluator::new();
        let document = json!([{"n": 1}, {"n": 5}, {"m": 9}]);
        let results = evaluate_document(&evaluator, "n > 2", document, Mode::Each).unwrap();
        assert_eq!(results, vec![false, true, false]);
    }

    #[test]
    fn test_should_reject_non_array_with_each() {
        let evaluator = ExpressionEvaluator::new();
        let err = evaluate_document(&evaluator, "n > 2", json!({"n": 1}), Mode::Each).unwrap_err();
        assert_eq!(err.to_string(), "--each expects a JSON array, found map");
    }

    #[test]
    fn test_should_name_failing_element() {
        let evaluator = ExpressionEvaluator::new();
        let document = json!([{"n": 1}, {"n": true}]);
        let err = evaluate_document(&evaluator, "n IS maybe", document, Mode::Each).unwrap_err();
        assert!(err.to_string().contains("element 0"), "{err:#}");
    }

    #[test]
    fn test_should_read_document() {
        let document = read_document(r#"{"a": [1, 2]}"#.as_bytes()).unwrap();
        assert_eq!(document, json!({"a": [1, 2]}));
        assert!(read_document("not json".as_bytes()).is_err());
    }

    #[test]
    fn test_should_report_results() {
        let mut out = Vec::new();
        assert!(!report(&[true, false], false, &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "true\nfalse\n");

        let mut out = Vec::new();
        assert!(report(&[true], true, &mut out).unwrap());
        assert!(out.is_empty());
        assert!(report(&[], false, Vec::new()).unwrap());
    }
}
