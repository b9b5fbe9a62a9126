//! Error reporting integration tests.

#[cfg(test)]
mod tests {
    use filterexpr_core::ExpressionError;
    use serde_json::json;

    use crate::check;

    #[test]
    fn test_should_report_incomplete_logical_operation() {
        let err = check("A = 1 AND OR", json!({})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "incomplete logical operation detected in A = 1 AND OR"
        );
        let err = check("(A = 1 AND) OR", json!({})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "incomplete logical operation detected in A = 1 AND"
        );
    }

    #[test]
    fn test_should_report_invalid_function_argument() {
        let err = check("LEN(field,) = 4", json!({})).unwrap_err();
        assert_eq!(err.to_string(), "invalid function argument passed to LEN");
    }

    #[test]
    fn test_should_report_unknown_function() {
        let err = check("UPPER(name) = A", json!({})).unwrap_err();
        assert_eq!(
            err,
            ExpressionError::UnknownFunction {
                function: "UPPER".to_owned()
            }
        );
    }

    #[test]
    fn test_should_report_structural_errors() {
        assert_eq!(
            check("", json!({})).unwrap_err(),
            ExpressionError::EmptyExpression {
                expression: String::new()
            }
        );
        assert!(matches!(
            check("(a = 1", json!({})).unwrap_err(),
            ExpressionError::UnbalancedParens { .. }
        ));
        assert!(matches!(
            check(r#"a = "open"#, json!({})).unwrap_err(),
            ExpressionError::UnterminatedQuote { .. }
        ));
    }

    #[test]
    fn test_should_locate_empty_groups() {
        let err = check("a = 1 AND ()", json!({"a": 1})).unwrap_err();
        assert_eq!(err.to_string(), "received empty expression in a = 1 AND ()");
    }

    #[test]
    fn test_should_reject_missing_connective() {
        let object = json!({"a": 1, "b": 2});
        let err = check("a = 1 b = 2", object.clone()).unwrap_err();
        assert_eq!(err.to_string(), "received invalid condition a = 1 b = 2");
        let err = check("a = 1 NOT b = 2", object.clone()).unwrap_err();
        assert_eq!(err.to_string(), "received invalid condition a = 1 NOT b = 2");
        assert!(check("a = 1 AND NOT b = 3", object).unwrap());
    }

    #[test]
    fn test_should_report_invalid_condition_text() {
        let err = check("a = 1 AND b ~ 2", json!({"a": 1})).unwrap_err();
        assert_eq!(err.to_string(), "received invalid condition b ~ 2");
    }

    #[test]
    fn test_should_report_invalid_is_operand() {
        let err = check("flag IS maybe", json!({"flag": true})).unwrap_err();
        assert!(matches!(err, ExpressionError::InvalidOperand { .. }), "{err}");
    }

    #[test]
    fn test_should_report_errors_after_true_branch() {
        let err = check("a = 1 OR LEN() = 0", json!({"a": 1})).unwrap_err();
        assert_eq!(
            err,
            ExpressionError::InvalidFunctionArgument {
                function: "LEN".to_owned()
            }
        );
    }
}
