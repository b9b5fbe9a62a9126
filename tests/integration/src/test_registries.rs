//! Custom operator and function integration tests.

#[cfg(test)]
mod tests {
    use filterexpr_core::{
        Expr, ExpressionContext, ExpressionError, ExpressionEvaluator, ExpressionParser,
        FunctionRegistry, LogicalOp, Number, OperatorRegistry, Result, Value, evaluate_with,
    };
    use serde_json::json;

    use crate::{check_with, object};

    fn contains(
        value: Option<&Value>,
        literal: &str,
        _tokens: &[&str],
        _ctx: &ExpressionContext<'_>,
    ) -> Result<bool> {
        Ok(match value {
            Some(Value::String(s)) => s.contains(literal),
            Some(Value::List(items)) => items.iter().any(|v| v.as_str() == Some(literal)),
            _ => false,
        })
    }

    fn upper(ctx: &ExpressionContext<'_>, args: &[&str]) -> Result<Value> {
        let [arg] = args else {
            return Err(ExpressionError::InvalidFunctionArgument {
                function: "UPPER".to_owned(),
            });
        };
        Ok(match ctx.resolve_argument(arg) {
            Some(Value::String(s)) => Value::String(s.to_uppercase()),
            other => other.unwrap_or_default(),
        })
    }

    #[test]
    fn test_should_use_custom_keyword_operator() {
        let mut operators = OperatorRegistry::with_defaults();
        operators.register("CONTAINS", contains);
        let evaluator = ExpressionEvaluator::new().with_operators(operators);

        let doc = json!({"bio": "rust and go", "tags": ["db", "cli"]});
        assert!(check_with(&evaluator, "bio CONTAINS rust", doc.clone()).unwrap());
        assert!(
            check_with(&evaluator, "bio contains rust AND tags CONTAINS cli", doc.clone()).unwrap()
        );
        assert!(!check_with(&evaluator, "tags CONTAINS web", doc).unwrap());
    }

    #[test]
    fn test_should_use_multi_word_operator() {
        let mut operators = OperatorRegistry::with_defaults();
        operators.register(
            "does not contain",
            |v: Option<&Value>, l: &str, t: &[&str], c: &ExpressionContext<'_>| -> Result<bool> {
                contains(v, l, t, c).map(|found| !found)
            },
        );
        let evaluator = ExpressionEvaluator::new().with_operators(operators);
        let doc = json!({"bio": "rust"});
        assert!(check_with(&evaluator, "bio DOES NOT CONTAIN java", doc.clone()).unwrap());
        assert!(!check_with(&evaluator, "bio does not contain rust", doc).unwrap());
    }

    #[test]
    fn test_should_use_custom_symbol_operator() {
        let mut operators = OperatorRegistry::with_defaults();
        operators.register(
            "~=",
            |v: Option<&Value>, l: &str, _: &[&str], _: &ExpressionContext<'_>| -> Result<bool> {
                Ok(v.and_then(Value::as_str).is_some_and(|s| s.eq_ignore_ascii_case(l)))
            },
        );
        let evaluator = ExpressionEvaluator::new().with_operators(operators);
        assert!(check_with(&evaluator, "name ~= ADA", json!({"name": "Ada"})).unwrap());
        assert!(check_with(&evaluator, "name~=ada", json!({"name": "Ada"})).unwrap());
    }

    #[test]
    fn test_should_override_default_operator() {
        let mut operators = OperatorRegistry::with_defaults();
        operators.register(
            "=",
            |_: Option<&Value>, _: &str, _: &[&str], _: &ExpressionContext<'_>| -> Result<bool> {
                Ok(true)
            },
        );
        let evaluator = ExpressionEvaluator::new().with_operators(operators);
        assert!(check_with(&evaluator, "anything = whatever", json!({})).unwrap());
    }

    #[test]
    fn test_should_use_custom_function() {
        let mut functions = FunctionRegistry::with_defaults();
        functions.register("upper", upper);
        let evaluator = ExpressionEvaluator::new().with_functions(functions);

        let doc = json!({"name": "ada"});
        assert!(check_with(&evaluator, "UPPER(name) = ADA", doc.clone()).unwrap());
        let source = r#"Upper("x") = X AND LEN(name) = 3"#;
        assert!(check_with(&evaluator, source, doc.clone()).unwrap());
        assert!(check_with(&evaluator, "UPPER(name, name) = ADA", doc).is_err());
    }

    #[test]
    fn test_should_evaluate_with_borrowed_registries() {
        let mut operators = OperatorRegistry::empty();
        operators.register("CONTAINS", contains);
        let mut functions = FunctionRegistry::empty();
        functions.register("COUNT", |ctx: &ExpressionContext<'_>, args: &[&str]| -> Result<Value> {
            let len = args
                .first()
                .and_then(|a| ctx.resolve_argument(a))
                .map_or(0, |v| match v {
                    Value::List(items) => items.len(),
                    _ => 1,
                });
            Ok(Value::Number(Number::from(len)))
        });

        let doc = object(json!({"tags": ["a", "b"]}));
        assert!(evaluate_with("tags CONTAINS a", &doc, &operators, &functions).unwrap());
        // The empty registry has no `=`.
        assert!(evaluate_with("COUNT(tags) = 2", &doc, &operators, &functions).is_err());
        assert!(evaluate_with("LEN(tags) CONTAINS 2", &doc, &operators, &functions).is_err());
    }

    /// Joins `;`-separated conditions with `AND`.
    #[derive(Debug)]
    struct SemicolonAnd;

    impl ExpressionParser for SemicolonAnd {
        fn parse(&self, expression: &str) -> Result<Expr> {
            let mut spans = Vec::new();
            let mut start = 0;
            for (i, c) in expression.char_indices() {
                if c == ';' {
                    spans.push(start..i);
                    start = i + 1;
                }
            }
            spans.push(start..expression.len());
            spans
                .into_iter()
                .map(Expr::Condition)
                .reduce(|left, right| Expr::Logical {
                    op: LogicalOp::And,
                    left: Box::new(left),
                    right: Box::new(right),
                })
                .ok_or_else(|| ExpressionError::EmptyExpression {
                    expression: expression.to_owned(),
                })
        }
    }

    #[test]
    fn test_should_use_custom_parser() {
        let evaluator = ExpressionEvaluator::new().with_parser(SemicolonAnd);
        let doc = json!({"a": 1, "b": 2});
        assert!(check_with(&evaluator, "a = 1; b = 2", doc.clone()).unwrap());
        assert!(!check_with(&evaluator, "a = 1;b = 3", doc.clone()).unwrap());
        assert!(check_with(&evaluator, "a = 1 AND b = 2", doc).is_err());
    }
}
