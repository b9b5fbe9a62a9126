//! Logical folding integration tests.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::check;

    #[test]
    fn test_should_evaluate_documented_scenarios() {
        assert!(check("field = 1", json!({"field": 1})).unwrap());
        assert!(!check("field IS FALSE", json!({"field": true})).unwrap());
        assert!(check("LEN(field) = 4", json!({"field": "test"})).unwrap());
        assert!(
            check(
                "(a = 1 AND b = 2) AND NOT (c > 5) AND (c < 1 OR d > 2)",
                json!({"a": 1, "b": 2, "c": 3, "d": 4}),
            )
            .unwrap()
        );
    }

    #[test]
    fn test_should_fold_unparenthesized_chains_left_to_right() {
        let object = json!({"a": 1, "b": 0, "c": 0});
        // (a OR b) AND c
        assert!(!check("a = 1 OR b = 1 AND c = 1", object.clone()).unwrap());
        assert!(check("c = 1 AND b = 1 OR a = 1", object.clone()).unwrap());
        assert!(check("a = 1 OR (b = 1 AND c = 1)", object).unwrap());
    }

    #[test]
    fn test_should_treat_parens_as_transparent() {
        let object = json!({"x": 3});
        for source in ["x > 2 AND x < 4", "(x > 2 AND x < 4)", "(((x > 2 AND x < 4)))"] {
            assert!(check(source, object.clone()).unwrap(), "{source}");
        }
    }

    #[test]
    fn test_should_negate_groups_and_leaves() {
        let object = json!({"x": 3});
        assert!(!check("NOT x = 3", object.clone()).unwrap());
        assert!(check("NOT NOT x = 3", object.clone()).unwrap());
        assert!(check("NOT (x = 1 OR x = 2)", object.clone()).unwrap());
        assert!(check("NOT(x = 1)AND(x = 3)", object).unwrap());
    }

    #[test]
    fn test_should_accept_lowercase_connectives() {
        assert!(check("x = 1 or x = 3 and not x = 2", json!({"x": 3})).unwrap());
    }

    #[test]
    fn test_should_span_multiple_lines() {
        let source = "firstName = John AND\n    \
                      (profession = \"Health Care\" OR profession = Nurse)\n    \
                      AND age >= 21";
        let person = json!({"firstName": "John", "profession": "Health Care", "age": 23});
        assert!(check(source, person).unwrap());
    }

    #[test]
    fn test_should_be_idempotent() {
        let object = json!({"tags": ["a", "b"], "n": 2});
        let source = "LEN(tags) = 2 AND tags.0 = a";
        let first = check(source, object.clone()).unwrap();
        for _ in 0..3 {
            assert_eq!(check(source, object.clone()).unwrap(), first);
        }
    }
}
