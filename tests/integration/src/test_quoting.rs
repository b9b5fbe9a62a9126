//! Quoted literal integration tests.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::check;

    #[test]
    fn test_should_ignore_keywords_inside_quotes() {
        assert!(check(r#"a = "NOT test""#, json!({"a": "NOT test"})).unwrap());
        assert!(check(r#"a = "x AND y" OR a = "z""#, json!({"a": "x AND y"})).unwrap());
        assert!(check(r#"a = "(unbalanced""#, json!({"a": "(unbalanced"})).unwrap());
        assert!(check(r#"a = "b >= c""#, json!({"a": "b >= c"})).unwrap());
    }

    #[test]
    fn test_should_unescape_quotes() {
        let object = json!({"quote": r#"she said "hi""#});
        assert!(check(r#"quote = "she said \"hi\"""#, object.clone()).unwrap());
        assert!(!check(r#"quote = "she said hi""#, object).unwrap());
        assert!(check(r#"path = "C:\\temp""#, json!({"path": r"C:\temp"})).unwrap());
    }

    #[test]
    fn test_should_compare_quoted_lhs() {
        assert!(check(r#""fixed" = fixed"#, json!({})).unwrap());
        assert!(check(r#"LEN("a, b") = 4"#, json!({})).unwrap());
    }

    #[test]
    fn test_should_keep_whitespace_inside_quotes() {
        let object = json!({"city": "New  York"});
        assert!(check(r#"city = "New  York""#, object.clone()).unwrap());
        assert!(!check("city = New  York", object).unwrap());
    }
}
