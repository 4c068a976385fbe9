//! Named-parameter substitution.
//!
//! Replaces `:name` tokens in a template with the string form of the
//! matching parameter. A token ends at the first character that is not
//! alphanumeric or `_`, so `:id` never matches inside `:identity`.

use serde_json::Value;
use std::collections::HashMap;

/// Substitute `:name` tokens with values from `params`.
///
/// Tokens without a matching parameter are left verbatim. `null` renders as
/// the text `null`, arrays render comma-joined.
#[must_use]
pub fn substitute(template: &str, params: &HashMap<String, Value>) -> String {
    if template.is_empty() || params.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(colon) = rest.find(':') {
        let (head, tail) = rest.split_at(colon);
        out.push_str(head);

        // `tail` starts with ':'.
        let name_len = tail[1..]
            .find(|c: char| !is_name_char(c))
            .unwrap_or(tail.len().saturating_sub(1));
        let (token, remainder) = tail.split_at(name_len.saturating_add(1));
        let name = &token[1..];

        match params.get(name) {
            Some(value) if !name.is_empty() => out.push_str(&stringify(value)),
            _ => out.push_str(token),
        }
        rest = remainder;
    }
    out.push_str(rest);
    out
}

/// Substitute an optional template, short-circuiting on `None` and empty input.
#[must_use]
pub fn substitute_opt(template: Option<&str>, params: &HashMap<String, Value>) -> Option<String> {
    template.map(|t| substitute(t, params))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => stringify(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Number(number) => stringify_number(number),
        other => other.to_string(),
    }
}

/// Integral floats render without a fraction up to `1e21`, like integers.
#[allow(clippy::float_cmp)]
fn stringify_number(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(f) if !number.is_f64() || !f.is_finite() || f.fract() != 0.0 => number.to_string(),
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.abs() < 1e21 => format!("{f:.0}"),
        _ => number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_substitutes_numbers_and_booleans() {
        assert_eq!(
            substitute("x :a :b", &params(json!({"a": 1, "b": true}))),
            "x 1 true"
        );
        assert_eq!(
            substitute("contact/:id", &params(json!({"id": 7.0}))),
            "contact/7"
        );
        let p = params(json!({"w": 400.0, "h": -12.0, "r": 0.5, "z": -0.0, "big": 1e20}));
        assert_eq!(substitute(":w/:h/:r/:z", &p), "400/-12/0.5/0");
        assert_eq!(substitute(":big", &p), "100000000000000000000");
    }

    #[test]
    fn test_unmatched_token_is_kept() {
        assert_eq!(substitute("x :a", &HashMap::new()), "x :a");
        assert_eq!(substitute("x :a/:b", &params(json!({"b": "y"}))), "x :a/y");
    }

    #[test]
    fn test_none_template_short_circuits() {
        assert_eq!(substitute_opt(None, &params(json!({"a": 1}))), None);
        assert_eq!(substitute_opt(Some(""), &params(json!({"a": 1}))), Some(String::new()));
    }

    #[test]
    fn test_null_and_arrays() {
        let p = params(json!({"n": null, "list": ["a", 2, null, true]}));
        assert_eq!(substitute(":n", &p), "null");
        assert_eq!(substitute("[:list]", &p), "[a,2,,true]");
    }

    #[test]
    fn test_token_boundaries() {
        let p = params(json!({"id": "42", "identity": "me"}));
        assert_eq!(substitute("contact/:id/:identity", &p), "contact/42/me");
        assert_eq!(substitute(":idx", &p), ":idx");
        assert_eq!(substitute("a::id:", &p), "a:42:");
    }

    #[test]
    fn test_repeated_tokens() {
        let p = params(json!({"v": "z"}));
        assert_eq!(substitute(":v-:v", &p), "z-z");
    }
}
