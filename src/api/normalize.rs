//! Best-effort extraction of display text from arbitrary agent JSON.
//!
//! Independent automations answer in wildly different shapes. Rather than
//! validating a schema, the normalizer walks an ordered fallback chain and
//! always produces *something* the user can read. The chain order is
//! load-bearing: callers depend on `output` winning over `text`, and on
//! the first-string-field probe running before the raw serialization.

use serde_json::Value;

pub const EMPTY_RESPONSE_MESSAGE: &str = "The agent returned an empty response.";
pub const EMPTY_LIST_MESSAGE: &str = "The agent returned an empty list.";

/// Field names probed first, in order of preference.
const PRIORITY_KEYS: [&str; 6] = ["output", "text", "message", "response", "answer", "chatInput"];

/// Reduce an agent reply to a single display string.
pub fn normalize(payload: &Value) -> String {
    if is_empty_value(payload) {
        return EMPTY_RESPONSE_MESSAGE.to_string();
    }

    // Agents often answer with an array of items; only the first counts.
    let item = match payload {
        Value::Array(items) => match items.first() {
            Some(first) if !is_empty_value(first) => first,
            _ => return EMPTY_LIST_MESSAGE.to_string(),
        },
        other => other,
    };

    let fields = match item {
        Value::Object(fields) => fields,
        other => return stringify(other),
    };

    for key in PRIORITY_KEYS {
        if let Some(value) = fields.get(key) {
            if !value.is_null() {
                return stringify(value);
            }
        }
    }

    if let Some(value) = fields.values().find(|value| value.is_string()) {
        return stringify(value);
    }

    serde_json::to_string_pretty(item).unwrap_or_else(|_| item.to_string())
}

/// A payload carrying no usable content: null, the empty string, `false`,
/// or zero. Such values short-circuit to the fixed empty messages rather
/// than rendering as an empty chat bubble.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Strings render bare; anything else renders as its JSON form.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_payload_is_the_empty_response_message() {
        assert_eq!(normalize(&Value::Null), EMPTY_RESPONSE_MESSAGE);
    }

    #[test]
    fn contentless_payloads_are_the_empty_response_message() {
        assert_eq!(normalize(&json!("")), EMPTY_RESPONSE_MESSAGE);
        assert_eq!(normalize(&json!(false)), EMPTY_RESPONSE_MESSAGE);
        assert_eq!(normalize(&json!(0)), EMPTY_RESPONSE_MESSAGE);
    }

    #[test]
    fn empty_array_is_the_empty_list_message() {
        assert_eq!(normalize(&json!([])), EMPTY_LIST_MESSAGE);
        assert_eq!(normalize(&json!([null])), EMPTY_LIST_MESSAGE);
    }

    #[test]
    fn contentless_first_array_elements_are_the_empty_list_message() {
        assert_eq!(normalize(&json!([""])), EMPTY_LIST_MESSAGE);
        assert_eq!(normalize(&json!([false])), EMPTY_LIST_MESSAGE);
        assert_eq!(normalize(&json!([0, "later"])), EMPTY_LIST_MESSAGE);
    }

    #[test]
    fn nonzero_and_true_payloads_still_render() {
        assert_eq!(normalize(&json!(5)), "5");
        assert_eq!(normalize(&json!(true)), "true");
    }

    #[test]
    fn plain_strings_pass_through_unchanged() {
        assert_eq!(normalize(&json!("hello")), "hello");
    }

    #[test]
    fn priority_keys_win_in_order() {
        assert_eq!(normalize(&json!({"output": "hi"})), "hi");
        assert_eq!(
            normalize(&json!({"text": "second", "output": "first"})),
            "first"
        );
        assert_eq!(
            normalize(&json!({"chatInput": "echo", "unrelated": 1})),
            "echo"
        );
    }

    #[test]
    fn null_priority_values_are_skipped() {
        assert_eq!(normalize(&json!({"output": null, "text": "hi"})), "hi");
    }

    #[test]
    fn only_the_first_array_element_is_considered() {
        assert_eq!(normalize(&json!([{"text": "a"}, {"text": "b"}])), "a");
    }

    #[test]
    fn non_string_priority_values_are_stringified() {
        assert_eq!(normalize(&json!({"output": 42})), "42");
        assert_eq!(normalize(&json!({"answer": true})), "true");
    }

    #[test]
    fn first_string_valued_field_is_used_when_no_priority_key_matches() {
        assert_eq!(
            normalize(&json!({"count": 3, "summary": "done", "extra": "later"})),
            "done"
        );
    }

    #[test]
    fn empty_object_pretty_prints() {
        assert_eq!(normalize(&json!({})), "{}");
    }

    #[test]
    fn object_without_strings_pretty_prints_in_full() {
        let rendered = normalize(&json!({"count": 3}));
        assert_eq!(rendered, "{\n  \"count\": 3\n}");
    }

    #[test]
    fn normalization_is_idempotent_on_plain_strings() {
        let once = normalize(&json!("hello"));
        let twice = normalize(&Value::String(once.clone()));
        assert_eq!(once, twice);
    }
}
