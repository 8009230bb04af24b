//! Change summaries for audit entries

use serde_json::Value;

const MAX_STRING_LEN: usize = 40;

/// Describe which top-level fields differ between two JSON objects
///
/// Returns `None` when nothing changed. Nested objects and arrays are
/// reported by field name only.
pub fn summarize_changes(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return (before != after).then(|| format!("{} -> {}", render(before), render(after)));
    };

    let mut changes: Vec<String> = before_obj
        .iter()
        .filter_map(|(key, old)| match after_obj.get(key) {
            Some(new) if new == old => None,
            Some(new) => Some(format!("{}: {} -> {}", key, render(old), render(new))),
            None => Some(format!("{}: {} -> (removed)", key, render(old))),
        })
        .collect();

    changes.extend(
        after_obj
            .iter()
            .filter(|(key, _)| !before_obj.contains_key(*key))
            .map(|(key, new)| format!("{}: (set) -> {}", key, render(new))),
    );

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => "none".to_string(),
        Value::String(s) if s.chars().count() > MAX_STRING_LEN => {
            let head: String = s.chars().take(MAX_STRING_LEN - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(_) | Value::Object(_) => "(changed)".to_string(),
        other => other.to_string(),
    }
}
