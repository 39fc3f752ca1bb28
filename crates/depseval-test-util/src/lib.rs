//! Shared test utilities for the depseval workspace.
//!
//! Lives in its own crate so the CLI integration tests can compare emitted reports against
//! golden JSON without pulling in the whole app layer.

use serde_json::Value;

const ENVELOPE_KEYS: [&str; 4] = ["schema", "tool", "verdict", "findings"];
const TIMESTAMP_KEYS: [&str; 2] = ["started_at", "finished_at"];

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// 1. **Root-only**: `tool.version` becomes `"__VERSION__"` when the root object is a report
///    envelope (has `schema`, `tool`, `verdict` and `findings`). Finding payloads that happen to
///    look like an envelope are left alone.
/// 2. **Recursive**: `started_at` / `finished_at` become `"__TIMESTAMP__"` at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ENVELOPE_KEYS.iter().all(|k| obj.contains_key(*k));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("name")
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
                if let Some(v) = map.get_mut(key) {
                    *v = Value::String("__TIMESTAMP__".to_string());
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_envelope_version_and_timestamps() {
        let input = json!({
            "schema": "depseval.report.v1",
            "tool": { "name": "depseval", "version": "0.1.0" },
            "started_at": "2026-01-01T00:00:00Z",
            "finished_at": "2026-01-01T00:00:01Z",
            "verdict": "pass",
            "findings": [
                { "data": { "name": "src/v8", "version": "1.2.3" } }
            ],
            "data": { "profile": "strict" }
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(result["tool"]["version"], "__VERSION__");
        assert_eq!(result["tool"]["name"], "depseval");
        assert_eq!(result["started_at"], "__TIMESTAMP__");
        assert_eq!(result["finished_at"], "__TIMESTAMP__");
        assert_eq!(result["findings"][0]["data"]["version"], "1.2.3");
    }

    #[test]
    fn nested_envelope_like_payload_keeps_version() {
        let input = json!({
            "schema": "depseval.report.v1",
            "tool": { "name": "depseval", "version": "0.1.0" },
            "verdict": "fail",
            "findings": [
                {
                    "data": {
                        "schema": "fake",
                        "tool": { "name": "inner", "version": "9.9.9" },
                        "verdict": "pass",
                        "findings": [],
                        "started_at": "2026-06-01T12:00:00Z"
                    }
                }
            ]
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(result["tool"]["version"], "__VERSION__");
        assert_eq!(result["findings"][0]["data"]["tool"]["version"], "9.9.9");
        assert_eq!(
            result["findings"][0]["data"]["started_at"], "__TIMESTAMP__",
            "nested timestamps are normalized"
        );
    }

    #[test]
    fn root_without_envelope_keys_not_normalized() {
        let input = json!({
            "tool": { "name": "other", "version": "2.0.0" },
            "started_at": "2026-01-01T00:00:00Z"
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(result["tool"]["version"], "2.0.0");
        assert_eq!(result["started_at"], "__TIMESTAMP__");
    }
}
