//! Pure display helpers for debug records. Nothing here touches the view.

use chrono::{DateTime, Local};
use serde_json::Value;

/// Display-ready form of a payload.
#[derive(Clone, Debug, PartialEq)]
pub enum PayloadView {
    /// Non-object payloads: one line.
    Scalar(String),
    /// Objects and arrays: one entry per key, in order.
    Fields(Vec<Field>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Inline(String),
    /// Pretty-printed JSON (2-space indent) for nested objects/arrays.
    Block(String),
}

/// Structured description of one on-screen debug entry.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugNode {
    pub id: String,
    pub endpoint: String,
    pub payload: PayloadView,
    pub timestamp: Option<String>,
}

pub fn format_payload(payload: &Value) -> PayloadView {
    match payload {
        Value::Object(map) => PayloadView::Fields(
            map.iter()
                .map(|(key, value)| Field {
                    key: key.clone(),
                    value: format_field_value(value),
                })
                .collect(),
        ),
        Value::Array(items) => PayloadView::Fields(
            items
                .iter()
                .enumerate()
                .map(|(idx, value)| Field {
                    key: idx.to_string(),
                    value: format_field_value(value),
                })
                .collect(),
        ),
        scalar => PayloadView::Scalar(scalar_text(scalar)),
    }
}

fn format_field_value(value: &Value) -> FieldValue {
    match value {
        Value::Object(_) | Value::Array(_) => {
            FieldValue::Block(serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()))
        }
        scalar => FieldValue::Inline(scalar_text(scalar)),
    }
}

/// Strings render without quotes; everything else as JSON text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `HH:MM:SS.mmm` in local time. Call at record time so the timestamp matches
/// the record's position.
pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.format("%H:%M:%S%.3f").to_string()
}

pub fn format_endpoint(endpoint: &str) -> String {
    if endpoint.starts_with('/') {
        endpoint.to_string()
    } else {
        format!("/{}", endpoint)
    }
}

pub fn build_node(id: &str, endpoint: &str, payload: &Value, timestamp: &str, show_timestamp: bool) -> DebugNode {
    DebugNode {
        id: id.to_string(),
        endpoint: endpoint.to_string(),
        payload: format_payload(payload),
        timestamp: show_timestamp.then(|| timestamp.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_scalar_payloads_render_as_one_line() {
        assert_eq!(format_payload(&json!(42)), PayloadView::Scalar("42".to_string()));
        assert_eq!(format_payload(&json!("ok")), PayloadView::Scalar("ok".to_string()));
        assert_eq!(format_payload(&json!(true)), PayloadView::Scalar("true".to_string()));
        assert_eq!(format_payload(&Value::Null), PayloadView::Scalar("null".to_string()));
    }

    #[test]
    fn test_object_fields_keep_order() {
        let view = format_payload(&json!({"zeta": 1, "alpha": "two", "mid": null}));
        let PayloadView::Fields(fields) = view else {
            panic!("expected fields");
        };
        let keys: Vec<_> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(fields[1].value, FieldValue::Inline("two".to_string()));
        assert_eq!(fields[2].value, FieldValue::Inline("null".to_string()));
    }

    #[test]
    fn test_nested_values_become_pretty_blocks() {
        let view = format_payload(&json!({"camera": {"id": 0}, "sizes": [1, 2]}));
        let PayloadView::Fields(fields) = view else {
            panic!("expected fields");
        };
        assert_eq!(fields[0].value, FieldValue::Block("{\n  \"id\": 0\n}".to_string()));
        assert_eq!(fields[1].value, FieldValue::Block("[\n  1,\n  2\n]".to_string()));
    }

    #[test]
    fn test_arrays_use_index_keys() {
        let PayloadView::Fields(fields) = format_payload(&json!(["a", "b"])) else {
            panic!("expected fields");
        };
        assert_eq!(fields[1].key, "1");
        assert_eq!(fields[1].value, FieldValue::Inline("b".to_string()));
    }

    #[test]
    fn test_endpoint_gets_leading_slash() {
        assert_eq!(format_endpoint("disk_space"), "/disk_space");
        assert_eq!(format_endpoint("/disk_space"), "/disk_space");
        assert_eq!(format_endpoint("Form: timelapseForm"), "/Form: timelapseForm");
    }

    #[test]
    fn test_timestamp_has_millis() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 4, 7).unwrap() + chrono::Duration::milliseconds(42);
        assert_eq!(format_timestamp(at), "09:04:07.042");
    }

    #[test]
    fn test_build_node_respects_show_timestamp() {
        let node = build_node("debug-1", "/a", &json!(1), "10:00:00.000", false);
        assert_eq!(node.timestamp, None);
        let node = build_node("debug-1", "/a", &json!(1), "10:00:00.000", true);
        assert_eq!(node.timestamp.as_deref(), Some("10:00:00.000"));
        assert_eq!(node.payload, PayloadView::Scalar("1".to_string()));
    }
}
