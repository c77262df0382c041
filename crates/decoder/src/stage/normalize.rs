//! normalize 스테이지 — 필드 할당
//!
//! 정의는 필드 경로를 값에 매핑하는 객체이며, 정의 순서대로
//! 할당됩니다. `$`로 시작하는 문자열 값은 다른 필드의 복사입니다:
//!
//! ```yaml
//! normalize:
//!   event.kind: event
//!   event.severity: 3
//!   destination.address: $destination.ip
//! ```
//!
//! 참조된 필드가 없으면 해당 할당만 건너뛰고 트레이스에 기록합니다.
//! 매핑 의미론이므로 이벤트를 거르지 않습니다.

use serde_json::Value;

use logsieve_core::operator::{Operator, TracerFn};

use crate::error::DecoderError;

/// 할당 값 — 리터럴 또는 다른 필드 참조
enum Assignment {
    Literal(Value),
    FieldRef(String),
}

/// normalize 스테이지 빌더
pub fn builder(def: &Value, tracer: TracerFn) -> Result<Operator, DecoderError> {
    let Some(entries) = def.as_object() else {
        return Err(DecoderError::StageDefinition {
            stage: "normalize".to_owned(),
            reason: format!("expected object, got {}", super::json_type_name(def)),
        });
    };

    if entries.is_empty() {
        return Err(DecoderError::StageDefinition {
            stage: "normalize".to_owned(),
            reason: "assignment object must not be empty".to_owned(),
        });
    }

    let mut assignments = Vec::with_capacity(entries.len());
    for (path, value) in entries {
        let assignment = match value.as_str() {
            Some(text) if text.starts_with('$') => {
                Assignment::FieldRef(text[1..].to_owned())
            }
            _ => Assignment::Literal(value.clone()),
        };
        assignments.push((path.clone(), assignment));
    }

    Ok(Box::new(move |event| {
        for (path, assignment) in &assignments {
            let value = match assignment {
                Assignment::Literal(value) => value.clone(),
                Assignment::FieldRef(source) => match event.get(source) {
                    Some(found) => found.clone(),
                    None => {
                        tracer(&format!(
                            "[normalize] referenced field '{source}' not present, skipping '{path}'"
                        ));
                        continue;
                    }
                },
            };

            if !event.set(path, value) {
                tracer(&format!("[normalize] failed to set '{path}'"));
            }
        }
        true
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsieve_core::event::DecodeEvent;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn noop_tracer() -> TracerFn {
        Arc::new(|_| {})
    }

    #[test]
    fn assigns_literal_values_in_order() {
        let op = builder(
            &json!({"event.kind": "event", "event.severity": 3}),
            noop_tracer(),
        )
        .unwrap();

        let mut event = DecodeEvent::new(json!({}), "test");
        assert!(op(&mut event));
        assert_eq!(event.get("event.kind"), Some(&json!("event")));
        assert_eq!(event.get("event.severity"), Some(&json!(3)));
    }

    #[test]
    fn field_reference_copies_value() {
        let op = builder(
            &json!({"destination.address": "$destination.ip"}),
            noop_tracer(),
        )
        .unwrap();

        let mut event = DecodeEvent::new(json!({"destination": {"ip": "10.0.0.9"}}), "test");
        assert!(op(&mut event));
        assert_eq!(event.get("destination.address"), Some(&json!("10.0.0.9")));
    }

    #[test]
    fn missing_reference_is_skipped_and_traced() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let messages_clone = Arc::clone(&messages);
        let tracer: TracerFn = Arc::new(move |m| messages_clone.lock().unwrap().push(m.to_owned()));

        let op = builder(&json!({"a": "$missing.field", "b": "kept"}), tracer).unwrap();

        let mut event = DecodeEvent::new(json!({}), "test");
        assert!(op(&mut event));
        assert_eq!(event.get("a"), None);
        assert_eq!(event.get("b"), Some(&json!("kept")));
        assert!(
            messages
                .lock()
                .unwrap()
                .iter()
                .any(|m| m.contains("missing.field"))
        );
    }

    #[test]
    fn later_assignment_can_use_earlier_one() {
        // 순서 보존: 앞선 할당이 만든 필드를 뒤에서 참조 가능
        let op = builder(
            &json!({"first": "value", "second": "$first"}),
            noop_tracer(),
        )
        .unwrap();

        let mut event = DecodeEvent::new(json!({}), "test");
        assert!(op(&mut event));
        assert_eq!(event.get("second"), Some(&json!("value")));
    }

    #[test]
    fn non_object_definition_fails_build() {
        assert!(matches!(
            builder(&json!("scalar"), noop_tracer()),
            Err(DecoderError::StageDefinition { .. })
        ));
    }

    #[test]
    fn empty_definition_fails_build() {
        assert!(matches!(
            builder(&json!({}), noop_tracer()),
            Err(DecoderError::StageDefinition { .. })
        ));
    }

    #[test]
    fn set_failure_is_traced() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let messages_clone = Arc::clone(&messages);
        let tracer: TracerFn = Arc::new(move |m| messages_clone.lock().unwrap().push(m.to_owned()));

        let op = builder(&json!({"scalar.sub": "x"}), tracer).unwrap();
        // "scalar"가 객체가 아니므로 기록 실패
        let mut event = DecodeEvent::new(json!({"scalar": 1}), "test");
        assert!(op(&mut event));
        assert!(
            messages
                .lock()
                .unwrap()
                .iter()
                .any(|m| m.contains("failed to set"))
        );
    }
}
