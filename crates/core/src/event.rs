//! 이벤트 — 디코더 파이프라인을 흐르는 기본 단위
//!
//! [`DecodeEvent`]는 JSON 페이로드와 디코딩 여부 플래그를 가지며,
//! 모든 디코더 스테이지는 이 타입 위에서 동작합니다.
//! [`EventMetadata`]는 이벤트 발생 시각과 분산 추적 ID를 담습니다.

use std::fmt;
use std::time::SystemTime;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 원시 로그 한 줄이 저장되는 필드 경로
pub const RAW_EVENT_PATH: &str = "event.original";

/// 이벤트 메타데이터 — 모든 이벤트에 공통으로 포함되는 추적 정보
///
/// 각 이벤트의 발생 시각, 생성 모듈, 분산 추적 ID를 담고 있어
/// 이벤트 흐름을 추적하고 디버깅할 수 있습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// 이벤트 발생 시각
    pub timestamp: SystemTime,
    /// 이벤트를 생성한 모듈명 (예: "syslog-collector")
    pub source_module: String,
    /// 분산 추적 ID — 같은 흐름의 이벤트를 연결합니다
    pub trace_id: String,
}

impl EventMetadata {
    /// 기존 trace_id를 사용하여 새 메타데이터를 생성합니다.
    pub fn new(source_module: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            source_module: source_module.into(),
            trace_id: trace_id.into(),
        }
    }

    /// 새로운 UUID v4 trace_id를 생성하여 메타데이터를 만듭니다.
    pub fn with_new_trace(source_module: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            source_module: source_module.into(),
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl fmt::Display for EventMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] source={} trace={}",
            unix_timestamp_str(self.timestamp),
            self.source_module,
            self.trace_id,
        )
    }
}

/// 디코더 파이프라인을 흐르는 이벤트
///
/// 페이로드는 JSON 문서이며, 필드는 점으로 구분된 경로
/// (예: `source.ip`)로 접근합니다. `decoded` 플래그는 어떤 디코더가
/// 이 이벤트를 성공적으로 처리했는지를 나타내며, 디코더 체인의
/// 선두 필터가 이 플래그로 이미 처리된 이벤트를 걸러냅니다.
#[derive(Debug, Clone)]
pub struct DecodeEvent {
    /// 이벤트 고유 ID
    pub id: String,
    /// 이벤트 메타데이터
    pub metadata: EventMetadata,
    /// JSON 페이로드
    payload: Value,
    /// 디코딩 완료 여부
    decoded: bool,
}

impl DecodeEvent {
    /// 새로운 trace를 시작하는 이벤트를 생성합니다.
    pub fn new(payload: Value, source_module: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            metadata: EventMetadata::with_new_trace(source_module),
            payload,
            decoded: false,
        }
    }

    /// 기존 trace에 연결된 이벤트를 생성합니다.
    pub fn with_trace(
        payload: Value,
        source_module: impl Into<String>,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            metadata: EventMetadata::new(source_module, trace_id),
            payload,
            decoded: false,
        }
    }

    /// 원시 로그 한 줄로부터 이벤트를 생성합니다.
    ///
    /// 로그 내용은 `event.original` 필드에 문자열로 저장됩니다.
    pub fn from_raw(raw: Bytes, source_module: impl Into<String>) -> Self {
        let line = String::from_utf8_lossy(&raw).into_owned();
        let mut event = Self::new(Value::Object(Map::new()), source_module);
        event.set(RAW_EVENT_PATH, Value::String(line));
        event
    }

    /// 디코딩 완료 여부를 반환합니다.
    pub fn is_decoded(&self) -> bool {
        self.decoded
    }

    /// 이벤트를 디코딩 완료 상태로 표시합니다.
    pub fn set_decoded(&mut self) {
        self.decoded = true;
    }

    /// 전체 페이로드에 대한 참조를 반환합니다.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// 점으로 구분된 경로의 필드 값을 반환합니다.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.payload;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// 점으로 구분된 경로에 값을 기록합니다.
    ///
    /// 중간 경로의 객체는 없으면 생성합니다. 경로 중간에 객체가 아닌
    /// 값이 이미 있으면 기록하지 않고 `false`를 반환합니다.
    pub fn set(&mut self, path: &str, value: Value) -> bool {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, intermediate)) = segments.split_last() else {
            return false;
        };

        let mut current = &mut self.payload;
        for segment in intermediate {
            let Some(obj) = current.as_object_mut() else {
                return false;
            };
            current = obj
                .entry((*segment).to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
        }

        match current.as_object_mut() {
            Some(obj) => {
                obj.insert((*last).to_owned(), value);
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for DecodeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DecodeEvent[{}] source={} decoded={}",
            &self.id[..8.min(self.id.len())],
            self.metadata.source_module,
            self.decoded,
        )
    }
}

/// SystemTime을 사람이 읽을 수 있는 형태로 변환합니다.
fn unix_timestamp_str(time: SystemTime) -> String {
    match time.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(duration) => {
            let secs = duration.as_secs();
            format!("{secs}")
        }
        Err(_) => "unknown".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_metadata_new_preserves_trace_id() {
        let meta = EventMetadata::new("test-module", "trace-abc-123");
        assert_eq!(meta.source_module, "test-module");
        assert_eq!(meta.trace_id, "trace-abc-123");
        assert!(meta.timestamp <= SystemTime::now());
    }

    #[test]
    fn event_metadata_with_new_trace_generates_uuid() {
        let meta = EventMetadata::with_new_trace("test-module");
        // UUID v4 형식 확인: 8-4-4-4-12
        assert_eq!(meta.trace_id.len(), 36);
        assert_eq!(meta.trace_id.chars().filter(|c| *c == '-').count(), 4);
    }

    #[test]
    fn event_metadata_display() {
        let meta = EventMetadata::new("syslog-collector", "trace-xyz");
        let display = meta.to_string();
        assert!(display.contains("syslog-collector"));
        assert!(display.contains("trace-xyz"));
    }

    #[test]
    fn new_event_is_not_decoded() {
        let event = DecodeEvent::new(json!({}), "test");
        assert!(!event.is_decoded());
        assert!(!event.id.is_empty());
    }

    #[test]
    fn set_decoded_marks_event() {
        let mut event = DecodeEvent::new(json!({}), "test");
        event.set_decoded();
        assert!(event.is_decoded());
    }

    #[test]
    fn from_raw_stores_original_line() {
        let event = DecodeEvent::from_raw(Bytes::from_static(b"Failed password"), "file-collector");
        assert_eq!(
            event.get(RAW_EVENT_PATH),
            Some(&Value::String("Failed password".to_owned()))
        );
        assert_eq!(event.metadata.source_module, "file-collector");
    }

    #[test]
    fn get_nested_field() {
        let event = DecodeEvent::new(json!({"source": {"ip": "10.0.0.1"}}), "test");
        assert_eq!(event.get("source.ip"), Some(&json!("10.0.0.1")));
        assert_eq!(event.get("source.port"), None);
        assert_eq!(event.get("missing.path"), None);
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut event = DecodeEvent::new(json!({}), "test");
        assert!(event.set("source.geo.country", json!("KR")));
        assert_eq!(event.get("source.geo.country"), Some(&json!("KR")));
    }

    #[test]
    fn set_overwrites_existing_value() {
        let mut event = DecodeEvent::new(json!({"source": {"ip": "10.0.0.1"}}), "test");
        assert!(event.set("source.ip", json!("192.168.0.1")));
        assert_eq!(event.get("source.ip"), Some(&json!("192.168.0.1")));
    }

    #[test]
    fn set_fails_through_non_object() {
        let mut event = DecodeEvent::new(json!({"source": "scalar"}), "test");
        assert!(!event.set("source.ip", json!("10.0.0.1")));
        // 기존 값은 그대로 유지
        assert_eq!(event.get("source"), Some(&json!("scalar")));
    }

    #[test]
    fn with_trace_preserves_trace_id() {
        let event = DecodeEvent::with_trace(json!({}), "test", "my-trace-id");
        assert_eq!(event.metadata.trace_id, "my-trace-id");
    }

    #[test]
    fn event_display() {
        let event = DecodeEvent::new(json!({}), "syslog-collector");
        let display = event.to_string();
        assert!(display.contains("DecodeEvent"));
        assert!(display.contains("syslog-collector"));
    }

    #[test]
    fn events_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<DecodeEvent>();
        assert_send_sync::<EventMetadata>();
    }
}
