//! 스키마 맵 — ECS 필드명을 파서 타입에 매핑
//!
//! 스키마 설정은 필드명을 타입명 문자열에 매핑하는 JSON 객체입니다.
//! 캡처 이름이 스키마에 있으면 해당 타입의 추출기가 선택되고,
//! 없으면 기본값(endToken까지 소비하는 `Any`)이 사용됩니다.
//!
//! # 설정 예시
//! ```json
//! {
//!   "source.ip": "ip",
//!   "source.port": "number",
//!   "event.created": "timestamp",
//!   "message": "any"
//! }
//! ```

use std::collections::HashMap;

use crate::compile::ParserType;
use crate::error::PatternError;

/// 스키마 타입명 -> 파서 타입
///
/// `keyword`는 경계까지 소비하는 `Any`, `any`는 입력 끝까지 소비하는
/// `ToEnd`로 매핑됩니다.
fn schema_parser_type(name: &str) -> Option<ParserType> {
    match name {
        "keyword" => Some(ParserType::Any),
        "any" => Some(ParserType::ToEnd),
        "ip" => Some(ParserType::Ip),
        "timestamp" => Some(ParserType::Timestamp),
        "url" => Some(ParserType::Url),
        "json" => Some(ParserType::Json),
        "map" => Some(ParserType::Map),
        "domain" => Some(ParserType::Domain),
        "filepath" => Some(ParserType::FilePath),
        "useragent" => Some(ParserType::UserAgent),
        "number" => Some(ParserType::Number),
        "quoted" => Some(ParserType::QuotedString),
        "boolean" => Some(ParserType::Boolean),
        _ => None,
    }
}

/// `_` 임시 캡처가 옵션으로 지정할 수 있는 타입명 표
pub(crate) fn temp_parser_type(name: &str) -> Option<ParserType> {
    match name {
        "json" => Some(ParserType::Json),
        "map" => Some(ParserType::Map),
        "timestamp" => Some(ParserType::Timestamp),
        "domain" => Some(ParserType::Domain),
        "filepath" => Some(ParserType::FilePath),
        "useragent" => Some(ParserType::UserAgent),
        "url" => Some(ParserType::Url),
        "quoted_string" => Some(ParserType::QuotedString),
        "ip" => Some(ParserType::Ip),
        "number" => Some(ParserType::Number),
        "toend" => Some(ParserType::ToEnd),
        _ => None,
    }
}

/// 필드명 -> 파서 타입 매핑
///
/// 프로세스 시작 시 한 번 구성한 뒤에는 읽기 전용으로 공유합니다.
#[derive(Debug, Clone, Default)]
pub struct SchemaMap {
    map: HashMap<String, ParserType>,
}

impl SchemaMap {
    /// 빈 스키마 맵을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON 설정 문서에서 스키마 맵을 구성합니다.
    ///
    /// 알 수 없는 타입명을 가진 엔트리는 경고 로그를 남기고
    /// 건너뜁니다. 문서 자체가 JSON 객체가 아니면 에러입니다.
    pub fn configure(config: &str) -> Result<Self, PatternError> {
        if config.is_empty() {
            return Err(PatternError::Schema {
                reason: "schema configuration is empty".to_owned(),
            });
        }

        let doc: serde_json::Value =
            serde_json::from_str(config).map_err(|e| PatternError::Schema {
                reason: format!("not a valid JSON document: {e}"),
            })?;

        let Some(entries) = doc.as_object() else {
            return Err(PatternError::Schema {
                reason: "schema configuration must be a JSON object".to_owned(),
            });
        };

        let mut map = HashMap::with_capacity(entries.len());
        for (field, type_value) in entries {
            let Some(type_name) = type_value.as_str() else {
                tracing::warn!(field = %field, "schema entry is not a string, skipping");
                continue;
            };
            match schema_parser_type(type_name) {
                Some(parser_type) => {
                    map.insert(field.clone(), parser_type);
                }
                None => {
                    tracing::warn!(
                        field = %field,
                        parser_type = %type_name,
                        "unknown parser type in schema, skipping"
                    );
                }
            }
        }

        Ok(Self { map })
    }

    /// 단일 매핑을 추가합니다.
    pub fn insert(&mut self, field: impl Into<String>, parser_type: ParserType) {
        self.map.insert(field.into(), parser_type);
    }

    /// 필드의 파서 타입을 조회합니다.
    pub fn get(&self, field: &str) -> Option<ParserType> {
        self.map.get(field).copied()
    }

    /// 등록된 매핑 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// 매핑이 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configure_from_json() {
        let schema = SchemaMap::configure(
            r#"{"source.ip": "ip", "source.port": "number", "message": "keyword"}"#,
        )
        .unwrap();
        assert_eq!(schema.get("source.ip"), Some(ParserType::Ip));
        assert_eq!(schema.get("source.port"), Some(ParserType::Number));
        assert_eq!(schema.get("message"), Some(ParserType::Any));
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn keyword_maps_to_any_and_any_maps_to_toend() {
        let schema =
            SchemaMap::configure(r#"{"a": "keyword", "b": "any"}"#).unwrap();
        assert_eq!(schema.get("a"), Some(ParserType::Any));
        assert_eq!(schema.get("b"), Some(ParserType::ToEnd));
    }

    #[test]
    fn unknown_type_is_skipped() {
        let schema =
            SchemaMap::configure(r#"{"good": "ip", "bad": "hologram"}"#).unwrap();
        assert_eq!(schema.get("good"), Some(ParserType::Ip));
        assert_eq!(schema.get("bad"), None);
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn non_string_entry_is_skipped() {
        let schema = SchemaMap::configure(r#"{"good": "ip", "bad": 42}"#).unwrap();
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn empty_config_fails() {
        assert!(matches!(
            SchemaMap::configure(""),
            Err(PatternError::Schema { .. })
        ));
    }

    #[test]
    fn invalid_json_fails() {
        assert!(matches!(
            SchemaMap::configure("{not json"),
            Err(PatternError::Schema { .. })
        ));
    }

    #[test]
    fn non_object_config_fails() {
        assert!(matches!(
            SchemaMap::configure(r#"["ip"]"#),
            Err(PatternError::Schema { .. })
        ));
    }

    #[test]
    fn temp_type_table_covers_explicit_types() {
        assert_eq!(temp_parser_type("json"), Some(ParserType::Json));
        assert_eq!(temp_parser_type("quoted_string"), Some(ParserType::QuotedString));
        assert_eq!(temp_parser_type("toend"), Some(ParserType::ToEnd));
        assert_eq!(temp_parser_type("keyword"), None);
    }

    #[test]
    fn insert_and_get() {
        let mut schema = SchemaMap::new();
        assert!(schema.is_empty());
        schema.insert("source.ip", ParserType::Ip);
        assert_eq!(schema.get("source.ip"), Some(ParserType::Ip));
    }
}
