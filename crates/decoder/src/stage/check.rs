//! check 스테이지 — 디코더 게이트 조건
//!
//! 정의는 필드 경로를 기대 값에 매핑하는 객체이며, 모든 조건이
//! AND로 결합됩니다. 키에 수정자를 붙여 매칭 방식을 바꿀 수 있습니다:
//!
//! ```yaml
//! check:
//!   event.module: sshd                     # 값 일치
//!   event.original|contains: "Failed"      # 부분 문자열
//!   host.name|startswith: web-             # 접두사
//!   source.address|regex: "^10\\."         # 정규식
//! ```
//!
//! 정규식은 빌드 시점에 한 번만 컴파일됩니다. 조건이 만족되지 않으면
//! 이벤트는 걸러지고 실패한 필드가 트레이스에 기록됩니다.

use regex::Regex;
use serde_json::Value;

use logsieve_core::event::DecodeEvent;
use logsieve_core::operator::{Operator, TracerFn};

use crate::error::DecoderError;

/// 수정자별 매칭 방식
enum Matcher {
    /// JSON 값 일치 (문자열, 숫자, 불리언)
    Exact(Value),
    /// 부분 문자열 포함
    Contains(String),
    /// 접두사 일치
    StartsWith(String),
    /// 접미사 일치
    EndsWith(String),
    /// 정규식 매칭
    Regex(Regex),
}

/// 조건 하나 — 필드 경로와 매칭 방식
struct Condition {
    path: String,
    matcher: Matcher,
}

impl Condition {
    fn matches(&self, event: &DecodeEvent) -> bool {
        let Some(actual) = event.get(&self.path) else {
            return false;
        };

        match &self.matcher {
            Matcher::Exact(expected) => actual == expected,
            Matcher::Contains(needle) => {
                actual.as_str().is_some_and(|s| s.contains(needle))
            }
            Matcher::StartsWith(prefix) => {
                actual.as_str().is_some_and(|s| s.starts_with(prefix))
            }
            Matcher::EndsWith(suffix) => {
                actual.as_str().is_some_and(|s| s.ends_with(suffix))
            }
            Matcher::Regex(regex) => actual.as_str().is_some_and(|s| regex.is_match(s)),
        }
    }
}

/// check 스테이지 빌더
///
/// 정의 객체의 각 멤버를 조건으로 컴파일하여 필터 연산자를 만듭니다.
pub fn builder(def: &Value, tracer: TracerFn) -> Result<Operator, DecoderError> {
    let Some(entries) = def.as_object() else {
        return Err(DecoderError::StageDefinition {
            stage: "check".to_owned(),
            reason: format!("expected object, got {}", super::json_type_name(def)),
        });
    };

    if entries.is_empty() {
        return Err(DecoderError::StageDefinition {
            stage: "check".to_owned(),
            reason: "condition object must not be empty".to_owned(),
        });
    }

    let mut conditions = Vec::with_capacity(entries.len());
    for (key, expected) in entries {
        conditions.push(parse_condition(key, expected)?);
    }

    Ok(Box::new(move |event| {
        for condition in &conditions {
            if !condition.matches(event) {
                tracer(&format!("[check] condition failed on '{}'", condition.path));
                return false;
            }
        }
        true
    }))
}

/// `경로` 또는 `경로|수정자` 키를 조건으로 변환합니다.
fn parse_condition(key: &str, expected: &Value) -> Result<Condition, DecoderError> {
    let (path, modifier) = match key.split_once('|') {
        Some((path, modifier)) => (path, Some(modifier)),
        None => (key, None),
    };

    if path.is_empty() {
        return Err(DecoderError::StageDefinition {
            stage: "check".to_owned(),
            reason: format!("empty field path in condition key '{key}'"),
        });
    }

    let matcher = match modifier {
        None => Matcher::Exact(expected.clone()),
        Some(name) => {
            // 수정자 매칭은 문자열 값에 대해서만 정의됨
            let Some(text) = expected.as_str() else {
                return Err(DecoderError::StageDefinition {
                    stage: "check".to_owned(),
                    reason: format!("modifier '{name}' requires a string value for '{path}'"),
                });
            };
            match name {
                "contains" => Matcher::Contains(text.to_owned()),
                "startswith" => Matcher::StartsWith(text.to_owned()),
                "endswith" => Matcher::EndsWith(text.to_owned()),
                "regex" => Matcher::Regex(Regex::new(text)?),
                other => {
                    return Err(DecoderError::StageDefinition {
                        stage: "check".to_owned(),
                        reason: format!("unknown condition modifier '{other}'"),
                    });
                }
            }
        }
    };

    Ok(Condition {
        path: path.to_owned(),
        matcher,
    })
}
