//! parse 스테이지 — 패턴 기반 필드 추출
//!
//! 정의는 `patterns` 배열을 가진 객체이며, 각 항목은 대상 필드를
//! 패턴 문자열에 매핑하는 단일 멤버 객체입니다:
//!
//! ```yaml
//! parse:
//!   patterns:
//!     - event.original: "<source.ip>:<source.port>"
//!     - event.original: "audit: <_fields/map>"
//! ```
//!
//! 패턴은 빌드 시점에 컴파일되며, 실행 시점의 파싱 실패는 이벤트를
//! 거르지 않고 트레이스로만 보고됩니다(매핑 의미론). 성공하면 추출된
//! 필드가 이벤트에 기록되고 이벤트는 디코딩 완료로 표시됩니다.
//! 이름이 `_`로 시작하는 임시 필드는 이벤트에 기록하지 않습니다.

use serde_json::Value;

use logsieve_core::operator::{Operator, TracerFn};
use logsieve_pattern::{ParseResult, SchemaMap};

use crate::error::DecoderError;
use crate::stage::combinator;

/// parse 스테이지 빌더
///
/// 각 패턴 항목을 연산자로 컴파일한 뒤 broadcast로 합성합니다.
pub fn builder(
    def: &Value,
    tracer: TracerFn,
    schema: &SchemaMap,
) -> Result<Operator, DecoderError> {
    let Some(obj) = def.as_object() else {
        return Err(DecoderError::StageDefinition {
            stage: "parse".to_owned(),
            reason: format!("expected object, got {}", super::json_type_name(def)),
        });
    };

    let Some(patterns) = obj.get("patterns").and_then(Value::as_array) else {
        return Err(DecoderError::StageDefinition {
            stage: "parse".to_owned(),
            reason: "definition must have a 'patterns' array".to_owned(),
        });
    };

    if patterns.is_empty() {
        return Err(DecoderError::StageDefinition {
            stage: "parse".to_owned(),
            reason: "'patterns' must have at least one entry".to_owned(),
        });
    }

    let mut operators = Vec::with_capacity(patterns.len());
    for entry in patterns {
        operators.push(pattern_operator(entry, &tracer, schema)?);
    }

    combinator::broadcast(operators)
}

/// `{대상필드: 패턴}` 항목 하나를 연산자로 컴파일합니다.
fn pattern_operator(
    entry: &Value,
    tracer: &TracerFn,
    schema: &SchemaMap,
) -> Result<Operator, DecoderError> {
    let Some((target, pattern_value)) = entry.as_object().and_then(|o| o.iter().next()) else {
        return Err(DecoderError::StageDefinition {
            stage: "parse".to_owned(),
            reason: "each patterns entry must be a single-member object".to_owned(),
        });
    };

    let Some(pattern_text) = pattern_value.as_str() else {
        return Err(DecoderError::StageDefinition {
            stage: "parse".to_owned(),
            reason: format!("pattern for '{target}' must be a string"),
        });
    };

    let compiled = logsieve_pattern::compile(pattern_text, schema)?;
    let target = target.clone();
    let pattern_text = pattern_text.to_owned();
    let tracer = tracer.clone();

    Ok(Box::new(move |event| {
        let Some(field) = event.get(&target) else {
            tracer(&format!("{{{target}: {pattern_text}}} field not present"));
            return true;
        };
        let Some(text) = field.as_str().map(str::to_owned) else {
            tracer(&format!("{{{target}: {pattern_text}}} is not a string"));
            return true;
        };

        let mut result = ParseResult::new();
        let outcome = compiled.run(&text, &mut result);
        if !outcome.ok {
            tracer(&format!(
                "{{{target}: {pattern_text}}} failed to parse\nParser trace: {}",
                outcome.trace
            ));
            return true;
        }

        for (field_name, value) in result {
            // 임시 필드는 최종 이벤트에서 제거됨
            if field_name.starts_with('_') {
                continue;
            }
            if !event.set(&field_name, value) {
                tracer(&format!("{{{target}}} failed to set {field_name}"));
                return true;
            }
        }

        event.set_decoded();
        tracer(&format!(
            "{{{target}: {pattern_text}}} parsed successfully\nParser trace: {}",
            outcome.trace
        ));
        true
    }))
}
