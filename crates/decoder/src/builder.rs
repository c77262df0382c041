//! 디코더 빌더 — 정의 문서를 Connectable로 조립
//!
//! 정의 문서에서 속성(`name`, `parents`, `metadata`)과 스테이지를
//! 추출하여 단일 연산자 체인으로 합성합니다. 스테이지 순서 계약:
//!
//! 1. 이미 디코딩된 이벤트를 거르는 암묵적 선두 필터
//! 2. `check` 게이트 (문서 내 위치와 무관하게 항상 두 번째)
//! 3. 나머지 스테이지는 문서에 나타난 순서 그대로
//!
//! 모든 속성 추출과 스테이지 빌드는 래핑되어, 실패 시 바깥 메시지가
//! 실패 지점을 지목하고 내부 원인이 체인으로 이어집니다. 래핑 지점은
//! 에러 로그로도 남습니다.

use std::collections::HashSet;
use std::fmt;

use serde_json::Value;

use logsieve_core::event::DecodeEvent;
use logsieve_core::operator::Operator;

use crate::error::DecoderError;
use crate::registry::{Registry, StageBuilder};
use crate::stage::json_type_name;
use crate::tracer::Tracer;

/// 조립된 디코더 — 그래프에 연결하는 데 필요한 모든 것
///
/// `parents`는 이름 목록일 뿐이며, 다른 Connectable로의 해석은
/// 그래프 조립 시점에 이 코어 바깥에서 일어납니다. 식별자는 `name`입니다.
pub struct Connectable {
    /// 디코더 이름
    pub name: String,
    /// 부모 디코더 이름 목록
    pub parents: Vec<String>,
    /// 합성된 연산자 체인
    pub op: Operator,
    /// 디코더별 트레이서
    pub tracer: Tracer,
}

impl fmt::Debug for Connectable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connectable")
            .field("name", &self.name)
            .field("parents", &self.parents)
            .field("tracer", &self.tracer)
            .finish_non_exhaustive()
    }
}

/// 디코더 정의 문서를 Connectable로 빌드합니다.
///
/// # Errors
/// 정의가 객체가 아니거나, 필수 속성(`name`, `check`)이 없거나,
/// 스테이지 빌드가 실패하면 [`DecoderError`]를 반환합니다.
pub fn build_decoder(def: &Value, registry: &Registry) -> Result<Connectable, DecoderError> {
    let Some(obj) = def.as_object() else {
        let err = DecoderError::NotAnObject {
            got: json_type_name(def).to_owned(),
        };
        tracing::error!(error = %err, "decoder builder expects definition to be an object");
        return Err(err);
    };

    let mut processed: HashSet<&str> = HashSet::new();
    let mut stages: Vec<Operator> = Vec::new();

    // 이미 디코딩된 이벤트를 거르는 암묵적 선두 필터
    stages.push(Box::new(|event: &mut DecodeEvent| !event.is_decoded()));

    // name (필수)
    let name = match obj.get("name") {
        Some(value) => value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| attribute_error("name", value))?,
        None => {
            let err = DecoderError::MissingAttribute { attr: "name" };
            tracing::error!(error = %err, "decoder builder expects definition to have a name");
            return Err(err);
        }
    };
    processed.insert("name");

    // parents (선택)
    let mut parents = Vec::new();
    if let Some(value) = obj.get("parents") {
        let items = value
            .as_array()
            .ok_or_else(|| attribute_error("parents", value))?;
        for item in items {
            let parent = item
                .as_str()
                .ok_or_else(|| attribute_error("parents", item))?;
            parents.push(parent.to_owned());
        }
        processed.insert("parents");
    }

    // metadata (선택) -- 형식만 검증하고 연산자 체인에는 참여하지 않음
    if let Some(value) = obj.get("metadata") {
        let entries = value
            .as_object()
            .ok_or_else(|| attribute_error("metadata", value))?;
        tracing::debug!(decoder = %name, entries = entries.len(), "decoder metadata");
        processed.insert("metadata");
    }

    let tracer = Tracer::new(&name);

    // check (필수) -- 선두 필터 바로 뒤에 고정
    match obj.get("check") {
        Some(check_def) => {
            stages.push(build_stage(registry, "check", check_def, &tracer)?);
            processed.insert("check");
        }
        None => {
            let err = DecoderError::MissingAttribute { attr: "check" };
            tracing::error!(
                decoder = %name,
                error = %err,
                "decoder builder expects definition to have a check stage"
            );
            return Err(err);
        }
    }

    // 나머지 스테이지 -- 정의 문서에 나타난 순서 그대로
    for (stage_name, stage_def) in obj {
        if processed.contains(stage_name.as_str()) {
            continue;
        }
        stages.push(build_stage(registry, stage_name, stage_def, &tracer)?);
    }

    // 전체 스테이지를 단일 연산자로 체이닝
    let op = match registry.get_builder("combinator.chain") {
        Ok(StageBuilder::Combinator(combine)) => combine(stages).map_err(|e| {
            tracing::error!(decoder = %name, error = %e, "decoder builder failed chaining stages");
            DecoderError::Chain {
                source: Box::new(e),
            }
        })?,
        Ok(StageBuilder::Op(_)) => {
            let err = DecoderError::BuilderKind {
                name: "combinator.chain".to_owned(),
                expected: "a combinator builder",
            };
            tracing::error!(decoder = %name, error = %err, "decoder builder failed chaining stages");
            return Err(DecoderError::Chain {
                source: Box::new(err),
            });
        }
        Err(e) => {
            tracing::error!(decoder = %name, error = %e, "decoder builder failed chaining stages");
            return Err(DecoderError::Chain {
                source: Box::new(e),
            });
        }
    };

    Ok(Connectable {
        name,
        parents,
        op,
        tracer,
    })
}

/// 스테이지 하나를 레지스트리에서 빌드하고 실패를 래핑합니다.
fn build_stage(
    registry: &Registry,
    stage_name: &str,
    stage_def: &Value,
    tracer: &Tracer,
) -> Result<Operator, DecoderError> {
    let wrap = |source: DecoderError| {
        tracing::error!(
            decoder = %tracer.name(),
            stage = %stage_name,
            error = %source,
            "decoder builder failed building stage"
        );
        DecoderError::Stage {
            stage: stage_name.to_owned(),
            source: Box::new(source),
        }
    };

    let builder = registry.get_builder(stage_name).map_err(wrap)?;
    let StageBuilder::Op(build) = builder else {
        return Err(wrap(DecoderError::BuilderKind {
            name: stage_name.to_owned(),
            expected: "an operation builder",
        }));
    };

    build(stage_def, tracer.tracer_fn()).map_err(wrap)
}

/// 속성 추출 실패를 래핑하고 로그로 남깁니다.
fn attribute_error(attr: &str, value: &Value) -> DecoderError {
    let err = DecoderError::Attribute {
        attr: attr.to_owned(),
        reason: format!("unexpected {} value", json_type_name(value)),
    };
    tracing::error!(error = %err, "decoder builder encountered malformed attribute");
    err
}
