//! 디코더 빌드 에러 타입
//!
//! 빌드 실패는 중첩 에러 체인으로 표현됩니다: 바깥 메시지가 실패한
//! 속성/스테이지를 지목하고, `source`가 내부 원인을 담습니다.
//! `From<DecoderError> for LogsieveError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use logsieve_core::error::{BuildError, LogsieveError};
use logsieve_pattern::PatternError;

/// 디코더 빌드 에러
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    /// 정의 문서 최상위가 객체가 아님
    #[error("decoder definition must be an object, got {got}")]
    NotAnObject {
        /// 실제 JSON 타입명
        got: String,
    },

    /// 필수 속성 누락
    #[error("decoder definition is missing required attribute '{attr}'")]
    MissingAttribute {
        /// 누락된 속성 이름
        attr: &'static str,
    },

    /// 속성 값의 형식이 잘못됨
    #[error("failed to read decoder attribute '{attr}': {reason}")]
    Attribute {
        /// 속성 이름
        attr: String,
        /// 실패 사유
        reason: String,
    },

    /// 레지스트리에 등록되지 않은 빌더
    #[error("unknown stage builder '{name}'")]
    UnknownBuilder {
        /// 요청된 빌더 이름
        name: String,
    },

    /// 빌더 종류 불일치 (연산 빌더 자리에 조합기 등)
    #[error("builder '{name}' is not {expected}")]
    BuilderKind {
        /// 빌더 이름
        name: String,
        /// 기대한 종류
        expected: &'static str,
    },

    /// 스테이지 정의 내용이 잘못됨
    #[error("invalid definition for stage '{stage}': {reason}")]
    StageDefinition {
        /// 스테이지 이름
        stage: String,
        /// 실패 사유
        reason: String,
    },

    /// 스테이지 빌드 실패 (원인 체인 포함)
    #[error("failed to build stage '{stage}'")]
    Stage {
        /// 실패한 스테이지 이름
        stage: String,
        /// 내부 원인
        #[source]
        source: Box<DecoderError>,
    },

    /// 전체 스테이지 체이닝 실패
    #[error("failed to chain decoder stages")]
    Chain {
        /// 내부 원인
        #[source]
        source: Box<DecoderError>,
    },

    /// 조합기에 빈 연산자 목록이 전달됨
    #[error("combinator requires at least one operator")]
    EmptyCombinator,

    /// 패턴 컴파일 실패
    #[error("pattern compile error: {0}")]
    Pattern(#[from] PatternError),

    /// 정규식 컴파일 실패
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<DecoderError> for LogsieveError {
    fn from(err: DecoderError) -> Self {
        match err {
            DecoderError::Stage { ref stage, .. } => LogsieveError::Build(BuildError::Stage {
                stage: stage.clone(),
                reason: err.to_string(),
            }),
            DecoderError::UnknownBuilder { name } => {
                LogsieveError::Build(BuildError::UnknownBuilder { name })
            }
            other => LogsieveError::Build(BuildError::InvalidDefinition {
                reason: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn stage_error_carries_source_chain() {
        let err = DecoderError::Stage {
            stage: "check".to_owned(),
            source: Box::new(DecoderError::StageDefinition {
                stage: "check".to_owned(),
                reason: "expected object".to_owned(),
            }),
        };
        assert!(err.to_string().contains("check"));
        let cause = err.source().expect("must have source");
        assert!(cause.to_string().contains("expected object"));
    }

    #[test]
    fn converts_to_logsieve_build_error() {
        let err = DecoderError::MissingAttribute { attr: "name" };
        let core_err: LogsieveError = err.into();
        assert!(matches!(
            core_err,
            LogsieveError::Build(BuildError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn unknown_builder_maps_to_dedicated_variant() {
        let err = DecoderError::UnknownBuilder {
            name: "enrich".to_owned(),
        };
        let core_err: LogsieveError = err.into();
        assert!(matches!(
            core_err,
            LogsieveError::Build(BuildError::UnknownBuilder { .. })
        ));
    }

    #[test]
    fn pattern_error_converts() {
        let err: DecoderError = PatternError::Empty.into();
        assert!(matches!(err, DecoderError::Pattern(_)));
    }
}
