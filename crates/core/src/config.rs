//! 엔진 설정 — 스키마/디코더 경로 및 런타임 한도

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, LogsieveError};

/// 엔진 설정
///
/// 스키마 설정 파일과 디코더 정의 디렉토리의 위치, 디코더별
/// 트레이스 채널 용량을 지정합니다. 파일 로딩 자체는 엔진 바깥의
/// 자산 로더가 수행합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 스키마 설정 파일 경로 (ECS 필드명 -> 파서 타입 JSON)
    pub schema_path: String,
    /// 디코더 정의 디렉토리 경로
    pub decoder_dir: String,
    /// 디코더별 트레이스 채널 용량
    pub trace_capacity: usize,
    /// 스키마에 없는 캡처 필드를 컴파일 에러로 취급할지 여부
    pub strict_schema: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schema_path: "/etc/logsieve/schema.json".to_owned(),
            decoder_dir: "/etc/logsieve/decoders".to_owned(),
            trace_capacity: 256,
            strict_schema: false,
        }
    }
}

impl EngineConfig {
    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogsieveError> {
        const MAX_TRACE_CAPACITY: usize = 65_536;

        if self.schema_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "schema_path".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if self.decoder_dir.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "decoder_dir".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if self.trace_capacity == 0 || self.trace_capacity > MAX_TRACE_CAPACITY {
            return Err(ConfigError::InvalidValue {
                field: "trace_capacity".to_owned(),
                reason: format!("must be 1-{MAX_TRACE_CAPACITY}"),
            }
            .into());
        }

        Ok(())
    }
}

/// 엔진 설정 빌더
#[derive(Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 스키마 설정 파일 경로를 지정합니다.
    pub fn schema_path(mut self, path: impl Into<String>) -> Self {
        self.config.schema_path = path.into();
        self
    }

    /// 디코더 정의 디렉토리를 지정합니다.
    pub fn decoder_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.decoder_dir = dir.into();
        self
    }

    /// 트레이스 채널 용량을 지정합니다.
    pub fn trace_capacity(mut self, capacity: usize) -> Self {
        self.config.trace_capacity = capacity;
        self
    }

    /// 스키마 엄격 모드를 지정합니다.
    pub fn strict_schema(mut self, strict: bool) -> Self {
        self.config.strict_schema = strict;
        self
    }

    /// 설정을 검증하고 `EngineConfig`를 생성합니다.
    pub fn build(self) -> Result<EngineConfig, LogsieveError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
