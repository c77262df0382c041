//! 에러 타입 — 도메인별 에러 정의

/// Logsieve 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogsieveError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 패턴/스키마 컴파일 에러
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// 디코더 빌드 에러
    #[error("build error: {0}")]
    Build(#[from] BuildError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue {
        /// 설정 필드명
        field: String,
        /// 실패 사유
        reason: String,
    },
}

/// 패턴 컴파일 단계 에러
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// 패턴 표현식이 잘못됨
    #[error("invalid pattern expression: {reason}")]
    Pattern { reason: String },

    /// 스키마 설정이 잘못됨
    #[error("invalid schema configuration: {reason}")]
    Schema { reason: String },
}

/// 디코더 빌드 단계 에러
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 디코더 정의 문서가 잘못됨
    #[error("invalid decoder definition: {reason}")]
    InvalidDefinition { reason: String },

    /// 스테이지 빌드 실패
    #[error("failed to build stage '{stage}': {reason}")]
    Stage {
        /// 실패한 스테이지 이름
        stage: String,
        /// 실패 사유
        reason: String,
    },

    /// 레지스트리에 등록되지 않은 빌더
    #[error("unknown stage builder: {name}")]
    UnknownBuilder {
        /// 요청된 빌더 이름
        name: String,
    },
}
