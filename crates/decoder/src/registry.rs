//! 스테이지 빌더 레지스트리
//!
//! 스테이지/연산자 이름을 빌더에 매핑합니다. 레지스트리는 컴파일된
//! 연산자가 아니라 팩토리만 보관하며, 프로세스 시작 시 한 번 구성한
//! 뒤에는 읽기 전용으로 사용합니다. 전역 싱글턴 대신 값으로 주입되며
//! [`Registry::with_defaults`]가 기본 구성을 제공합니다.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use logsieve_core::operator::{Operator, TracerFn};
use logsieve_pattern::SchemaMap;

use crate::error::DecoderError;
use crate::stage;

/// 연산 빌더: 정의 조각과 트레이스 싱크로 연산자를 만듭니다.
pub type OpBuilder = Box<dyn Fn(&Value, TracerFn) -> Result<Operator, DecoderError> + Send + Sync>;

/// 조합기 빌더: 연산자 목록을 단일 연산자로 합성합니다.
pub type CombinatorBuilder =
    Box<dyn Fn(Vec<Operator>) -> Result<Operator, DecoderError> + Send + Sync>;

/// 레지스트리 항목 — 두 종류의 빌더 중 하나
pub enum StageBuilder {
    /// 스테이지 연산 빌더
    Op(OpBuilder),
    /// 연산자 조합기
    Combinator(CombinatorBuilder),
}

/// 스테이지 이름 -> 빌더 매핑
pub struct Registry {
    builders: HashMap<String, StageBuilder>,
}

impl Registry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// 기본 빌더 세트로 레지스트리를 생성합니다.
    ///
    /// `check`, `parse`, `normalize` 스테이지와 `combinator.chain`,
    /// `combinator.broadcast` 조합기가 등록됩니다. parse 빌더는
    /// 전달된 스키마 맵으로 패턴을 컴파일합니다.
    pub fn with_defaults(schema: Arc<SchemaMap>) -> Self {
        let mut registry = Self::new();

        registry.register("check", StageBuilder::Op(Box::new(stage::check::builder)));
        registry.register(
            "parse",
            StageBuilder::Op(Box::new(move |def, tracer| {
                stage::parse::builder(def, tracer, &schema)
            })),
        );
        registry.register(
            "normalize",
            StageBuilder::Op(Box::new(stage::normalize::builder)),
        );
        registry.register(
            "combinator.chain",
            StageBuilder::Combinator(Box::new(stage::combinator::chain)),
        );
        registry.register(
            "combinator.broadcast",
            StageBuilder::Combinator(Box::new(stage::combinator::broadcast)),
        );

        registry
    }

    /// 빌더를 등록합니다. 같은 이름이 있으면 교체됩니다.
    pub fn register(&mut self, name: impl Into<String>, builder: StageBuilder) {
        self.builders.insert(name.into(), builder);
    }

    /// 이름으로 빌더를 조회합니다.
    pub fn get_builder(&self, name: &str) -> Result<&StageBuilder, DecoderError> {
        self.builders
            .get(name)
            .ok_or_else(|| DecoderError::UnknownBuilder {
                name: name.to_owned(),
            })
    }

    /// 이름이 등록되어 있는지 확인합니다.
    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// 등록된 빌더 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    /// 레지스트리가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults(Arc::new(SchemaMap::new()))
    }
}
