//! 컴파일된 패턴의 실행기
//!
//! 파서 목록을 입력에 대해 순서대로 실행하고, 파서별 성공/실패를
//! 사람이 읽을 수 있는 트레이스로 누적합니다. 실행 시점의 파싱 실패는
//! 에러가 아니라 `ok = false`인 [`ExecuteResult`]로 표현됩니다.

use std::fmt::Write as _;

use serde_json::Value;

use crate::compile::Parser;
use crate::expr::ExpressionKind;
use crate::extract::{Cursor, extractor_for};

/// 필드명 -> 추출된 값 매핑
///
/// 호출마다 비어 있는 매핑을 새로 만들어 전달합니다. 파서는 여기에
/// 쓰기만 합니다.
pub type ParseResult = serde_json::Map<String, Value>;

/// 실행 결과 — 성공 여부와 파서별 트레이스
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteResult {
    /// 전체 파싱 성공 여부
    pub ok: bool,
    /// 실행 순서대로 기록된 파서별 트레이스 (줄바꿈 구분)
    pub trace: String,
}

/// 컴파일된 패턴 — 불변 파서 목록
///
/// 컴파일 후에는 내부 상태가 변하지 않으므로, 호출마다 별도의
/// [`ParseResult`]를 쓰는 한 여러 스레드에서 동시에 실행해도
/// 안전합니다.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    parsers: Vec<Parser>,
}

impl CompiledPattern {
    pub(crate) fn new(pattern: String, parsers: Vec<Parser>) -> Self {
        Self { pattern, parsers }
    }

    /// 원본 패턴 문자열을 반환합니다.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// 컴파일된 파서 목록을 반환합니다.
    pub fn parsers(&self) -> &[Parser] {
        &self.parsers
    }

    /// 입력 한 줄을 파싱하여 `result`를 채웁니다.
    ///
    /// 필수 파서가 실패하면 즉시 `ok = false`로 끝납니다. 선택 캡처와
    /// 양자택일의 첫 선택지는 실패해도 커서를 원위치로 되돌리고
    /// 다음 파서로 넘어갑니다. 양자택일은 이 동작으로 구현됩니다:
    /// 실패한 OrCapture 바로 뒤에는 항상 두 번째 선택지인 필수 캡처가
    /// 오므로, 추가 되감기는 필요하지 않습니다.
    pub fn run(&self, input: &str, result: &mut ParseResult) -> ExecuteResult {
        let mut cursor = Cursor::new(input);
        let mut trace = String::new();

        for parser in &self.parsers {
            let checkpoint = cursor;

            let Some(extract) = extractor_for(parser.parser_type) else {
                let _ = write!(
                    trace,
                    "Parser[\"{}\"] failure: Missing implementation for parser [{}]",
                    parser.name, parser.name
                );
                return ExecuteResult { ok: false, trace };
            };

            if extract(&mut cursor, parser, result) {
                let _ = writeln!(trace, "Parser[\"{}\"] success", parser.name);
            } else if matches!(
                parser.exp_kind,
                ExpressionKind::OptionalCapture | ExpressionKind::OrCapture
            ) {
                cursor = checkpoint;
            } else {
                let _ = write!(trace, "Parser[\"{}\"] failure", parser.name);
                return ExecuteResult { ok: false, trace };
            }
        }

        ExecuteResult { ok: true, trace }
    }
}
