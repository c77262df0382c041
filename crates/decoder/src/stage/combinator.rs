//! 연산자 조합기 — chain(AND)과 broadcast(전체 적용)

use logsieve_core::operator::Operator;

use crate::error::DecoderError;

/// 연산자들을 순서대로 연결합니다.
///
/// 앞선 연산자가 이벤트를 거르면(`false`) 뒤의 연산자는 실행되지
/// 않습니다. 디코더의 전체 스테이지 목록이 이 조합기로 합성됩니다.
pub fn chain(operators: Vec<Operator>) -> Result<Operator, DecoderError> {
    if operators.is_empty() {
        return Err(DecoderError::EmptyCombinator);
    }

    Ok(Box::new(move |event| {
        operators.iter().all(|operator| operator(event))
    }))
}

/// 모든 연산자를 이벤트에 적용하고 항상 통과시킵니다.
///
/// 개별 연산자의 반환값은 무시됩니다. parse 스테이지의 패턴 목록처럼
/// 여러 매핑을 나란히 시도할 때 사용합니다.
pub fn broadcast(operators: Vec<Operator>) -> Result<Operator, DecoderError> {
    if operators.is_empty() {
        return Err(DecoderError::EmptyCombinator);
    }

    Ok(Box::new(move |event| {
        for operator in &operators {
            operator(event);
        }
        true
    }))
}
