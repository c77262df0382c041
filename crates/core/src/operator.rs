//! 연산자 계약 — 디코더 스테이지가 구현하는 함수 형태
//!
//! 리액티브 스트림 런타임은 이 코어의 바깥에 있으므로, 스테이지는
//! 스트림이 아니라 이벤트 하나에 대한 함수로 표현됩니다.
//! `false` 반환은 필터링(이벤트 드롭), `true` 반환은 통과를 의미합니다.

use std::sync::Arc;

use crate::event::DecodeEvent;

/// 디코더 스테이지 연산자
///
/// 이벤트를 변형하거나(매핑) 거를 수 있습니다(필터링).
/// `Send + Sync` 바운드로 컴파일된 연산자를 여러 스레드에서
/// 동시에 호출할 수 있습니다.
pub type Operator = Box<dyn Fn(&mut DecodeEvent) -> bool + Send + Sync>;

/// 스테이지가 진단 메시지를 기록하는 트레이스 싱크
///
/// 디코더별 [`Tracer`]가 생성하며, 전역 상태 없이 디코더 단위로
/// 트레이스를 상관시킬 수 있습니다.
pub type TracerFn = Arc<dyn Fn(&str) + Send + Sync>;
