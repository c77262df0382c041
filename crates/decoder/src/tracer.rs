//! 디코더별 트레이스 싱크
//!
//! [`Tracer`]는 디코더 하나에 속한 이름 있는 진단 채널입니다. 각
//! 스테이지는 [`Tracer::tracer_fn`]으로 얻은 싱크에 메시지를 기록하고,
//! 테스트나 상위 엔진은 [`Tracer::subscribe`]로 전역 상태 없이
//! 디코더 단위의 트레이스를 관찰합니다.

use std::sync::Arc;

use tokio::sync::broadcast;

use logsieve_core::operator::TracerFn;

/// 기본 트레이스 채널 용량
const DEFAULT_TRACE_CAPACITY: usize = 256;

/// 디코더별 트레이스 채널
///
/// 수신자가 하나도 없으면 메시지는 버려집니다. 채널은 `Tracer`가
/// 드롭될 때 함께 해제됩니다.
#[derive(Debug)]
pub struct Tracer {
    name: String,
    tx: broadcast::Sender<String>,
}

impl Tracer {
    /// 기본 용량으로 새 트레이서를 생성합니다.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, DEFAULT_TRACE_CAPACITY)
    }

    /// 지정된 채널 용량으로 새 트레이서를 생성합니다.
    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            name: name.into(),
            tx,
        }
    }

    /// 트레이서가 속한 디코더 이름을 반환합니다.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 트레이스 메시지 수신자를 등록합니다.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// 스테이지에 전달할 트레이스 싱크를 생성합니다.
    ///
    /// 싱크는 복제 가능하며, 메시지를 채널로 보내는 동시에
    /// `tracing`으로도 흘립니다.
    pub fn tracer_fn(&self) -> TracerFn {
        let name = self.name.clone();
        let tx = self.tx.clone();
        Arc::new(move |message: &str| {
            tracing::trace!(decoder = %name, trace = %message, "decoder trace");
            // 수신자가 없을 때의 전송 실패는 정상 동작
            let _ = tx.send(message.to_owned());
        })
    }
}
