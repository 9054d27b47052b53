//! 链路类型
//!
//! 单向点对点链路：串行化时延（带宽）+ 传播时延 + 出口队列。

use crate::queue::{DropTailQueue, PacketQueue};
use crate::sim::SimTime;

use super::id::NodeId;

/// 单向链路。
#[derive(Debug)]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
    pub delay: SimTime,
    pub bandwidth_bps: u64,
    /// 链路完成当前 packet 串行化的时刻。
    pub busy_until: SimTime,
    /// 出口排队策略。默认近乎无限的 DropTail，拓扑构建时按需替换。
    pub queue: Box<dyn PacketQueue>,
}

impl Link {
    pub fn new(from: NodeId, to: NodeId, delay: SimTime, bandwidth_bps: u64) -> Self {
        Self {
            from,
            to,
            delay,
            bandwidth_bps,
            busy_until: SimTime::ZERO,
            queue: Box::new(DropTailQueue::new(u64::MAX)),
        }
    }

    /// 串行化 `bytes` 字节所需时间。
    pub(crate) fn tx_time(&self, bytes: u32) -> SimTime {
        if self.bandwidth_bps == 0 {
            return SimTime(u64::MAX / 4);
        }
        let bits = (bytes as u128).saturating_mul(8);
        let nanos = (bits.saturating_mul(1_000_000_000u128) + (self.bandwidth_bps as u128 - 1))
            / self.bandwidth_bps as u128;
        SimTime(nanos.min(u64::MAX as u128) as u64)
    }
}
