//! 队列策略（Queue disciplines）
//!
//! 链路出口的排队行为：DropTail（尾丢弃）与 RED（随机早期检测）。
//! 策略名解析失败是实验驱动唯一识别的致命错误。

use std::str::FromStr;

use thiserror::Error;

use crate::net::Packet;
use crate::sim::SimTime;

mod drop_tail;
mod red;

pub use drop_tail::DropTailQueue;
pub use red::{RedParams, RedQueue};

/// Packet 队列抽象。队列以字节计容量；`now` 供需要时间感知的
/// 策略（RED 的空闲衰减）使用，DropTail 忽略它。
pub trait PacketQueue: std::fmt::Debug {
    /// 入队：成功返回 Ok；被策略丢弃则返回 Err(pkt)。
    fn enqueue(&mut self, pkt: Packet, now: SimTime) -> Result<(), Packet>;
    /// 出队：返回下一个要发送的 packet。
    fn dequeue(&mut self, now: SimTime) -> Option<Packet>;

    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn bytes(&self) -> u64;
    fn capacity_bytes(&self) -> u64;
}

/// 实验可选的队列策略名。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    DropTail,
    Red,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid queue type {0:?}: use RED or Droptail")]
pub struct UnknownQueueKind(String);

impl FromStr for QueueKind {
    type Err = UnknownQueueKind;

    // 与原实验的命令行取值保持一致：`RED` 与 `Droptail`，大小写敏感。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RED" => Ok(QueueKind::Red),
            "Droptail" => Ok(QueueKind::DropTail),
            other => Err(UnknownQueueKind(other.to_string())),
        }
    }
}

/// 一条瓶颈链路的队列配置；拓扑构建时按方向各实例化一份。
#[derive(Debug, Clone)]
pub enum QueueConfig {
    DropTail { limit_bytes: u64 },
    Red(RedParams),
}

impl QueueConfig {
    pub fn build(&self) -> Box<dyn PacketQueue> {
        match self {
            QueueConfig::DropTail { limit_bytes } => Box::new(DropTailQueue::new(*limit_bytes)),
            QueueConfig::Red(params) => Box::new(RedQueue::new(params.clone())),
        }
    }
}
