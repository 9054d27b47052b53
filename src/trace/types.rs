use serde::{Deserialize, Serialize};

use crate::sim::SimTime;

/// 跟踪事件类型。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEventKind {
    /// 拓扑元信息（约定为 t=0 的第一条事件）。
    Meta {
        nodes: Vec<TraceNodeInfo>,
        links: Vec<TraceLinkInfo>,
    },
    /// 应用在某节点启动。
    AppStart { node: usize, flow_id: u64 },
    /// packet 进入某条单向链路的出口队列。
    Enqueue {
        link_from: usize,
        link_to: usize,
        q_bytes: u64,
        q_cap_bytes: u64,
    },
    /// 队列策略丢弃 packet。
    Drop {
        link_from: usize,
        link_to: usize,
        q_bytes: u64,
        q_cap_bytes: u64,
    },
    /// packet 在目的节点被送达。
    Delivered { node: usize, flow_id: u64, bytes: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceNodeInfo {
    pub id: usize,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceLinkInfo {
    pub from: usize,
    pub to: usize,
    pub bandwidth_bps: u64,
    pub delay_ns: u64,
    pub q_cap_bytes: u64,
}

/// 一条跟踪事件：时间戳（ns）+ 事件体。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub t_ns: u64,
    #[serde(flatten)]
    pub kind: TraceEventKind,
}

/// 跟踪事件记录器。
#[derive(Debug, Default)]
pub struct TraceLogger {
    pub events: Vec<TraceEvent>,
}

impl TraceLogger {
    pub fn push(&mut self, at: SimTime, kind: TraceEventKind) {
        self.events.push(TraceEvent { t_ns: at.0, kind });
    }
}
