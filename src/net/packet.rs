//! 数据包类型
//!
//! 数据包只携带源/目的节点，下一跳在每个节点查全局路由表决定，
//! 与路由表预先填充（populate）的语义一致。

use super::id::NodeId;
use super::transport::Transport;

/// 网络数据包。
#[derive(Debug, Clone)]
pub struct Packet {
    pub id: u64,
    pub flow_id: u64,
    pub size_bytes: u32,
    pub src: NodeId,
    pub dst: NodeId,
    pub transport: Transport,
}

impl Packet {
    pub fn new(id: u64, flow_id: u64, size_bytes: u32, src: NodeId, dst: NodeId) -> Self {
        Self {
            id,
            flow_id,
            size_bytes,
            src,
            dst,
            transport: Transport::None,
        }
    }
}
