//! Packet sink 应用
//!
//! 按 (节点, 端口) 计数收到的载荷字节。sink 绑定通配地址的语义
//! 由“端口匹配即计数”体现；活动窗口之外到达的字节不计入。

use crate::net::NodeId;
use crate::sim::SimTime;

/// sink 在注册表中的序号。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkId(pub usize);

#[derive(Debug)]
pub struct PacketSink {
    pub node: NodeId,
    pub port: u16,
    pub start: SimTime,
    pub stop: SimTime,
    rx_bytes: u64,
}

impl PacketSink {
    /// 累计收到的载荷字节数。
    pub fn total_rx(&self) -> u64 {
        self.rx_bytes
    }
}

/// 全部已安装 sink 的注册表，由 `Network` 持有。
#[derive(Debug, Default)]
pub struct SinkRegistry {
    sinks: Vec<PacketSink>,
}

impl SinkRegistry {
    /// 安装一个 sink，指定活动窗口。
    pub fn install(&mut self, node: NodeId, port: u16, start: SimTime, stop: SimTime) -> SinkId {
        let id = SinkId(self.sinks.len());
        self.sinks.push(PacketSink {
            node,
            port,
            start,
            stop,
            rx_bytes: 0,
        });
        id
    }

    /// 记账：`node` 上监听 `port` 且处于活动窗口内的 sink 收到 `bytes` 字节。
    pub fn credit(&mut self, node: NodeId, port: u16, bytes: u64, now: SimTime) {
        for sink in &mut self.sinks {
            if sink.node == node && sink.port == port && now >= sink.start && now <= sink.stop {
                sink.rx_bytes = sink.rx_bytes.saturating_add(bytes);
            }
        }
    }

    pub fn get(&self, id: SinkId) -> Option<&PacketSink> {
        self.sinks.get(id.0)
    }

    /// 某 sink 的累计接收字节数。
    pub fn total_rx(&self, id: SinkId) -> u64 {
        self.sinks.get(id.0).map(|s| s.rx_bytes).unwrap_or(0)
    }
}
