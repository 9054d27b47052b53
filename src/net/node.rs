//! 节点类型
//!
//! 主机与路由器。两者的转发行为一致（全局路由表保证全网可达），
//! 区别在于主机是应用与传输层的落点。

use tracing::trace;

use super::id::NodeId;
use super::network::Network;
use super::packet::Packet;
use crate::sim::Simulator;

/// 节点接口。
pub trait Node: Send {
    fn id(&self) -> NodeId;
    fn name(&self) -> &str;
    /// 处理到达本节点的数据包。
    fn on_packet(&mut self, pkt: Packet, sim: &mut Simulator, net: &mut Network);
}

fn receive_or_forward(
    id: NodeId,
    name: &str,
    pkt: Packet,
    sim: &mut Simulator,
    net: &mut Network,
) {
    if pkt.dst == id {
        trace!(node = %name, pkt_id = pkt.id, "到达目的节点");
        net.on_delivered(id, pkt, sim);
    } else {
        trace!(node = %name, pkt_id = pkt.id, dst = %pkt.dst, "继续转发");
        net.forward_from(id, pkt, sim);
    }
}

/// 主机节点：流量的源与汇。
#[derive(Debug)]
pub struct Host {
    id: NodeId,
    name: String,
}

impl Host {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Node for Host {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn on_packet(&mut self, pkt: Packet, sim: &mut Simulator, net: &mut Network) {
        receive_or_forward(self.id, &self.name, pkt, sim, net);
    }
}

/// 路由器节点：只做转发。
#[derive(Debug)]
pub struct Router {
    id: NodeId,
    name: String,
}

impl Router {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Node for Router {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn on_packet(&mut self, pkt: Packet, sim: &mut Simulator, net: &mut Network) {
        receive_or_forward(self.id, &self.name, pkt, sim, net);
    }
}
