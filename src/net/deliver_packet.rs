//! 数据包交付事件

use crate::sim::{Event, Simulator, World};

use super::id::NodeId;
use super::net_world::NetWorld;
use super::packet::Packet;

/// 事件：数据包在传播时延结束后到达 `to` 节点。
#[derive(Debug)]
pub struct DeliverPacket {
    pub to: NodeId,
    pub pkt: Packet,
}

impl Event for DeliverPacket {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let DeliverPacket { to, pkt } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");
        w.net.deliver(to, pkt, sim);
    }
}
