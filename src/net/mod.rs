//! 网络模拟模块
//!
//! 节点、链路、数据包、寻址与全局路由。链路出口挂接队列策略，
//! 数据包逐跳按全局最短路表转发；送达目的节点后分发给传输层。

mod addr;
mod deliver_packet;
mod id;
mod link;
mod link_ready;
mod net_world;
mod network;
mod node;
mod packet;
mod routing;
mod stats;
mod transport;

pub use addr::Ipv4AddressHelper;
pub use deliver_packet::DeliverPacket;
pub use id::{LinkId, NodeId};
pub use link::Link;
pub use link_ready::LinkReady;
pub use net_world::NetWorld;
pub use network::Network;
pub use node::{Host, Node, Router};
pub use packet::Packet;
pub use routing::RoutingTable;
pub use stats::Stats;
pub use transport::{TcpSegment, Transport, UdpDatagram};
