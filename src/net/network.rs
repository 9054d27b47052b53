//! 网络拓扑管理
//!
//! 持有节点、链路、寻址与路由表，负责逐跳转发、排队与统计，
//! 并在数据包送达目的节点时分发给传输层。

use std::collections::HashMap;
use std::net::Ipv4Addr;

use tracing::{debug, trace};

use crate::app::SinkRegistry;
use crate::proto::tcp::TcpStack;
use crate::queue::PacketQueue;
use crate::sim::{SimTime, Simulator};
use crate::trace::{TraceEventKind, TraceLogger};

use super::deliver_packet::DeliverPacket;
use super::id::{LinkId, NodeId};
use super::link::Link;
use super::link_ready::LinkReady;
use super::node::{Host, Node, Router};
use super::packet::Packet;
use super::routing::RoutingTable;
use super::stats::Stats;
use super::transport::Transport;

/// 网络拓扑与转发状态。
#[derive(Default)]
pub struct Network {
    nodes: Vec<Option<Box<dyn Node>>>,
    links: Vec<Link>,
    edges: HashMap<(NodeId, NodeId), LinkId>,
    addrs: HashMap<Ipv4Addr, NodeId>,
    routing: RoutingTable,
    next_pkt_id: u64,
    pub stats: Stats,
    pub tcp: TcpStack,
    pub sinks: SinkRegistry,
    pub trace: Option<TraceLogger>,
}

impl Network {
    /// 添加主机节点。
    pub fn add_host(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Box::new(Host::new(id, name))));
        self.routing.mark_dirty();
        id
    }

    /// 添加路由器节点。
    pub fn add_router(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Box::new(Router::new(id, name))));
        self.routing.mark_dirty();
        id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.nodes
            .get(id.0)
            .and_then(|slot| slot.as_deref())
            .map(|n| n.name())
    }

    /// 创建单向链路。
    pub fn connect(
        &mut self,
        from: NodeId,
        to: NodeId,
        delay: SimTime,
        bandwidth_bps: u64,
    ) -> LinkId {
        let id = LinkId(self.links.len());
        self.links.push(Link::new(from, to, delay, bandwidth_bps));
        self.edges.insert((from, to), id);
        self.routing.mark_dirty();
        id
    }

    /// 创建一对对称的单向链路（点对点信道的惯用形态）。
    pub fn connect_duplex(
        &mut self,
        a: NodeId,
        b: NodeId,
        delay: SimTime,
        bandwidth_bps: u64,
    ) -> (LinkId, LinkId) {
        let fwd = self.connect(a, b, delay, bandwidth_bps);
        let rev = self.connect(b, a, delay, bandwidth_bps);
        (fwd, rev)
    }

    /// 替换某条单向链路的出口队列。
    pub fn set_link_queue(&mut self, from: NodeId, to: NodeId, queue: Box<dyn PacketQueue>) {
        let link_id = self.edges[&(from, to)];
        self.links[link_id.0].queue = queue;
    }

    pub fn link(&self, from: NodeId, to: NodeId) -> Option<&Link> {
        self.edges.get(&(from, to)).map(|id| &self.links[id.0])
    }

    /// 把一个 IPv4 地址绑定到节点（每条链路段一个 /24 子网）。
    pub fn bind_addr(&mut self, addr: Ipv4Addr, node: NodeId) {
        self.addrs.insert(addr, node);
    }

    /// 地址解析：发送端按目的地址找到目的节点。
    pub fn node_by_addr(&self, addr: Ipv4Addr) -> Option<NodeId> {
        self.addrs.get(&addr).copied()
    }

    /// 填充全局路由表。拓扑接线完成后调用一次，全网即两两可达。
    pub fn populate_routing(&mut self) {
        let n = self.nodes.len();
        let mut adj: Vec<Vec<NodeId>> = vec![Vec::new(); n];
        let mut rev_adj: Vec<Vec<NodeId>> = vec![Vec::new(); n];
        // 按链路创建顺序构建邻接表，保证路由选择的确定性。
        for link in &self.links {
            adj[link.from.0].push(link.to);
            rev_adj[link.to.0].push(link.from);
        }
        self.routing.rebuild(&adj, &rev_adj);
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    /// 创建数据包。
    pub fn make_packet(&mut self, flow_id: u64, size_bytes: u32, src: NodeId, dst: NodeId) -> Packet {
        let id = self.next_pkt_id;
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        Packet::new(id, flow_id, size_bytes, src, dst)
    }

    /// 把数据包交付给节点处理。
    pub fn deliver(&mut self, to: NodeId, pkt: Packet, sim: &mut Simulator) {
        // 暂时把节点取出来，避免 &mut self 与 &mut node 的重叠借用。
        let mut node = self.nodes[to.0].take().expect("node exists");
        node.on_packet(pkt, sim, self);
        self.nodes[to.0] = Some(node);
    }

    /// 从 `from` 沿路由表转发一跳。
    #[tracing::instrument(skip(self, sim), fields(pkt_id = pkt.id, flow_id = pkt.flow_id))]
    pub fn forward_from(&mut self, from: NodeId, pkt: Packet, sim: &mut Simulator) {
        debug_assert!(!self.routing.is_dirty(), "populate_routing before traffic");
        let Some(next) = self.routing.next_hop(from, pkt.dst) else {
            // 不可达：按丢弃计（正常拓扑下不会发生）
            debug!(from = %from, dst = %pkt.dst, "无路由，丢弃");
            self.count_drop(&pkt);
            return;
        };
        let link_id = self.edges[&(from, next)];
        self.enqueue_or_drop(link_id, pkt, sim);
    }

    /// 入队；链路空闲则立即开始串行化发送。
    fn enqueue_or_drop(&mut self, link_id: LinkId, pkt: Packet, sim: &mut Simulator) {
        let now = sim.now();
        let link = &mut self.links[link_id.0];
        let idle = now >= link.busy_until;
        let (from, to) = (link.from, link.to);

        match link.queue.enqueue(pkt, now) {
            Ok(()) => {
                let (q_bytes, q_cap) = (link.queue.bytes(), link.queue.capacity_bytes());
                trace!(link = ?link_id, q_bytes, "入队");
                self.emit_trace(now, TraceEventKind::Enqueue {
                    link_from: from.0,
                    link_to: to.0,
                    q_bytes,
                    q_cap_bytes: q_cap,
                });
                if idle {
                    self.on_link_ready(link_id, sim);
                }
            }
            Err(dropped) => {
                let (q_bytes, q_cap) = (link.queue.bytes(), link.queue.capacity_bytes());
                debug!(link = ?link_id, pkt_id = dropped.id, q_bytes, "❌ 队列丢包");
                self.emit_trace(now, TraceEventKind::Drop {
                    link_from: from.0,
                    link_to: to.0,
                    q_bytes,
                    q_cap_bytes: q_cap,
                });
                self.count_drop(&dropped);
            }
        }
    }

    /// 链路空闲：取队首 packet 开始串行化，调度离开与到达事件。
    pub(crate) fn on_link_ready(&mut self, link_id: LinkId, sim: &mut Simulator) {
        let now = sim.now();
        let link = &mut self.links[link_id.0];
        let Some(pkt) = link.queue.dequeue(now) else {
            return;
        };

        let start = now.max(link.busy_until);
        let depart = start.saturating_add(link.tx_time(pkt.size_bytes));
        link.busy_until = depart;
        let arrive = depart.saturating_add(link.delay);
        let to = link.to;

        trace!(link = ?link_id, depart = ?depart, arrive = ?arrive, "开始发送");
        sim.schedule(depart, LinkReady { link_id });
        sim.schedule(arrive, DeliverPacket { to, pkt });
    }

    /// 数据包送达目的地：统计并分发给传输层。
    pub(crate) fn on_delivered(&mut self, at: NodeId, pkt: Packet, sim: &mut Simulator) {
        self.stats.delivered_pkts += 1;
        self.stats.delivered_bytes += pkt.size_bytes as u64;
        self.emit_trace(sim.now(), TraceEventKind::Delivered {
            node: at.0,
            flow_id: pkt.flow_id,
            bytes: pkt.size_bytes,
        });

        match pkt.transport {
            Transport::Tcp(seg) => {
                let conn_id = pkt.flow_id;
                // 规避同时借用 `self` 与 `self.tcp`
                let mut tcp = std::mem::take(&mut self.tcp);
                tcp.on_segment(conn_id, at, seg, sim, self);
                self.tcp = tcp;
            }
            Transport::Udp(dgram) => {
                let now = sim.now();
                self.sinks.credit(at, dgram.dst_port, dgram.len as u64, now);
            }
            Transport::None => {}
        }
    }

    fn count_drop(&mut self, pkt: &Packet) {
        self.stats.dropped_pkts += 1;
        self.stats.dropped_bytes += pkt.size_bytes as u64;
    }

    pub(crate) fn emit_trace(&mut self, at: SimTime, kind: TraceEventKind) {
        if let Some(tr) = self.trace.as_mut() {
            tr.push(at, kind);
        }
    }

    /// 开启动画跟踪时，先写入一条拓扑元信息事件。
    pub fn emit_trace_meta(&mut self) {
        if self.trace.is_none() {
            return;
        }
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, slot)| crate::trace::TraceNodeInfo {
                id: i,
                name: slot.as_deref().map(|n| n.name().to_string()).unwrap_or_default(),
            })
            .collect();
        let links = self
            .links
            .iter()
            .map(|l| crate::trace::TraceLinkInfo {
                from: l.from.0,
                to: l.to.0,
                bandwidth_bps: l.bandwidth_bps,
                delay_ns: l.delay.0,
                q_cap_bytes: l.queue.capacity_bytes(),
            })
            .collect();
        self.emit_trace(SimTime::ZERO, TraceEventKind::Meta { nodes, links });
    }
}
