//! 带支路的 8 节点链拓扑
//!
//! ```text
//!                     n5(UDP 源)
//!                      |
//! n0 --- n1 --- n2 --- n3 --- n4
//!        |  1Mbps  1Mbps  |
//!        n7(TCP 源)       n6(UDP sink)
//! ```
//!
//! n0、n7 为 TCP 源，n4 为 TCP sink；n5 为 UDP 源，n6 为 UDP sink。
//! n1–n2 与 n2–n3 为瓶颈链路，挂接实验选择的队列策略；
//! n0–n1 / n1–n7 / n3–n4 的时延由 RTT 参数控制。
//! 每条链路段按创建顺序分配 10.1.k.0/24。

use std::net::Ipv4Addr;

use crate::net::{Ipv4AddressHelper, Network, NodeId};
use crate::queue::QueueConfig;
use crate::sim::SimTime;
use crate::units::{DataRate, Delay};

/// 链拓扑配置。
#[derive(Debug, Clone)]
pub struct ChainOpts {
    /// n0–n1、n1–n7、n3–n4 的速率（5 Mbps）。
    pub edge_rate: DataRate,
    /// 上述三条链路的时延（实验的 RTT 参数）。
    pub edge_delay: Delay,
    pub bottleneck_rate: DataRate,
    pub bottleneck_delay: SimTime,
    /// 瓶颈链路每个方向各实例化一份的队列配置。
    pub bottleneck_queue: QueueConfig,
}

impl Default for ChainOpts {
    fn default() -> Self {
        Self {
            edge_rate: DataRate::from_mbps(5),
            edge_delay: Delay(SimTime::from_millis(5)),
            bottleneck_rate: DataRate::from_mbps(1),
            bottleneck_delay: SimTime::from_millis(20),
            bottleneck_queue: QueueConfig::DropTail { limit_bytes: 32_000 },
        }
    }
}

/// 构建完成的链拓扑。
#[derive(Debug)]
pub struct Chain {
    /// n0..n7，与拓扑图中的编号一致。
    pub nodes: [NodeId; 8],
    /// n4 在 n3–n4 链路段上的地址（TCP 流的目的地址）。
    pub tcp_sink_addr: Ipv4Addr,
    /// n6 在 n3–n6 链路段上的地址（UDP 流的目的地址）。
    pub udp_sink_addr: Ipv4Addr,
}

/// 构建链拓扑并填充全局路由表。
pub fn build_chain(net: &mut Network, opts: &ChainOpts) -> Chain {
    let n0 = net.add_host("n0");
    let n1 = net.add_router("n1");
    let n2 = net.add_router("n2");
    let n3 = net.add_router("n3");
    let n4 = net.add_host("n4");
    let n5 = net.add_host("n5");
    let n6 = net.add_host("n6");
    let n7 = net.add_host("n7");

    let edge = opts.edge_rate.bps();
    let edge_delay = opts.edge_delay.time();
    let bneck = opts.bottleneck_rate.bps();

    // 与原实验相同的链路安装顺序；子网 10.1.1.0/24 起依次分配
    let mut helper = Ipv4AddressHelper::new(Ipv4Addr::new(10, 1, 1, 0));
    let mut wire = |net: &mut Network, a: NodeId, b: NodeId, delay: SimTime, bps: u64| {
        net.connect_duplex(a, b, delay, bps);
        let (addr_a, addr_b) = helper.assign_pair();
        net.bind_addr(addr_a, a);
        net.bind_addr(addr_b, b);
        (addr_a, addr_b)
    };

    wire(net, n0, n1, edge_delay, edge);
    wire(net, n1, n2, opts.bottleneck_delay, bneck);
    wire(net, n2, n3, opts.bottleneck_delay, bneck);
    let (_, tcp_sink_addr) = wire(net, n3, n4, edge_delay, edge);
    wire(net, n5, n2, SimTime::from_millis(10), DataRate::from_mbps(6).bps());
    let (_, udp_sink_addr) = wire(net, n3, n6, SimTime::from_millis(10), edge);
    wire(net, n1, n7, edge_delay, edge);

    // 瓶颈队列：两条瓶颈链路、每个方向一份
    for (a, b) in [(n1, n2), (n2, n1), (n2, n3), (n3, n2)] {
        net.set_link_queue(a, b, opts.bottleneck_queue.build());
    }

    net.populate_routing();

    Chain {
        nodes: [n0, n1, n2, n3, n4, n5, n6, n7],
        tcp_sink_addr,
        udp_sink_addr,
    }
}
