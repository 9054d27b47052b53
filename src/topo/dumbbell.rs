//! Dumbbell 拓扑构建
//!
//! N 个左叶子与 N 个右叶子通过一条共享瓶颈链路相连：
//!
//! ```text
//! l0 \            / r0
//! l1 - rl ==== rr - r1      rl–rr 为瓶颈（挂接实验配置的队列）
//! l2 /            \ r2
//! ```
//!
//! 左叶子链路段用 10.0.x.0/24，右叶子 10.2.x.0/24，瓶颈 10.1.1.0/24。

use std::net::Ipv4Addr;

use crate::net::{Ipv4AddressHelper, Network, NodeId};
use crate::queue::QueueConfig;
use crate::sim::SimTime;
use crate::units::DataRate;

/// Dumbbell 拓扑配置。
#[derive(Debug, Clone)]
pub struct DumbbellOpts {
    pub n_leaves: usize,
    pub leaf_rate: DataRate,
    pub leaf_delay: SimTime,
    pub bottleneck_rate: DataRate,
    pub bottleneck_delay: SimTime,
    /// 瓶颈链路两个方向各实例化一份的队列配置。
    pub bottleneck_queue: QueueConfig,
}

impl Default for DumbbellOpts {
    fn default() -> Self {
        Self {
            n_leaves: 10,
            leaf_rate: DataRate::from_mbps(5),
            leaf_delay: SimTime::from_millis(10),
            bottleneck_rate: DataRate::from_mbps(1),
            bottleneck_delay: SimTime::from_millis(20),
            bottleneck_queue: QueueConfig::DropTail { limit_bytes: 64_000 },
        }
    }
}

/// 构建完成的 dumbbell：叶子、路由器与叶子地址。
#[derive(Debug)]
pub struct Dumbbell {
    pub left: Vec<NodeId>,
    pub right: Vec<NodeId>,
    pub left_router: NodeId,
    pub right_router: NodeId,
    pub left_addrs: Vec<Ipv4Addr>,
    pub right_addrs: Vec<Ipv4Addr>,
}

/// 构建 dumbbell 拓扑并填充全局路由表。
pub fn build_dumbbell(net: &mut Network, opts: &DumbbellOpts) -> Dumbbell {
    let left_router = net.add_router("rl");
    let right_router = net.add_router("rr");

    let mut left = Vec::with_capacity(opts.n_leaves);
    let mut right = Vec::with_capacity(opts.n_leaves);
    for i in 0..opts.n_leaves {
        left.push(net.add_host(format!("l{i}")));
        right.push(net.add_host(format!("r{i}")));
    }

    let mut left_helper = Ipv4AddressHelper::new(Ipv4Addr::new(10, 0, 1, 0));
    let mut right_helper = Ipv4AddressHelper::new(Ipv4Addr::new(10, 2, 1, 0));
    let mut bneck_helper = Ipv4AddressHelper::new(Ipv4Addr::new(10, 1, 1, 0));

    let mut left_addrs = Vec::with_capacity(opts.n_leaves);
    let mut right_addrs = Vec::with_capacity(opts.n_leaves);

    for i in 0..opts.n_leaves {
        net.connect_duplex(left[i], left_router, opts.leaf_delay, opts.leaf_rate.bps());
        let (leaf_addr, router_addr) = left_helper.assign_pair();
        net.bind_addr(leaf_addr, left[i]);
        net.bind_addr(router_addr, left_router);
        left_addrs.push(leaf_addr);
    }

    // 瓶颈链路：两个方向都挂接实验配置的队列
    net.connect_duplex(
        left_router,
        right_router,
        opts.bottleneck_delay,
        opts.bottleneck_rate.bps(),
    );
    net.set_link_queue(left_router, right_router, opts.bottleneck_queue.build());
    net.set_link_queue(right_router, left_router, opts.bottleneck_queue.build());
    let (rl_addr, rr_addr) = bneck_helper.assign_pair();
    net.bind_addr(rl_addr, left_router);
    net.bind_addr(rr_addr, right_router);

    for i in 0..opts.n_leaves {
        net.connect_duplex(right_router, right[i], opts.leaf_delay, opts.leaf_rate.bps());
        let (leaf_addr, router_addr) = right_helper.assign_pair();
        net.bind_addr(leaf_addr, right[i]);
        net.bind_addr(router_addr, right_router);
        right_addrs.push(leaf_addr);
    }

    net.populate_routing();

    Dumbbell {
        left,
        right,
        left_router,
        right_router,
        left_addrs,
        right_addrs,
    }
}
