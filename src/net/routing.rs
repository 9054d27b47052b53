//! 全局路由
//!
//! 拓扑接线完成后一次性填充（populate）全网最短路下一跳表，
//! 之后任意一对节点间的可达性不需要手工配置路由条目。
//! 对每个目的节点在反向图上做 BFS，取“距离恰好减一”的邻居作为下一跳。

use std::collections::{HashMap, VecDeque};

use super::id::NodeId;

#[derive(Debug, Default, Clone)]
pub struct RoutingTable {
    dirty: bool,
    /// (from, dst) -> 下一跳
    next_hop: HashMap<(NodeId, NodeId), NodeId>,
}

impl RoutingTable {
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 基于当前拓扑重建下一跳表。
    ///
    /// `adj[from]` 为 `from` 的出边邻居；`rev_adj[to]` 为能到达 `to` 的前驱。
    pub fn rebuild(&mut self, adj: &[Vec<NodeId>], rev_adj: &[Vec<NodeId>]) {
        let n = adj.len();
        self.next_hop.clear();

        let mut dist: Vec<u32> = vec![u32::MAX; n];
        let mut q: VecDeque<NodeId> = VecDeque::new();

        for dst_idx in 0..n {
            dist.fill(u32::MAX);
            q.clear();

            let dst = NodeId(dst_idx);
            dist[dst_idx] = 0;
            q.push_back(dst);

            while let Some(v) = q.pop_front() {
                let dv = dist[v.0];
                for &pred in &rev_adj[v.0] {
                    if dist[pred.0] == u32::MAX {
                        dist[pred.0] = dv.saturating_add(1);
                        q.push_back(pred);
                    }
                }
            }

            for from_idx in 0..n {
                let from = NodeId(from_idx);
                if from == dst || dist[from_idx] == u32::MAX {
                    continue;
                }
                // 邻接表的插入顺序决定了等价路径间的选择，保持确定性。
                let df = dist[from_idx];
                if let Some(&nh) = adj[from_idx]
                    .iter()
                    .find(|nh| dist[nh.0] == df.saturating_sub(1))
                {
                    self.next_hop.insert((from, dst), nh);
                }
            }
        }

        self.dirty = false;
    }

    /// 查询 `from` 去往 `dst` 的下一跳。
    pub fn next_hop(&self, from: NodeId, dst: NodeId) -> Option<NodeId> {
        self.next_hop.get(&(from, dst)).copied()
    }
}
