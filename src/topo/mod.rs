//! 拓扑构建
//!
//! 两个实验的固定拓扑：可配叶子数的 dumbbell 与带支路的 8 节点链。
//! 构建过程：加节点 → 接链路（含瓶颈队列）→ 逐链路段分配 /24 子网 →
//! 填充全局路由表。

pub mod chain;
pub mod dumbbell;
