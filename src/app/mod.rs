//! 流量计划层
//!
//! 实验驱动在这里安装发送端与 sink，并为每个应用实例指定
//! 显式的启动/停止时刻；随机化的启动偏移由采样器给出。

mod bulk_send;
mod cbr;
mod sink;
mod start_times;

pub use bulk_send::StartBulkSend;
pub use cbr::CbrSend;
pub use sink::{PacketSink, SinkId, SinkRegistry};
pub use start_times::{StartTimeSampler, DEFAULT_SEED, DEFAULT_STREAM};
