//! 事件 trait
//!
//! 所有可调度的行为（数据包到达、链路空闲、应用启动等）都实现此接口。

use super::simulator::Simulator;
use super::world::World;

/// 可调度执行的事件。`self: Box<Self>` 允许执行时转移所有权。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}
