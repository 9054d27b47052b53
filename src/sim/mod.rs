//! 仿真核心模块
//!
//! 事件驱动仿真的核心组件：仿真时钟、事件、调度队列与仿真器本体。
//! 实验脚本只负责在 t=0 之前把应用启动事件排进队列，
//! 之后完全由仿真器按时间戳顺序推进到固定的结束时刻。

mod event;
mod scheduled_event;
mod simulator;
mod time;
mod world;

pub use event::Event;
pub use scheduled_event::ScheduledEvent;
pub use simulator::Simulator;
pub use time::SimTime;
pub use world::World;
