//! 世界 trait
//!
//! 业务层（网络拓扑 + 流量统计）实现此接口并交给仿真器驱动。

use std::any::Any;

/// 仿真世界。事件通过 `as_any_mut` 向下转型访问具体实现。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
