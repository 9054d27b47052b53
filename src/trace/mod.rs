//! 动画跟踪事件（结构化 JSON）
//!
//! 用 JSON 事件而不是文本日志记录拓扑与逐包行为，
//! 供外部可视化工具离线回放。第一条事件约定为拓扑元信息。

mod types;

pub use types::{TraceEvent, TraceEventKind, TraceLinkInfo, TraceLogger, TraceNodeInfo};
