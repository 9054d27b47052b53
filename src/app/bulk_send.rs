//! 批量 TCP 发送应用
//!
//! 在指定启动时刻把连接注册进 TCP 栈并开始发送；
//! 停止时刻与发送上限由连接自身携带（MaxBytes=0 表示不设上限）。

use tracing::debug;

use crate::net::NetWorld;
use crate::proto::tcp::TcpConn;
use crate::sim::{Event, Simulator, World};
use crate::trace::TraceEventKind;

/// 事件：在调度时刻启动一个批量 TCP 流。
#[derive(Debug)]
pub struct StartBulkSend {
    pub conn: TcpConn,
}

impl Event for StartBulkSend {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let StartBulkSend { conn } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");

        debug!(conn_id = conn.id, at = ?sim.now(), src = %conn.src, "启动批量 TCP 流");
        w.net.emit_trace(sim.now(), TraceEventKind::AppStart {
            node: conn.src.0,
            flow_id: conn.id,
        });

        let id = conn.id;
        // 规避同时借用 `w.net` 与 `w.net.tcp`
        let mut tcp = std::mem::take(&mut w.net.tcp);
        tcp.insert(conn);
        tcp.send_data_if_possible(id, sim, &mut w.net);
        w.net.tcp = tcp;
    }
}
