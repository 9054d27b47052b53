//! 恒定比特率 UDP 发送应用
//!
//! 以固定间隔（pkt_bytes * 8 / rate）自我重调度，直到停止时刻。

use crate::net::{NetWorld, NodeId, Transport, UdpDatagram};
use crate::sim::{Event, SimTime, Simulator, World};
use crate::trace::TraceEventKind;
use crate::units::DataRate;

/// 事件：发出一个 CBR 数据报并调度下一个。
#[derive(Debug)]
pub struct CbrSend {
    pub flow_id: u64,
    pub src: NodeId,
    pub dst: NodeId,
    pub dst_port: u16,
    pub pkt_bytes: u32,
    /// 相邻数据报的发送间隔。
    pub interval: SimTime,
    pub stop_at: SimTime,
    /// 首个数据报已发出与否（首次执行时写 AppStart 跟踪事件）。
    pub started: bool,
}

impl CbrSend {
    /// 按速率与包长计算发送间隔。
    pub fn interval_for(rate: DataRate, pkt_bytes: u32) -> SimTime {
        if rate.bps() == 0 {
            return SimTime(u64::MAX / 4);
        }
        let bits = (pkt_bytes as u128).saturating_mul(8);
        let nanos = bits.saturating_mul(1_000_000_000u128) / rate.bps() as u128;
        SimTime(nanos.min(u64::MAX as u128) as u64)
    }
}

impl Event for CbrSend {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let mut me = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");

        if sim.now() >= me.stop_at {
            return;
        }
        if !me.started {
            me.started = true;
            w.net.emit_trace(sim.now(), TraceEventKind::AppStart {
                node: me.src.0,
                flow_id: me.flow_id,
            });
        }

        let mut pkt = w.net.make_packet(me.flow_id, me.pkt_bytes, me.src, me.dst);
        pkt.transport = Transport::Udp(UdpDatagram {
            dst_port: me.dst_port,
            len: me.pkt_bytes,
        });
        w.net.forward_from(me.src, pkt, sim);

        let interval = me.interval;
        sim.schedule_in(interval, me);
    }
}
