//! TCP（简化 Tahoe）协议实现
//!
//! 批量传输实验所需的最小集合：
//! - 数据段 / 累计 ACK，接收端乱序缓存
//! - 慢启动 + 拥塞避免；3 个重复 ACK 或 RTO 后回到 1 MSS 慢启动（Tahoe）
//! - 固定的最大窗口钳制（不做窗口缩放），对应实验的 windowSize 参数
//! - 指数退避的超时重传
//!
//! 接收端把按序到达的载荷字节记入目的端口的 sink，
//! 实验结束后以 sink 累计字节数计算 goodput。

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::net::{NetWorld, Network, NodeId, TcpSegment, Transport};
use crate::sim::{Event, SimTime, Simulator, World};

/// 一个 TCP 连接的唯一标识（与 `flow_id` 同义）。
pub type TcpConnId = u64;

#[derive(Debug, Clone)]
pub struct TcpConfig {
    /// 段载荷大小（字节），对应实验的 segSize。
    pub mss: u32,
    /// ACK 包大小（字节）。
    pub ack_bytes: u32,
    /// 最大发送窗口（字节），对应实验的 windowSize；cwnd 不会超过它。
    pub max_window_bytes: u64,
    /// 初始 cwnd（字节）。
    pub init_cwnd_bytes: u64,
    /// 初始 ssthresh（字节）。
    pub init_ssthresh_bytes: u64,
    /// 初始 RTO。
    pub init_rto: SimTime,
    /// 退避上限。
    pub max_rto: SimTime,
}

impl Default for TcpConfig {
    fn default() -> Self {
        let mss = 512;
        Self {
            mss,
            ack_bytes: 64,
            max_window_bytes: u64::MAX,
            init_cwnd_bytes: mss as u64,
            init_ssthresh_bytes: (mss as u64).saturating_mul(1_000),
            init_rto: SimTime::from_millis(200),
            max_rto: SimTime::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TcpConn {
    pub id: TcpConnId,
    pub src: NodeId,
    pub dst: NodeId,
    pub dst_port: u16,
    /// 要发送的总字节数；0 表示不设上限（BulkSend 的 MaxBytes 语义）。
    pub max_bytes: u64,
    /// 发送端停止注入新数据的时刻（仿真结束前的 Stop 时间）。
    pub stop_at: SimTime,
    pub cfg: TcpConfig,

    // 发送端
    next_seq: u64,
    last_acked: u64,
    cwnd_bytes: u64,
    ssthresh_bytes: u64,
    dup_acks: u32,
    rto: SimTime,
    inflight: BTreeMap<u64, u32>, // seq -> len

    // 接收端
    rcv_nxt: u64,
    ooo: BTreeMap<u64, u32>, // 乱序缓存：seq -> len

    // 统计
    start_at: Option<SimTime>,
    done_at: Option<SimTime>,
}

impl TcpConn {
    pub fn new(
        id: TcpConnId,
        src: NodeId,
        dst: NodeId,
        dst_port: u16,
        max_bytes: u64,
        stop_at: SimTime,
        cfg: TcpConfig,
    ) -> Self {
        let rto = cfg.init_rto;
        let cwnd = cfg.init_cwnd_bytes.max(cfg.mss as u64);
        let ssthresh = cfg.init_ssthresh_bytes.max(cfg.mss as u64);
        Self {
            id,
            src,
            dst,
            dst_port,
            max_bytes,
            stop_at,
            cfg,
            next_seq: 0,
            last_acked: 0,
            cwnd_bytes: cwnd,
            ssthresh_bytes: ssthresh,
            dup_acks: 0,
            rto,
            inflight: BTreeMap::new(),
            rcv_nxt: 0,
            ooo: BTreeMap::new(),
            start_at: None,
            done_at: None,
        }
    }

    /// 发送上限；0（不限）映射为 u64::MAX。
    fn send_limit(&self) -> u64 {
        if self.max_bytes == 0 {
            u64::MAX
        } else {
            self.max_bytes
        }
    }

    /// 受 windowSize 钳制的有效发送窗口。
    fn effective_window(&self) -> u64 {
        self.cwnd_bytes.min(self.cfg.max_window_bytes)
    }

    pub fn bytes_acked(&self) -> u64 {
        self.last_acked
    }

    pub fn cwnd_bytes(&self) -> u64 {
        self.cwnd_bytes
    }

    pub fn is_done(&self) -> bool {
        self.done_at.is_some()
    }

    pub fn start_time(&self) -> Option<SimTime> {
        self.start_at
    }

    fn earliest_unacked_seq(&self) -> Option<u64> {
        self.inflight.keys().next().copied()
    }

    /// 接收端：登记一个数据段，返回新推进的按序字节数。
    fn receive_data(&mut self, seq: u64, len: u32) -> u64 {
        let before = self.rcv_nxt;
        if seq >= self.rcv_nxt {
            self.ooo.insert(seq, len);
        }
        while let Some((&s, &l)) = self.ooo.first_key_value() {
            if s > self.rcv_nxt {
                break;
            }
            self.ooo.pop_first();
            let end = s.saturating_add(l as u64);
            if end > self.rcv_nxt {
                self.rcv_nxt = end;
            }
        }
        self.rcv_nxt - before
    }
}

#[derive(Debug, Default)]
pub struct TcpStack {
    conns: HashMap<TcpConnId, TcpConn>,
}

impl TcpStack {
    pub fn insert(&mut self, conn: TcpConn) {
        self.conns.insert(conn.id, conn);
    }

    pub fn get(&self, id: TcpConnId) -> Option<&TcpConn> {
        self.conns.get(&id)
    }

    pub fn get_mut(&mut self, id: TcpConnId) -> Option<&mut TcpConn> {
        self.conns.get_mut(&id)
    }

    /// 在有效窗口允许的范围内持续发出新数据段。
    pub(crate) fn send_data_if_possible(
        &mut self,
        id: TcpConnId,
        sim: &mut Simulator,
        net: &mut Network,
    ) {
        let Some(conn) = self.conns.get_mut(&id) else {
            return;
        };
        if conn.done_at.is_some() || sim.now() >= conn.stop_at {
            return;
        }
        if conn.start_at.is_none() {
            conn.start_at = Some(sim.now());
        }

        let inflight_bytes: u64 = conn.inflight.values().map(|&l| l as u64).sum();
        let mut avail = conn.effective_window().saturating_sub(inflight_bytes);

        while avail > 0 && conn.next_seq < conn.send_limit() {
            let remain = conn.send_limit() - conn.next_seq;
            let len = (conn.cfg.mss as u64).min(remain).min(avail) as u32;
            if len == 0 {
                break;
            }
            let seq = conn.next_seq;
            conn.next_seq = conn.next_seq.saturating_add(len as u64);
            avail = avail.saturating_sub(len as u64);

            let mut pkt = net.make_packet(conn.id, len, conn.src, conn.dst);
            pkt.transport = Transport::Tcp(TcpSegment::Data { seq, len });

            conn.inflight.insert(seq, len);

            // 最早未确认段负责持有 RTO 定时器
            if conn.earliest_unacked_seq() == Some(seq) {
                sim.schedule_in(conn.rto, TcpRto { conn_id: conn.id, seq });
            }

            net.forward_from(conn.src, pkt, sim);
        }
    }

    fn send_ack(&mut self, id: TcpConnId, ack: u64, sim: &mut Simulator, net: &mut Network) {
        let Some(conn) = self.conns.get(&id) else {
            return;
        };
        let mut pkt = net.make_packet(conn.id, conn.cfg.ack_bytes, conn.dst, conn.src);
        pkt.transport = Transport::Tcp(TcpSegment::Ack { ack });
        net.forward_from(conn.dst, pkt, sim);
    }

    fn retransmit_earliest(&mut self, id: TcpConnId, sim: &mut Simulator, net: &mut Network) {
        let Some(conn) = self.conns.get_mut(&id) else {
            return;
        };
        let Some(seq) = conn.earliest_unacked_seq() else {
            return;
        };
        let len = conn.inflight.get(&seq).copied().unwrap_or(conn.cfg.mss);
        let mut pkt = net.make_packet(conn.id, len, conn.src, conn.dst);
        pkt.transport = Transport::Tcp(TcpSegment::Data { seq, len });
        let rto = conn.rto;
        sim.schedule_in(rto, TcpRto { conn_id: id, seq });
        net.forward_from(conn.src, pkt, sim);
    }

    pub fn on_segment(
        &mut self,
        conn_id: TcpConnId,
        at: NodeId,
        seg: TcpSegment,
        sim: &mut Simulator,
        net: &mut Network,
    ) {
        match seg {
            TcpSegment::Data { seq, len } => {
                let Some(conn) = self.conns.get_mut(&conn_id) else {
                    return;
                };
                if at != conn.dst {
                    return;
                }

                let advanced = conn.receive_data(seq, len);
                let ack = conn.rcv_nxt;
                let (dst, dst_port) = (conn.dst, conn.dst_port);
                if advanced > 0 {
                    net.sinks.credit(dst, dst_port, advanced, sim.now());
                }
                // 无论是否乱序都发累计 ACK；dupACK 表现为 ack 不前进
                self.send_ack(conn_id, ack, sim, net);
            }
            TcpSegment::Ack { ack } => {
                let Some(conn) = self.conns.get_mut(&conn_id) else {
                    return;
                };
                if at != conn.src {
                    return;
                }

                if ack > conn.last_acked {
                    conn.dup_acks = 0;
                    let newly_acked = ack - conn.last_acked;
                    conn.last_acked = ack;
                    conn.rto = conn.cfg.init_rto;

                    let mut acked = Vec::new();
                    for (&s, &l) in conn.inflight.iter() {
                        if s.saturating_add(l as u64) <= ack {
                            acked.push(s);
                        } else {
                            break;
                        }
                    }
                    for s in acked {
                        conn.inflight.remove(&s);
                    }

                    // 慢启动 / 拥塞避免；窗口始终受 windowSize 钳制
                    let mss = conn.cfg.mss as u64;
                    if conn.cwnd_bytes < conn.ssthresh_bytes {
                        conn.cwnd_bytes = conn.cwnd_bytes.saturating_add(newly_acked);
                    } else {
                        let inc = (mss.saturating_mul(mss) / conn.cwnd_bytes.max(1)).max(1);
                        conn.cwnd_bytes = conn.cwnd_bytes.saturating_add(inc);
                    }
                    conn.cwnd_bytes = conn.cwnd_bytes.min(conn.cfg.max_window_bytes);

                    // 有限流：全部数据被累计确认即完成
                    if conn.max_bytes > 0 && conn.last_acked >= conn.max_bytes {
                        if conn.done_at.is_none() {
                            conn.done_at = Some(sim.now());
                            debug!(conn_id, at = ?sim.now(), "TCP 流完成");
                        }
                        return;
                    }

                    // 仍有未确认数据时重新武装 RTO
                    if conn.earliest_unacked_seq().is_some() {
                        let rto = conn.rto;
                        let seq = conn.earliest_unacked_seq().expect("checked above");
                        sim.schedule_in(rto, TcpRto { conn_id, seq });
                    }

                    self.send_data_if_possible(conn_id, sim, net);
                } else if ack == conn.last_acked {
                    conn.dup_acks = conn.dup_acks.saturating_add(1);
                    if conn.dup_acks == 3 {
                        // Tahoe：快速重传后回到 1 MSS 慢启动
                        let mss = conn.cfg.mss as u64;
                        let inflight_bytes: u64 =
                            conn.inflight.values().map(|&l| l as u64).sum();
                        conn.ssthresh_bytes = (inflight_bytes / 2).max(2 * mss);
                        conn.cwnd_bytes = mss;
                        conn.dup_acks = 0;
                        debug!(conn_id, ssthresh = conn.ssthresh_bytes, "3 dupACK，快速重传");
                        self.retransmit_earliest(conn_id, sim, net);
                    }
                }
            }
        }
    }
}

/// TCP RTO 事件：若该 seq 仍是最早未确认段则触发超时重传。
#[derive(Debug)]
pub struct TcpRto {
    pub conn_id: TcpConnId,
    pub seq: u64,
}

impl Event for TcpRto {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let TcpRto { conn_id, seq } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");

        // 规避同时借用 `w.net` 与 `w.net.tcp`
        let mut tcp = std::mem::take(&mut w.net.tcp);
        let fire = match tcp.get_mut(conn_id) {
            Some(conn)
                if conn.done_at.is_none() && conn.earliest_unacked_seq() == Some(seq) =>
            {
                // Tahoe 超时：折半 ssthresh，cwnd 回到 1 MSS，RTO 退避
                let mss = conn.cfg.mss as u64;
                conn.ssthresh_bytes = (conn.cwnd_bytes / 2).max(2 * mss);
                conn.cwnd_bytes = mss;
                conn.dup_acks = 0;
                conn.rto = SimTime(conn.rto.0.saturating_mul(2).min(conn.cfg.max_rto.0));
                true
            }
            _ => false,
        };
        if fire {
            debug!(conn_id, seq, "RTO 超时重传");
            tcp.retransmit_earliest(conn_id, sim, &mut w.net);
        }
        w.net.tcp = tcp;
    }
}
