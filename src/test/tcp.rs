use crate::app::StartBulkSend;
use crate::net::{NetWorld, NodeId, TcpSegment};
use crate::proto::tcp::{TcpConfig, TcpConn};
use crate::queue::{DropTailQueue, PacketQueue};
use crate::sim::{SimTime, Simulator};

const PORT: u16 = 9;

fn two_hosts(bps: u64, delay: SimTime) -> (Simulator, NetWorld, NodeId, NodeId) {
    let mut world = NetWorld::default();
    let h0 = world.net.add_host("h0");
    let h1 = world.net.add_host("h1");
    world.net.connect_duplex(h0, h1, delay, bps);
    world.net.populate_routing();
    (Simulator::default(), world, h0, h1)
}

fn cfg(max_window_bytes: u64) -> TcpConfig {
    TcpConfig {
        mss: 512,
        max_window_bytes,
        init_cwnd_bytes: 512,
        ..TcpConfig::default()
    }
}

#[test]
fn bounded_transfer_completes_and_credits_sink() {
    let (mut sim, mut world, h0, h1) = two_hosts(1_000_000_000, SimTime::from_millis(1));
    let horizon = SimTime::from_secs(10);
    let sink = world.net.sinks.install(h1, PORT, SimTime::ZERO, horizon);

    let conn = TcpConn::new(0, h0, h1, PORT, 5_000, horizon, cfg(1_000_000));
    sim.schedule(SimTime::ZERO, StartBulkSend { conn });
    sim.run(&mut world);

    assert_eq!(world.net.sinks.total_rx(sink), 5_000);
    let conn = world.net.tcp.get(0).expect("conn");
    assert!(conn.is_done());
    assert_eq!(conn.bytes_acked(), 5_000);
    assert_eq!(world.net.stats.dropped_pkts, 0);
}

#[test]
fn max_window_caps_throughput() {
    let run = |window: u64| -> u64 {
        let (mut sim, mut world, h0, h1) = two_hosts(1_000_000, SimTime::from_millis(10));
        let horizon = SimTime::from_secs(1);
        let sink = world.net.sinks.install(h1, PORT, SimTime::ZERO, horizon);
        let conn = TcpConn::new(0, h0, h1, PORT, 0, horizon, cfg(window));
        sim.schedule(SimTime::ZERO, StartBulkSend { conn });
        sim.run_until(horizon, &mut world);
        world.net.sinks.total_rx(sink)
    };

    // 窗口 1 MSS 时吞吐被 RTT 限制（停等）；放大窗口必须明显提升吞吐
    let narrow = run(512);
    let wide = run(100_000);
    assert!(narrow > 0);
    assert!(wide > narrow * 3, "narrow={narrow} wide={wide}");
}

#[test]
fn loss_is_recovered_and_transfer_still_completes() {
    let (mut sim, mut world, h0, h1) = two_hosts(1_000_000, SimTime::from_millis(1));
    // 数据方向只容得下约一个段，迫使慢启动突发丢包
    let small: Box<dyn PacketQueue> = Box::new(DropTailQueue::new(600));
    world.net.set_link_queue(h0, h1, small);

    let horizon = SimTime::from_secs(30);
    let sink = world.net.sinks.install(h1, PORT, SimTime::ZERO, horizon);
    let conn = TcpConn::new(0, h0, h1, PORT, 8_192, horizon, cfg(1_000_000));
    sim.schedule(SimTime::ZERO, StartBulkSend { conn });
    sim.run(&mut world);

    assert!(world.net.stats.dropped_pkts > 0, "expected queue drops");
    assert_eq!(world.net.sinks.total_rx(sink), 8_192);
    assert!(world.net.tcp.get(0).expect("conn").is_done());
}

#[test]
fn receiver_buffers_out_of_order_and_credits_in_order_bytes_once() {
    let (mut sim, mut world, h0, h1) = two_hosts(1_000_000_000, SimTime::from_millis(1));
    let horizon = SimTime::from_secs(10);
    let sink = world.net.sinks.install(h1, PORT, SimTime::ZERO, horizon);

    let mut tcp = std::mem::take(&mut world.net.tcp);
    tcp.insert(TcpConn::new(0, h0, h1, PORT, 0, horizon, cfg(1_000_000)));

    // 乱序段先到：缓存，不记账
    tcp.on_segment(0, h1, TcpSegment::Data { seq: 512, len: 512 }, &mut sim, &mut world.net);
    assert_eq!(world.net.sinks.total_rx(sink), 0);

    // 缺口补齐：两个段的字节一次性按序推进
    tcp.on_segment(0, h1, TcpSegment::Data { seq: 0, len: 512 }, &mut sim, &mut world.net);
    assert_eq!(world.net.sinks.total_rx(sink), 1_024);

    // 重复段不再记账
    tcp.on_segment(0, h1, TcpSegment::Data { seq: 0, len: 512 }, &mut sim, &mut world.net);
    assert_eq!(world.net.sinks.total_rx(sink), 1_024);

    world.net.tcp = tcp;
}

#[test]
fn three_dup_acks_collapse_cwnd_to_one_mss() {
    let (mut sim, mut world, h0, h1) = two_hosts(1_000_000_000, SimTime::from_millis(1));
    let horizon = SimTime::from_secs(10);
    world.net.sinks.install(h1, PORT, SimTime::ZERO, horizon);

    let mut tcp = std::mem::take(&mut world.net.tcp);
    tcp.insert(TcpConn::new(7, h0, h1, PORT, 0, horizon, cfg(1_000_000)));
    tcp.send_data_if_possible(7, &mut sim, &mut world.net);

    // 第一个段被确认：慢启动把 cwnd 翻倍，继续发出两个段
    tcp.on_segment(7, h0, TcpSegment::Ack { ack: 512 }, &mut sim, &mut world.net);
    assert_eq!(tcp.get(7).expect("conn").cwnd_bytes(), 1_024);
    assert_eq!(tcp.get(7).expect("conn").bytes_acked(), 512);

    // 三个重复 ACK：Tahoe 回到 1 MSS
    for _ in 0..3 {
        tcp.on_segment(7, h0, TcpSegment::Ack { ack: 512 }, &mut sim, &mut world.net);
    }
    assert_eq!(tcp.get(7).expect("conn").cwnd_bytes(), 512);

    world.net.tcp = tcp;
}

#[test]
fn sender_injects_nothing_after_stop_time() {
    let (mut sim, mut world, h0, h1) = two_hosts(1_000_000_000, SimTime::from_millis(1));
    let stop = SimTime::from_millis(1);
    let sink = world.net.sinks.install(h1, PORT, SimTime::ZERO, SimTime::from_secs(10));

    let conn = TcpConn::new(0, h0, h1, PORT, 0, stop, cfg(1_000_000));
    // 启动时刻已晚于停止时刻
    sim.schedule(SimTime::from_millis(2), StartBulkSend { conn });
    sim.run(&mut world);

    assert_eq!(world.net.sinks.total_rx(sink), 0);
}
