//! RED vs DropTail 对比实验
//!
//! 带支路的 8 节点链：两条批量 TCP 流（n0→n4、n7→n4）与一条
//! 0.5 Mbps 的 CBR UDP 流（n5→n6）争用 1 Mbps 瓶颈。
//! 瓶颈队列按命令行在 RED 与 Droptail 之间二选一；
//! 运行 10 秒后输出 TCP 与 UDP 的 goodput 汇总行。

use std::process;

use clap::Parser;
use aqmsim_rs::app::CbrSend;
use aqmsim_rs::net::NetWorld;
use aqmsim_rs::proto::tcp::{TcpConfig, TcpConn};
use aqmsim_rs::queue::{QueueConfig, QueueKind, RedParams};
use aqmsim_rs::sim::{SimTime, Simulator};
use aqmsim_rs::topo::chain::{build_chain, ChainOpts};
use aqmsim_rs::units::{DataRate, Delay};

/// 固定包长（字节）：TCP 段与 UDP 数据报一致。
const PKT_BYTES: u32 = 128;
/// sink 端口。
const SINK_PORT: u16 = 68;
/// 仿真结束时刻（秒）。
const HORIZON_SECS: u64 = 10;
/// RED 早丢随机数的固定种子。
const RED_SEED: u64 = 6_110;

#[derive(Debug, Parser)]
#[command(
    name = "red-droptail",
    about = "链拓扑上的 RED vs Droptail goodput 对比实验"
)]
struct Args {
    /// Droptail 队列容量（字节）
    #[arg(long, default_value_t = 32_000)]
    q_size: u64,

    /// TCP 最大窗口（字节）
    #[arg(long, default_value_t = 32_000)]
    win_size: u64,

    /// 队列策略：RED 或 Droptail
    #[arg(long, default_value = "Droptail")]
    queue_kind: String,

    /// UDP 源速率
    #[arg(long, default_value = "0.5Mbps")]
    d_rate: DataRate,

    /// n0-n1 / n1-n7 / n3-n4 链路时延（RTT 调节量）
    #[arg(long, default_value = "5ms")]
    rtt: Delay,

    /// RED 下阈值（包数，换算为字节）
    #[arg(long, default_value_t = 5.0)]
    min_th: f64,

    /// RED 上阈值（包数，换算为字节）
    #[arg(long, default_value_t = 15.0)]
    max_th: f64,

    /// RED 最大丢弃概率的倒数
    #[arg(long, default_value_t = 50.0)]
    max_p: f64,

    /// RED 队列权重
    #[arg(long, default_value_t = 1.0 / 128.0)]
    queue_wt: f64,

    /// RED 硬性队列上限（字节）
    #[arg(long, default_value_t = 480 * 128)]
    q_len: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    // 唯一识别的致命错误：未知的队列策略名（解析通过后才构建拓扑）
    let kind: QueueKind = match args.queue_kind.parse() {
        Ok(kind) => kind,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    let bottleneck_rate = DataRate::from_mbps(1);
    let (queue, summary) = match kind {
        QueueKind::DropTail => (
            QueueConfig::DropTail {
                limit_bytes: args.q_size,
            },
            format!(
                "Queue Size:{} Window Size:{} RTT:{} DataRate:{}",
                args.q_size, args.win_size, args.rtt, args.d_rate
            ),
        ),
        QueueKind::Red => {
            // 阈值按包数给出，换算成字节
            let min_th_bytes = args.min_th * PKT_BYTES as f64;
            let max_th_bytes = args.max_th * PKT_BYTES as f64;
            (
                QueueConfig::Red(RedParams {
                    limit_bytes: args.q_len,
                    min_th_bytes,
                    max_th_bytes,
                    queue_weight: args.queue_wt,
                    max_p_inv: args.max_p,
                    mean_pkt_bytes: PKT_BYTES,
                    link_bps: bottleneck_rate.bps(),
                    seed: RED_SEED,
                }),
                format!(
                    "MinTh:{} MaxTh:{} MaxP:{} RTT:{} DataRate:{}",
                    min_th_bytes, max_th_bytes, args.max_p, args.rtt, args.d_rate
                ),
            )
        }
    };

    let mut sim = Simulator::default();
    let mut world = NetWorld::default();

    let opts = ChainOpts {
        edge_rate: DataRate::from_mbps(5),
        edge_delay: args.rtt,
        bottleneck_rate,
        bottleneck_delay: SimTime::from_millis(20),
        bottleneck_queue: queue,
    };
    let chain = build_chain(&mut world.net, &opts);
    let [n0, _, _, _, n4, n5, n6, n7] = chain.nodes;

    let horizon = SimTime::from_secs(HORIZON_SECS);
    let app_start = SimTime::from_secs(1);

    let cfg = TcpConfig {
        mss: PKT_BYTES,
        max_window_bytes: args.win_size,
        init_cwnd_bytes: PKT_BYTES as u64,
        ..TcpConfig::default()
    };

    // sink 从 0 时刻监听到仿真结束
    let tcp_sink = world.net.sinks.install(n4, SINK_PORT, SimTime::ZERO, horizon);
    let udp_sink = world.net.sinks.install(n6, SINK_PORT, SimTime::ZERO, horizon);

    // 两条批量 TCP 流，目的地址解析到 n4
    let tcp_dst = world
        .net
        .node_by_addr(chain.tcp_sink_addr)
        .expect("tcp sink address is bound");
    for (flow_id, src) in [(1u64, n0), (2u64, n7)] {
        let conn = TcpConn::new(flow_id, src, tcp_dst, SINK_PORT, 0, horizon, cfg.clone());
        sim.schedule(app_start, aqmsim_rs::app::StartBulkSend { conn });
    }

    // CBR UDP 流，目的地址解析到 n6
    let udp_dst = world
        .net
        .node_by_addr(chain.udp_sink_addr)
        .expect("udp sink address is bound");
    sim.schedule(
        app_start,
        CbrSend {
            flow_id: 3,
            src: n5,
            dst: udp_dst,
            dst_port: SINK_PORT,
            pkt_bytes: PKT_BYTES,
            interval: CbrSend::interval_for(args.d_rate, PKT_BYTES),
            stop_at: horizon,
            started: false,
        },
    );

    sim.run_until(horizon, &mut world);

    let tcp_goodput = world.net.sinks.total_rx(tcp_sink) as f64 / HORIZON_SECS as f64;
    let udp_goodput = world.net.sinks.total_rx(udp_sink) as f64 / HORIZON_SECS as f64;
    println!("{summary} Goodput TCP:{tcp_goodput} Goodput UDP:{udp_goodput}");
}
