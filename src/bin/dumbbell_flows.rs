//! Dumbbell 多流 TCP goodput 实验
//!
//! N 条批量 TCP 流各自从左叶子发往对应右叶子，共享 1 Mbps 瓶颈。
//! 每条流的启动时刻在 [0, 0.1) 秒内随机（固定种子，可复现），
//! 仿真推进到 10 秒后逐流打印 goodput，并输出动画跟踪 JSON。

use std::fs;

use clap::Parser;
use aqmsim_rs::app::{StartBulkSend, StartTimeSampler, DEFAULT_SEED, DEFAULT_STREAM};
use aqmsim_rs::net::NetWorld;
use aqmsim_rs::proto::tcp::{TcpConfig, TcpConn};
use aqmsim_rs::queue::QueueConfig;
use aqmsim_rs::sim::{SimTime, Simulator};
use aqmsim_rs::topo::dumbbell::{build_dumbbell, DumbbellOpts};
use aqmsim_rs::trace::TraceLogger;
use aqmsim_rs::units::DataRate;

/// 动画跟踪输出的固定路径。
const ANIM_PATH: &str = "dumbbell-anim.json";
/// 仿真结束时刻（秒）。
const HORIZON_SECS: u64 = 10;
/// sink 端口。
const SINK_PORT: u16 = 9;

#[derive(Debug, Parser)]
#[command(
    name = "dumbbell-flows",
    about = "Dumbbell 拓扑多流 TCP goodput 实验（瓶颈 DropTail 队列）"
)]
struct Args {
    /// 瓶颈队列容量（字节）
    #[arg(long, default_value_t = 64_000)]
    queue_size: u64,

    /// TCP 最大窗口（字节，不做窗口缩放）
    #[arg(long, default_value_t = 2_000)]
    window_size: u64,

    /// TCP 段大小（字节）
    #[arg(long, default_value_t = 512)]
    seg_size: u32,

    /// 流数（同时也是每侧叶子数）
    #[arg(long, default_value_t = 10)]
    n_flows: usize,
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

    // 每条流独立采样启动偏移；固定 (seed, stream) 保证重复运行结果一致
    let mut sampler = StartTimeSampler::new(DEFAULT_SEED, DEFAULT_STREAM);
    let starts = sampler.sample_n(args.n_flows);

    let mut sim = Simulator::default();
    let mut world = NetWorld::default();

    let opts = DumbbellOpts {
        n_leaves: args.n_flows,
        leaf_rate: DataRate::from_mbps(5),
        leaf_delay: SimTime::from_millis(10),
        bottleneck_rate: DataRate::from_mbps(1),
        bottleneck_delay: SimTime::from_millis(20),
        bottleneck_queue: QueueConfig::DropTail {
            limit_bytes: args.queue_size,
        },
    };
    let dumbbell = build_dumbbell(&mut world.net, &opts);

    world.net.trace = Some(TraceLogger::default());
    world.net.emit_trace_meta();

    let horizon = SimTime::from_secs(HORIZON_SECS);
    let cfg = TcpConfig {
        mss: args.seg_size,
        max_window_bytes: args.window_size,
        init_cwnd_bytes: args.seg_size as u64,
        ..TcpConfig::default()
    };

    let mut sink_ids = Vec::with_capacity(args.n_flows);
    for i in 0..args.n_flows {
        let start = SimTime::from_secs_f64(starts[i]);
        // 目的按右叶子的 IPv4 地址解析（sink 绑定通配地址 + 固定端口）
        let dst = world
            .net
            .node_by_addr(dumbbell.right_addrs[i])
            .expect("right leaf address is bound");
        let sink_id = world.net.sinks.install(dst, SINK_PORT, start, horizon);
        sink_ids.push(sink_id);

        let conn = TcpConn::new(
            i as u64,
            dumbbell.left[i],
            dst,
            SINK_PORT,
            0, // MaxBytes = 0：不设上限
            horizon,
            cfg.clone(),
        );
        sim.schedule(start, StartBulkSend { conn });
    }

    sim.run_until(horizon, &mut world);

    for i in 0..args.n_flows {
        let rx = world.net.sinks.total_rx(sink_ids[i]);
        let active_secs = HORIZON_SECS as f64 - starts[i];
        let goodput = rx as f64 / active_secs;
        println!(
            "flow {} windowSize {} queueSize {} segSize {} goodput {}",
            i, args.window_size, args.queue_size, args.seg_size, goodput
        );
    }

    if let Some(trace) = world.net.trace.take() {
        let json = serde_json::to_string_pretty(&trace.events).expect("serialize trace events");
        fs::write(ANIM_PATH, json).expect("write anim trace");
    }
}
