use crate::net::{NodeId, Packet};
use crate::queue::{DropTailQueue, PacketQueue, QueueConfig, QueueKind, RedParams, RedQueue};
use crate::sim::SimTime;

fn pkt(id: u64, size_bytes: u32) -> Packet {
    Packet::new(id, 0, size_bytes, NodeId(0), NodeId(1))
}

#[test]
fn droptail_enforces_capacity_and_preserves_order() {
    let mut q = DropTailQueue::new(100);
    assert_eq!(q.capacity_bytes(), 100);
    assert_eq!(q.len(), 0);
    assert_eq!(q.bytes(), 0);

    assert!(q.enqueue(pkt(1, 60), SimTime::ZERO).is_ok());
    assert_eq!(q.len(), 1);
    assert_eq!(q.bytes(), 60);

    let dropped = q.enqueue(pkt(2, 50), SimTime::ZERO).expect_err("should drop");
    assert_eq!(dropped.id, 2);
    assert_eq!(q.len(), 1);
    assert_eq!(q.bytes(), 60);

    assert!(q.enqueue(pkt(3, 40), SimTime::ZERO).is_ok());
    assert_eq!(q.dequeue(SimTime::ZERO).expect("pkt").id, 1);
    assert_eq!(q.dequeue(SimTime::ZERO).expect("pkt").id, 3);
    assert!(q.dequeue(SimTime::ZERO).is_none());
}

#[test]
fn droptail_zero_sized_packets_do_not_consume_capacity() {
    let mut q = DropTailQueue::new(10);
    assert!(q.enqueue(pkt(1, 0), SimTime::ZERO).is_ok());
    assert!(q.enqueue(pkt(2, 0), SimTime::ZERO).is_ok());
    assert_eq!(q.len(), 2);
    assert_eq!(q.bytes(), 0);
}

/// 权重取 1 时 avg 即“入队前的瞬时占用”，便于精确检验阈值行为。
fn red_instant(min_th: f64, max_th: f64, max_p_inv: f64) -> RedQueue {
    RedQueue::new(RedParams {
        limit_bytes: 1_000_000,
        min_th_bytes: min_th,
        max_th_bytes: max_th,
        queue_weight: 1.0,
        max_p_inv,
        mean_pkt_bytes: 128,
        link_bps: 1_000_000,
        seed: 7,
    })
}

#[test]
fn red_accepts_everything_below_min_th() {
    let mut q = red_instant(1_000.0, 2_000.0, 50.0);
    for i in 0..5 {
        assert!(q.enqueue(pkt(i, 128), SimTime::ZERO).is_ok());
    }
    assert_eq!(q.len(), 5);
    assert_eq!(q.bytes(), 5 * 128);
}

#[test]
fn red_force_drops_at_or_above_max_th() {
    // max_p_inv 取无穷大把早丢概率压成 0，只留下强制丢弃路径
    let mut q = red_instant(1_000.0, 2_000.0, f64::INFINITY);
    for i in 0..4 {
        assert!(q.enqueue(pkt(i, 600), SimTime::ZERO).is_ok());
    }
    // 入队前占用 2400 >= max_th，强制丢弃
    let dropped = q.enqueue(pkt(9, 600), SimTime::ZERO).expect_err("forced drop");
    assert_eq!(dropped.id, 9);
    assert_eq!(q.len(), 4);
}

#[test]
fn red_early_drop_probability_saturates_between_thresholds() {
    // max_p = 1 且 avg 在阈值正中时 p_b = 0.5，经 count 归一化后 p_a = 1，
    // 第二个到达的 packet 必然被早丢
    let mut q = red_instant(100.0, 200.0, 1.0);
    assert!(q.enqueue(pkt(1, 150), SimTime::ZERO).is_ok());
    let dropped = q.enqueue(pkt(2, 150), SimTime::ZERO).expect_err("early drop");
    assert_eq!(dropped.id, 2);
    assert_eq!(q.len(), 1);
}

#[test]
fn red_hard_limit_applies_even_when_average_is_low() {
    // 权重 0 使 avg 恒为 0（永不早丢），只剩硬性字节上限
    let mut q = RedQueue::new(RedParams {
        limit_bytes: 500,
        min_th_bytes: 1_000.0,
        max_th_bytes: 2_000.0,
        queue_weight: 0.0,
        max_p_inv: 50.0,
        mean_pkt_bytes: 128,
        link_bps: 1_000_000,
        seed: 7,
    });
    assert!(q.enqueue(pkt(1, 300), SimTime::ZERO).is_ok());
    let dropped = q.enqueue(pkt(2, 300), SimTime::ZERO).expect_err("hard limit");
    assert_eq!(dropped.id, 2);
}

#[test]
fn red_average_decays_across_idle_periods() {
    let mut q = RedQueue::new(RedParams {
        limit_bytes: 1_000_000,
        min_th_bytes: 10_000.0,
        max_th_bytes: 20_000.0,
        queue_weight: 0.5,
        max_p_inv: 50.0,
        mean_pkt_bytes: 128,
        link_bps: 1_000_000,
        seed: 7,
    });

    // avg 爬到非零值
    assert!(q.enqueue(pkt(1, 100), SimTime::ZERO).is_ok());
    assert!(q.enqueue(pkt(2, 100), SimTime::ZERO).is_ok());
    assert!(q.avg_bytes() > 0.0);
    let before = q.avg_bytes();

    // 清空队列进入空闲期
    assert!(q.dequeue(SimTime::from_millis(1)).is_some());
    assert!(q.dequeue(SimTime::from_millis(1)).is_some());

    // 长空闲后再入队：avg 衰减到接近 0
    assert!(q.enqueue(pkt(3, 100), SimTime::from_secs(5)).is_ok());
    assert!(q.avg_bytes() < before);
    assert!(q.avg_bytes() < 1.0);
}

#[test]
fn queue_kind_parses_exact_experiment_names() {
    assert_eq!("RED".parse::<QueueKind>(), Ok(QueueKind::Red));
    assert_eq!("Droptail".parse::<QueueKind>(), Ok(QueueKind::DropTail));

    // 大小写敏感，其余取值一律拒绝
    for bad in ["red", "DROPTAIL", "DropTail", "fifo", ""] {
        let err = bad.parse::<QueueKind>().expect_err("must reject");
        assert!(err.to_string().contains("use RED or Droptail"));
    }
}

#[test]
fn queue_config_builds_matching_discipline() {
    let dt = QueueConfig::DropTail { limit_bytes: 123 }.build();
    assert_eq!(dt.capacity_bytes(), 123);

    let red = QueueConfig::Red(RedParams::default()).build();
    assert_eq!(red.capacity_bytes(), 480 * 128);
}
