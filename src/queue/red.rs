//! Random Early Detection queue.
//!
//! Classic RED in byte mode: an exponentially weighted moving average of the
//! queue occupancy decides between accepting, probabilistically dropping
//! (between `min_th` and `max_th`) and force-dropping (at or above `max_th`).
//! While the link sits idle the average decays as if small packets had been
//! draining the whole time.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::net::Packet;
use crate::sim::SimTime;

use super::PacketQueue;

/// RED tuning knobs, all byte-denominated.
#[derive(Debug, Clone)]
pub struct RedParams {
    /// Hard queue limit in bytes.
    pub limit_bytes: u64,
    /// Lower EWMA threshold in bytes.
    pub min_th_bytes: f64,
    /// Upper EWMA threshold in bytes.
    pub max_th_bytes: f64,
    /// EWMA gain (queue weight), e.g. 1/128.
    pub queue_weight: f64,
    /// Inverse of the maximum early-drop probability (ns-3 `LInterm`):
    /// at `max_th` the drop probability reaches `1 / max_p_inv`.
    pub max_p_inv: f64,
    /// Mean packet size in bytes, used to estimate drain time while idle.
    pub mean_pkt_bytes: u32,
    /// Bandwidth of the link this queue feeds, for the idle-decay estimate.
    pub link_bps: u64,
    /// Seed for the early-drop draws; fixed per queue for reproducible runs.
    pub seed: u64,
}

impl Default for RedParams {
    fn default() -> Self {
        Self {
            limit_bytes: 480 * 128,
            min_th_bytes: 5.0 * 128.0,
            max_th_bytes: 15.0 * 128.0,
            queue_weight: 1.0 / 128.0,
            max_p_inv: 50.0,
            mean_pkt_bytes: 128,
            link_bps: 1_000_000,
            seed: 1,
        }
    }
}

#[derive(Debug)]
pub struct RedQueue {
    params: RedParams,
    cur_bytes: u64,
    q: VecDeque<Packet>,
    /// EWMA of the byte occupancy.
    avg: f64,
    /// Packets since the last early drop; drives the uniformization term.
    count: u64,
    /// Set while the queue is empty; cleared on the next enqueue.
    idle_since: Option<SimTime>,
    rng: StdRng,
}

impl RedQueue {
    pub fn new(params: RedParams) -> Self {
        let rng = StdRng::seed_from_u64(params.seed);
        Self {
            params,
            cur_bytes: 0,
            q: VecDeque::new(),
            avg: 0.0,
            count: 0,
            idle_since: Some(SimTime::ZERO),
            rng,
        }
    }

    /// Current average occupancy estimate, exposed for tests.
    pub fn avg_bytes(&self) -> f64 {
        self.avg
    }

    /// Time to serialize one mean-sized packet on the attached link.
    fn mean_pkt_time_secs(&self) -> f64 {
        if self.params.link_bps == 0 {
            return f64::INFINITY;
        }
        (self.params.mean_pkt_bytes as f64 * 8.0) / self.params.link_bps as f64
    }

    fn update_avg(&mut self, now: SimTime) {
        let w = self.params.queue_weight;
        if let Some(idle_start) = self.idle_since.take() {
            // Decay the average across the idle period: avg *= (1-w)^m where
            // m is the number of mean-sized packets the link could have sent.
            let idle = now.saturating_sub(idle_start).as_secs_f64();
            let s = self.mean_pkt_time_secs();
            if s.is_finite() && s > 0.0 {
                let m = idle / s;
                self.avg *= (1.0 - w).powf(m);
            }
        }
        self.avg = (1.0 - w) * self.avg + w * self.cur_bytes as f64;
    }

    /// Early-drop decision for one arriving packet, after the EWMA update.
    fn should_early_drop(&mut self, pkt_bytes: u32) -> bool {
        let p = &self.params;
        if self.avg < p.min_th_bytes {
            self.count = 0;
            return false;
        }
        if self.avg >= p.max_th_bytes {
            self.count = 0;
            return true;
        }

        self.count = self.count.saturating_add(1);
        let span = (p.max_th_bytes - p.min_th_bytes).max(f64::MIN_POSITIVE);
        let max_p = if p.max_p_inv > 0.0 { 1.0 / p.max_p_inv } else { 1.0 };
        let mut p_b = max_p * (self.avg - p.min_th_bytes) / span;
        // Byte mode: weight the probability by packet size relative to the mean.
        if p.mean_pkt_bytes > 0 {
            p_b *= pkt_bytes as f64 / p.mean_pkt_bytes as f64;
        }
        let denom = 1.0 - (self.count as f64) * p_b;
        let p_a = if denom <= 0.0 { 1.0 } else { (p_b / denom).min(1.0) };

        let dropped = self.rng.gen_range(0.0..1.0) < p_a;
        if dropped {
            self.count = 0;
        }
        dropped
    }
}

impl PacketQueue for RedQueue {
    fn enqueue(&mut self, pkt: Packet, now: SimTime) -> Result<(), Packet> {
        self.update_avg(now);

        if self.should_early_drop(pkt.size_bytes) {
            return Err(pkt);
        }

        let sz = pkt.size_bytes as u64;
        if self.cur_bytes.saturating_add(sz) > self.params.limit_bytes {
            // Hard limit, independent of the average.
            self.count = 0;
            return Err(pkt);
        }
        self.cur_bytes = self.cur_bytes.saturating_add(sz);
        self.q.push_back(pkt);
        Ok(())
    }

    fn dequeue(&mut self, now: SimTime) -> Option<Packet> {
        let pkt = self.q.pop_front()?;
        self.cur_bytes = self.cur_bytes.saturating_sub(pkt.size_bytes as u64);
        if self.q.is_empty() {
            self.idle_since = Some(now);
        }
        Some(pkt)
    }

    fn len(&self) -> usize {
        self.q.len()
    }

    fn bytes(&self) -> u64 {
        self.cur_bytes
    }

    fn capacity_bytes(&self) -> u64 {
        self.params.limit_bytes
    }
}
