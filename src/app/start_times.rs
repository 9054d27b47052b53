//! 随机化的应用启动时刻
//!
//! 每条流在 [0, 0.1) 秒内独立采样启动偏移，错开流的起始时刻。
//! 采样器由 (seed, stream) 对播种：相同参数重复运行得到完全相同的
//! 启动时刻序列，从而得到可复现的 goodput 输出。

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// 实验固定的种子与流编号。
pub const DEFAULT_SEED: u64 = 11_223_344;
pub const DEFAULT_STREAM: u64 = 6_110;

/// 均匀分布的启动时刻采样器（单位：秒）。
#[derive(Debug)]
pub struct StartTimeSampler {
    rng: StdRng,
    dist: Uniform<f64>,
}

impl StartTimeSampler {
    /// 用 (seed, stream) 对构造；stream 混入种子高位，
    /// 不同 stream 取到互不相关的序列。
    pub fn new(seed: u64, stream: u64) -> Self {
        let mixed = seed ^ stream.rotate_left(32);
        Self {
            rng: StdRng::seed_from_u64(mixed),
            dist: Uniform::new(0.0, 0.1),
        }
    }

    /// 下一个启动偏移（秒）。
    pub fn sample(&mut self) -> f64 {
        self.dist.sample(&mut self.rng)
    }

    /// 为 n 条流采样启动偏移。
    pub fn sample_n(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.sample()).collect()
    }
}
