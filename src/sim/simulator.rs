//! 仿真器
//!
//! 维护当前时间与事件队列，按时间戳顺序弹出并执行事件。
//! 实验以固定结束时刻运行（`run_until`），到点后无条件停止。

use std::collections::BinaryHeap;

use tracing::{debug, info, trace};

use super::event::Event;
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use super::world::World;

/// 事件驱动仿真器。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    queue: BinaryHeap<ScheduledEvent>,
}

impl Simulator {
    /// 当前仿真时间。
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 在指定时刻调度事件。允许调度在当前时刻（事件排在本事件之后执行）。
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        trace!(at = ?at, seq, queue_len = self.queue.len(), "调度事件");
        self.queue.push(ScheduledEvent {
            at,
            seq,
            ev: Box::new(ev),
        });
    }

    /// 在当前时刻之后 `delay` 调度事件。
    pub fn schedule_in<E: Event>(&mut self, delay: SimTime, ev: E) {
        self.schedule(self.now.saturating_add(delay), ev);
    }

    /// 运行直到事件队列为空或到达 `until`（含 `until` 时刻的事件）。
    /// 返回时当前时间推进到 `until`，之后的事件被丢弃在队列中。
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) {
        info!(until = ?until, "▶️  运行仿真");
        let mut executed: u64 = 0;
        while let Some(top) = self.queue.peek() {
            if top.at > until {
                break;
            }
            let item = self.queue.pop().expect("peek then pop");
            self.now = item.at;
            executed = executed.saturating_add(1);
            debug!(now = ?self.now, seq = item.seq, remaining = self.queue.len(), "执行事件");
            item.ev.execute(self, world);
        }
        self.now = self.now.max(until);
        info!(executed, final_time = ?self.now, "✅ 仿真结束");
    }

    /// 运行所有事件直到队列为空。
    pub fn run(&mut self, world: &mut dyn World) {
        while let Some(item) = self.queue.pop() {
            self.now = item.at;
            item.ev.execute(self, world);
        }
    }
}
