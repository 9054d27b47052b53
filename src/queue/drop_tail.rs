//! DropTail（尾丢弃）队列
//!
//! 字节计数的 FIFO：入队后超出容量的新 packet 直接丢弃。

use std::collections::VecDeque;

use crate::net::Packet;
use crate::sim::SimTime;

use super::PacketQueue;

#[derive(Debug)]
pub struct DropTailQueue {
    limit_bytes: u64,
    cur_bytes: u64,
    q: VecDeque<Packet>,
}

impl DropTailQueue {
    pub fn new(limit_bytes: u64) -> Self {
        Self {
            limit_bytes,
            cur_bytes: 0,
            q: VecDeque::new(),
        }
    }
}

impl PacketQueue for DropTailQueue {
    fn enqueue(&mut self, pkt: Packet, _now: SimTime) -> Result<(), Packet> {
        let sz = pkt.size_bytes as u64;
        if self.cur_bytes.saturating_add(sz) > self.limit_bytes {
            return Err(pkt);
        }
        self.cur_bytes = self.cur_bytes.saturating_add(sz);
        self.q.push_back(pkt);
        Ok(())
    }

    fn dequeue(&mut self, _now: SimTime) -> Option<Packet> {
        let pkt = self.q.pop_front()?;
        self.cur_bytes = self.cur_bytes.saturating_sub(pkt.size_bytes as u64);
        Some(pkt)
    }

    fn len(&self) -> usize {
        self.q.len()
    }

    fn bytes(&self) -> u64 {
        self.cur_bytes
    }

    fn capacity_bytes(&self) -> u64 {
        self.limit_bytes
    }
}
