//! Per-link IPv4 addressing.
//!
//! Every link segment gets its own /24; the two endpoints take `.1` and `.2`.
//! Mirrors the address plan of the original experiments (10.0.x.0 for left
//! leaves, 10.2.x.0 for right leaves, 10.1.x.0 for everything in between).

use std::net::Ipv4Addr;

/// Hands out consecutive /24 subnets starting from a base network address.
#[derive(Debug, Clone)]
pub struct Ipv4AddressHelper {
    /// Current network address, host octet zero.
    net: u32,
}

impl Ipv4AddressHelper {
    pub fn new(base: Ipv4Addr) -> Self {
        Self {
            net: u32::from(base) & 0xffff_ff00,
        }
    }

    /// Addresses for the two endpoints of the current subnet, then advance
    /// to the next /24.
    pub fn assign_pair(&mut self) -> (Ipv4Addr, Ipv4Addr) {
        let a = Ipv4Addr::from(self.net | 1);
        let b = Ipv4Addr::from(self.net | 2);
        self.net = self.net.wrapping_add(0x100);
        (a, b)
    }

    /// Network address the next `assign_pair` call will draw from.
    pub fn current_network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.net)
    }
}
