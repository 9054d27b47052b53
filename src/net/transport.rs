//! Transport-layer tags carried by packets.
//!
//! The network layer forwards opaque packets; these tags let the endpoint
//! hand a delivered packet to the right protocol handler without coupling
//! forwarding to protocol state.

/// Packet transport metadata.
#[derive(Debug, Clone, Default)]
pub enum Transport {
    /// No transport metadata (default).
    #[default]
    None,
    /// Simplified TCP segment; the owning connection is the packet's flow id.
    Tcp(TcpSegment),
    /// UDP datagram, stateless.
    Udp(UdpDatagram),
}

/// TCP segment (minimal fields for simulation).
#[derive(Debug, Clone)]
pub enum TcpSegment {
    /// Data segment: `seq` is the byte sequence number, `len` the payload bytes.
    Data { seq: u64, len: u32 },
    /// Cumulative ACK: `ack` is the next expected byte.
    Ack { ack: u64 },
}

/// UDP datagram addressed to a sink port on the destination node.
#[derive(Debug, Clone)]
pub struct UdpDatagram {
    pub dst_port: u16,
    pub len: u32,
}
