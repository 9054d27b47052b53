//! 传输层模块
//!
//! 仿真用的简化 TCP（Tahoe 风格）。UDP 无连接、无状态，
//! 数据报直接在 `net::transport` 打标、由 CBR 应用发送。

pub mod tcp;
