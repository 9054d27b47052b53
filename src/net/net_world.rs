//! 网络世界实现

use std::any::Any;

use crate::sim::World;

use super::network::Network;

/// 默认的网络世界：持有 Network。
#[derive(Default)]
pub struct NetWorld {
    pub net: Network,
}

impl World for NetWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
