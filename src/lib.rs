pub mod app;
pub mod net;
pub mod proto;
pub mod queue;
pub mod sim;
pub mod topo;
pub mod trace;
pub mod units;

#[cfg(test)]
mod test;
