mod queues;
mod simulator;
mod start_times;
mod tcp;
mod units;
