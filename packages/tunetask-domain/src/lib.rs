pub mod consistency;
pub mod ranking;
pub mod task;
