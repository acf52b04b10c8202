//! Request-level orchestration of cloud calls: each function here backs one
//! dashboard endpoint and returns the reshaped payload.

pub mod clusters;
pub mod flow_logs;
pub mod restarts;
pub mod utilization;
