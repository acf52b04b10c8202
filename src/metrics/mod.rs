//! Reduction of CloudWatch datapoints into dashboard summaries.

pub mod aggregate;
pub mod period;

pub use aggregate::{
    keep_latest, sort_chronologically, summarize, total_of, trend, Aggregate, TrendPoint,
};
pub use period::{period_for_budget, round_up_to_minute};
