use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cloud::types::Datapoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Summary of a series. Each statistic is `None` when no sample carries it,
/// including the empty series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub average: Option<f64>,
    pub maximum: Option<f64>,
    pub minimum: Option<f64>,
    pub trend: Vec<TrendPoint>,
}

/// Mean of per-sample averages (unweighted), max of maxima, min of minima.
/// The trend follows the order of `samples`.
pub fn summarize(samples: &[Datapoint]) -> Aggregate {
    Aggregate {
        average: mean(samples.iter().filter_map(|dp| dp.average)),
        maximum: samples
            .iter()
            .filter_map(|dp| dp.maximum)
            .reduce(f64::max),
        minimum: samples
            .iter()
            .filter_map(|dp| dp.minimum)
            .reduce(f64::min),
        trend: trend(samples),
    }
}

pub fn trend(samples: &[Datapoint]) -> Vec<TrendPoint> {
    samples
        .iter()
        .filter_map(|dp| {
            dp.average.map(|value| TrendPoint {
                timestamp: dp.timestamp,
                value,
            })
        })
        .collect()
}

/// Sum of per-sample sums; an empty series totals zero.
pub fn total_of(samples: &[Datapoint]) -> f64 {
    samples.iter().filter_map(|dp| dp.sum).sum()
}

/// Oldest first.
pub fn sort_chronologically(samples: &mut [Datapoint]) {
    samples.sort_by_key(|dp| dp.timestamp);
}

/// Drops all but the newest `limit` samples of a chronologically sorted series.
pub fn keep_latest(samples: &mut Vec<Datapoint>, limit: usize) {
    if samples.len() > limit {
        samples.drain(..samples.len() - limit);
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0_u32), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / f64::from(count))
}
