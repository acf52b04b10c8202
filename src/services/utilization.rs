use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;

use super::clusters::require_cluster;
use crate::cloud::types::{Datapoint, MetricQuery, Statistic};
use crate::cloud::{CloudClients, CloudError, MetricsApi};
use crate::constants::{CLUSTER_NAME_DIMENSION, CPU_UTILIZATION_METRIC, ECS_NAMESPACE};
use crate::metrics::{keep_latest, period_for_budget, sort_chronologically, summarize, trend, Aggregate};
use crate::timerange::TimeRange;

const SUMMARY_STATISTICS: &[Statistic] = &[Statistic::Average, Statistic::Maximum, Statistic::Minimum];

#[derive(Debug, Clone, Serialize)]
pub struct RawSeries {
    pub datapoints: Vec<Datapoint>,
}

/// `{response: {CPUUtilization: Aggregate}, raw: {CPUUtilization: {datapoints}}}`
#[derive(Debug, Clone, Serialize)]
pub struct CpuReport {
    pub response: BTreeMap<String, Aggregate>,
    pub raw: BTreeMap<String, RawSeries>,
}

/// Per-metric mean of averages plus the raw series behind it.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceReport {
    pub response: BTreeMap<String, Option<f64>>,
    pub raw: BTreeMap<String, RawSeries>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTrend {
    pub cluster: String,
    pub metric: String,
    pub trend: Vec<TrendSample>,
}

/// Missing statistics read as 0 so charts always get a number.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSample {
    pub timestamp: DateTime<Utc>,
    pub average: f64,
    pub maximum: f64,
    pub minimum: f64,
}

fn cluster_query(metric: &str, cluster: &str, range: TimeRange, period_secs: i32) -> MetricQuery {
    MetricQuery::new(ECS_NAMESPACE, metric, range, period_secs)
        .with_dimension(CLUSTER_NAME_DIMENSION, cluster)
}

/// Cluster CPU over `range`. The period is sized so the series fits in
/// `limit` (or `default_budget`) points; statistics cover every returned
/// sample while `raw` and the trend keep only the newest `limit`.
pub async fn cpu_utilization(
    clients: &CloudClients,
    cluster: &str,
    range: TimeRange,
    limit: Option<u32>,
    default_budget: u32,
) -> Result<CpuReport, CloudError> {
    require_cluster(clients.ecs.as_ref(), cluster).await?;

    let period = period_for_budget(&range, limit.unwrap_or(default_budget));
    let query = cluster_query(CPU_UTILIZATION_METRIC, cluster, range, period)
        .with_statistics(SUMMARY_STATISTICS);

    let mut datapoints = clients.metrics.get_metric_statistics(&query).await?;
    sort_chronologically(&mut datapoints);

    let mut aggregate = summarize(&datapoints);
    if let Some(limit) = limit {
        keep_latest(&mut datapoints, limit as usize);
        aggregate.trend = trend(&datapoints);
    }

    tracing::info!(
        cluster,
        period,
        samples = datapoints.len(),
        "CPU utilization fetched"
    );

    Ok(CpuReport {
        response: BTreeMap::from([(CPU_UTILIZATION_METRIC.to_string(), aggregate)]),
        raw: BTreeMap::from([(CPU_UTILIZATION_METRIC.to_string(), RawSeries { datapoints })]),
    })
}

/// Averages of several cluster metrics over the same window, queried in
/// parallel.
pub async fn resource_averages(
    clients: &CloudClients,
    cluster: &str,
    metrics: &[String],
    range: TimeRange,
    period_secs: i32,
) -> Result<ResourceReport, CloudError> {
    require_cluster(clients.ecs.as_ref(), cluster).await?;

    let series = try_join_all(metrics.iter().map(|metric| async move {
        let query = cluster_query(metric, cluster, range, period_secs)
            .with_statistics(&[Statistic::Average]);
        let mut datapoints = clients.metrics.get_metric_statistics(&query).await?;
        sort_chronologically(&mut datapoints);
        Ok::<_, CloudError>((metric.clone(), datapoints))
    }))
    .await?;

    let mut report = ResourceReport {
        response: BTreeMap::new(),
        raw: BTreeMap::new(),
    };
    for (metric, datapoints) in series {
        report
            .response
            .insert(metric.clone(), summarize(&datapoints).average);
        report.raw.insert(metric, RawSeries { datapoints });
    }
    Ok(report)
}

/// Arbitrary AWS/ECS cluster metric at a caller-chosen period, oldest first.
pub async fn custom_trend(
    metrics: &dyn MetricsApi,
    cluster: &str,
    metric: &str,
    range: TimeRange,
    period_secs: i32,
) -> Result<MetricTrend, CloudError> {
    let query = cluster_query(metric, cluster, range, period_secs).with_statistics(SUMMARY_STATISTICS);
    let mut datapoints = metrics.get_metric_statistics(&query).await?;
    sort_chronologically(&mut datapoints);

    Ok(MetricTrend {
        cluster: cluster.to_string(),
        metric: metric.to_string(),
        trend: datapoints
            .into_iter()
            .map(|dp| TrendSample {
                timestamp: dp.timestamp,
                average: dp.average.unwrap_or(0.0),
                maximum: dp.maximum.unwrap_or(0.0),
                minimum: dp.minimum.unwrap_or(0.0),
            })
            .collect(),
    })
}
