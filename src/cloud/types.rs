//! Provider-neutral shapes of the ECS, CloudWatch and CloudWatch Logs
//! responses the dashboard consumes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::timerange::TimeRange;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterDescription {
    pub clusters: Vec<Cluster>,
    pub failures: Vec<ClusterFailure>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cluster {
    pub arn: String,
    pub name: String,
    pub status: Option<String>,
    pub registered_container_instances: i32,
    pub running_tasks: i32,
    pub pending_tasks: i32,
    pub active_services: i32,
    pub capacity_providers: Vec<String>,
}

/// Per-identifier failure reported by DescribeClusters (e.g. `MISSING`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterFailure {
    pub arn: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Service {
    pub arn: String,
    pub name: String,
    pub cluster_arn: Option<String>,
    pub status: Option<String>,
    pub desired_count: i32,
    pub running_count: i32,
    pub pending_count: i32,
    pub launch_type: Option<String>,
    pub task_definition: Option<String>,
    pub role_arn: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub deployments: Vec<Deployment>,
    pub events: Vec<ServiceEvent>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deployment {
    pub id: Option<String>,
    pub status: Option<String>,
    pub task_definition: Option<String>,
    pub desired_count: i32,
    pub running_count: i32,
    pub pending_count: i32,
    pub failed_tasks: i32,
    pub rollout_state: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceEvent {
    pub id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Task {
    pub arn: String,
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Average,
    Maximum,
    Minimum,
    Sum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

/// One GetMetricStatistics call.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: Vec<Dimension>,
    pub range: TimeRange,
    pub period_secs: i32,
    pub statistics: Vec<Statistic>,
}

impl MetricQuery {
    pub fn new(namespace: &str, metric_name: &str, range: TimeRange, period_secs: i32) -> Self {
        Self {
            namespace: namespace.to_string(),
            metric_name: metric_name.to_string(),
            dimensions: Vec::new(),
            range,
            period_secs,
            statistics: Vec::new(),
        }
    }

    pub fn with_dimension(mut self, name: &str, value: &str) -> Self {
        self.dimensions.push(Dimension {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn with_statistics(mut self, statistics: &[Statistic]) -> Self {
        self.statistics.extend_from_slice(statistics);
        self
    }

    pub fn dimension(&self, name: &str) -> Option<&str> {
        self.dimensions
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }
}

/// A single metric sample as returned by CloudWatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Datapoint {
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// One GetLogEvents call.
#[derive(Debug, Clone, PartialEq)]
pub struct LogQuery {
    pub log_group: String,
    pub log_stream: String,
    pub range: TimeRange,
    pub limit: Option<i32>,
}

/// Log event; times are epoch milliseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogEvent {
    pub timestamp: Option<i64>,
    pub ingestion_time: Option<i64>,
    pub message: Option<String>,
}
